use argh::FromArgs;
use emz80::{aardbei, EmResult, Emulator, Switches};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process;

// Historical image names, newest first.
const DEFAULT_IMAGES: [&str; 3] = ["test/music.rom", "test/music.bin", "test/music_.bin"];

#[derive(FromArgs)]
/// Aardbei-8 single-board computer emulator.
struct Args {
    /// flash image to boot (default: test/music.rom)
    #[argh(positional)]
    rom: Option<String>,

    /// EEPROM image to preload
    #[argh(option)]
    eeprom: Option<String>,

    /// abort on unknown opcodes and undefined I/O ports
    #[argh(switch)]
    strict: bool,

    /// per-instruction CPU trace
    #[argh(switch)]
    debug: bool,

    /// io port trace
    #[argh(switch)]
    debug_io: bool,

    /// PSG register dump on every audio pump
    #[argh(switch)]
    debug_ay: bool,

    /// cycle tick trace
    #[argh(switch)]
    debug_sync: bool,
}

fn init_logger(switches: &Switches) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if switches.debug {
        builder.filter_module("cpu", LevelFilter::Trace);
    }
    if switches.debug_io {
        builder.filter_module("io", LevelFilter::Debug);
    }
    if switches.debug_ay {
        builder.filter_module("ay", LevelFilter::Debug);
    }
    if switches.debug_sync {
        builder.filter_module("sync", LevelFilter::Debug);
    }
    builder.init();
}

fn find_rom(arg: Option<String>) -> EmResult<PathBuf> {
    match arg {
        Some(path) => Ok(PathBuf::from(path)),
        None => DEFAULT_IMAGES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                format!("no flash image found (tried {})", DEFAULT_IMAGES.join(", ")).into()
            }),
    }
}

fn run(args: Args, switches: Switches) -> EmResult {
    let rom = find_rom(args.rom)?;
    let eeprom = args.eeprom.as_ref().map(Path::new);
    let config = aardbei::board(&rom, eeprom, switches)?;
    Emulator::new(config).run()
}

fn main() {
    let args: Args = argh::from_env();
    let switches = Switches {
        debug: args.debug,
        debug_io: args.debug_io,
        debug_ay: args.debug_ay,
        debug_sync: args.debug_sync,
        strict: args.strict,
    };
    init_logger(&switches);
    if let Err(err) = run(args, switches) {
        eprintln!("aardbei: {}", err);
        process::exit(1);
    }
}
