use crate::bus::{IoBus, UART};
use crate::devices::{AudioOut, Console, Monitor};
use crate::memory::{MemoryMap, EEPROM_SIZE, FLASH_SIZE};
use crate::psg::{AY, PSG};
use crate::vdc::{ScreenMode, VDC};
use crate::{Configuration, EmResult, Switches};
use std::fs;
use std::path::Path;

// Service cadence of the run loop; lower is more accurate, higher is faster.
pub const SYNC_CYCLES: u64 = 8192;

pub const AUDIO_RATE: u32 = 44_100;
pub const AUDIO_CHANNELS: u16 = 2;
pub const AUDIO_DEPTH: u16 = 16;

// Wire up an Aardbei-8 against the real host: one audio stream with a mixer
// lane per sound chip, a window for the video controller and stdout for the
// UART. The flash image is mandatory and must fill the whole part.
pub fn board(flash: &Path, eeprom: Option<&Path>, switches: Switches) -> EmResult<Configuration> {
    let mut mem = MemoryMap::new();
    mem.load_flash(&read_flash_image(flash)?);
    if let Some(path) = eeprom {
        mem.load_eeprom(&read_eeprom_image(path)?);
    }

    let audio = AudioOut::new()?;
    let psg1 = PSG::new(
        Box::new(AY::new(AUDIO_RATE)),
        Box::new(audio.sink(AUDIO_RATE, AUDIO_CHANNELS)?),
        switches.debug_ay,
    );
    let psg2 = PSG::new(
        Box::new(AY::new(AUDIO_RATE)),
        Box::new(audio.sink(AUDIO_RATE, AUDIO_CHANNELS)?),
        switches.debug_ay,
    );

    let (width, height) = ScreenMode::Text1.dimensions();
    let vdc = VDC::new(Box::new(Monitor::new("Aardbei-8", width, height)?));
    let uart = UART::new(Box::new(Console::new()));

    let io = IoBus::new(psg1, psg2, vdc, uart, switches.debug_io, switches.strict);
    Ok(Configuration { mem, io, switches })
}

fn read_flash_image(path: &Path) -> EmResult<Vec<u8>> {
    let image = fs::read(path).map_err(|err| format!("{}: {}", path.display(), err))?;
    if image.len() != FLASH_SIZE {
        return Err(format!(
            "flash image {} is {} bytes, expected {}",
            path.display(),
            image.len(),
            FLASH_SIZE
        )
        .into());
    }
    Ok(image)
}

fn read_eeprom_image(path: &Path) -> EmResult<Vec<u8>> {
    let image = fs::read(path).map_err(|err| format!("{}: {}", path.display(), err))?;
    if image.len() > EEPROM_SIZE {
        return Err(format!(
            "EEPROM image {} is {} bytes, expected at most {}",
            path.display(),
            image.len(),
            EEPROM_SIZE
        )
        .into());
    }
    Ok(image)
}
