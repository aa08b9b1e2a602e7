#[macro_use]
extern crate log;

pub mod aardbei;
pub mod bus;
pub mod devices;
pub mod memory;
pub mod processor;
pub mod psg;
pub mod vdc;

use crate::aardbei::SYNC_CYCLES;
use crate::bus::{IoBus, Signal, System};
use crate::memory::MemoryMap;
use crate::processor::CPU;
use std::error::Error;
use std::time::{Duration, Instant};

pub type EmResult<T = ()> = Result<T, Box<dyn Error>>;

// The C sources carried these as compile-time defines; here they are plain
// runtime configuration carried by the board.
#[derive(Debug, Default, Clone, Copy)]
pub struct Switches {
    pub debug: bool,
    pub debug_io: bool,
    pub debug_ay: bool,
    pub debug_sync: bool,
    pub strict: bool,
}

pub struct Configuration {
    pub mem: MemoryMap,
    pub io: IoBus,
    pub switches: Switches,
}

pub struct Emulator {
    pub cpu: CPU,
    pub sys: System,
    switches: Switches,
}

impl Emulator {
    pub fn new(config: Configuration) -> Emulator {
        Emulator {
            cpu: CPU::new(config.switches),
            sys: System::new(config.mem, config.io),
            switches: config.switches,
        }
    }

    pub fn run(&mut self) -> EmResult {
        self.drive(None)
    }

    // Bounded variant for harness use.
    pub fn run_for(&mut self, limit: Duration) -> EmResult {
        self.drive(Some(limit))
    }

    // The pacing loop. Emulated time may never get ahead of the host clock:
    // the CPU only steps while it lags, and each SYNC_CYCLES window of
    // T-states the peripherals get serviced. When the CPU is ahead nothing
    // sleeps; the loop spins into the next service window.
    fn drive(&mut self, limit: Option<Duration>) -> EmResult {
        let start = Instant::now();
        let mut serviced = self.sys.clock.cycles();
        loop {
            if let Some(limit) = limit {
                if start.elapsed() >= limit {
                    return Ok(());
                }
            }
            let burst = self.sys.clock.cycles() + SYNC_CYCLES;
            while self.sys.clock.nanos() < start.elapsed().as_nanos() as u64
                && self.sys.clock.cycles() < burst
            {
                if self.cpu.step(&mut self.sys) == Signal::Fatal {
                    return Err("emulation aborted".into());
                }
                if self.switches.debug {
                    trace!(target: "cpu", "{}", self.cpu);
                }
            }
            let cycles = self.sys.clock.cycles();
            if cycles - serviced >= SYNC_CYCLES {
                if self.switches.debug_sync {
                    debug!(target: "sync", "[SYNC] T cycle {}", cycles);
                }
                self.sys.io.psg1.pump(cycles - serviced)?;
                self.sys.io.psg2.pump(cycles - serviced)?;
                self.sys.io.uart.flush()?;
                if self.sys.io.vdc.draw()? == Signal::Quit {
                    return Ok(());
                }
                serviced = cycles;
            }
        }
    }
}
