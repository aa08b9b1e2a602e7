// Everything the CPU reaches through: the T-state clock, the memory map and
// the I/O port space, bundled so every access books its cycle cost in one
// place. Devices hand a Signal back up to the run loop instead of panicking.

use crate::devices::ByteSink;
use crate::memory::MemoryMap;
use crate::psg::PSG;
use crate::vdc::VDC;
use crate::EmResult;

pub const CPU_FREQ: u64 = 3_579_545;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Ok,
    Quit,
    Fatal,
}

// Monotone T-state counter; the single notion of emulated time.
#[derive(Default)]
pub struct Clock {
    cycles: u64,
}

impl Clock {
    pub fn tick(&mut self, t_states: u64) {
        self.cycles += t_states;
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn nanos(&self) -> u64 {
        (self.cycles as u128 * 1_000_000_000 / CPU_FREQ as u128) as u64
    }
}

pub struct System {
    pub clock: Clock,
    pub mem: MemoryMap,
    pub io: IoBus,
}

impl System {
    pub fn new(mem: MemoryMap, io: IoBus) -> System {
        System { clock: Clock::default(), mem, io }
    }

    pub fn read_byte(&mut self, addr: u16) -> u8 {
        self.clock.tick(3);
        self.mem.read(addr)
    }

    pub fn read_word(&mut self, addr: u16) -> u16 {
        self.clock.tick(6);
        self.mem.read_word(addr)
    }

    pub fn write_byte(&mut self, addr: u16, data: u8) {
        self.clock.tick(3);
        self.mem.write(addr, data);
    }

    pub fn port_out(&mut self, port: u16, data: u8) -> Signal {
        self.clock.tick(4);
        self.io.out(port, data)
    }

    pub fn port_in(&mut self, port: u16) -> (u8, Signal) {
        self.clock.tick(4);
        self.io.input(port)
    }
}

pub struct UART {
    sink: Box<dyn ByteSink>,
}

impl UART {
    pub fn new(sink: Box<dyn ByteSink>) -> UART {
        UART { sink }
    }

    pub fn transmit(&mut self, byte: u8) {
        if let Err(err) = self.sink.write(byte) {
            warn!("UART transmit failed: {}", err);
        }
    }

    pub fn flush(&mut self) -> EmResult {
        self.sink.flush()
    }
}

// Only the low 8 bits of the port number pick a device on this board.
pub struct IoBus {
    pub psg1: PSG,
    pub psg2: PSG,
    pub vdc: VDC,
    pub uart: UART,
    debug_io: bool,
    strict: bool,
}

impl IoBus {
    pub fn new(psg1: PSG, psg2: PSG, vdc: VDC, uart: UART, debug_io: bool, strict: bool) -> IoBus {
        IoBus { psg1, psg2, vdc, uart, debug_io, strict }
    }

    pub fn out(&mut self, port: u16, data: u8) -> Signal {
        if self.debug_io {
            debug!(target: "io", "[OUT] @{:#06x} = {:#04x}", port, data);
        }
        match port & 0xff {
            0 => self.psg1.select(data),
            1 => self.psg1.write_data(data),
            2 => self.psg2.select(data),
            3 => self.psg2.write_data(data),
            4..=7 => self.vdc.write((port & 0xff) as u8 - 4, data),
            8 => self.uart.transmit(data),
            _ => {
                warn!("Writing to undefined I/O port {:#06x}", port);
                return self.fault();
            }
        }
        Signal::Ok
    }

    pub fn input(&mut self, port: u16) -> (u8, Signal) {
        if self.debug_io {
            debug!(target: "io", "[IN] @{:#06x}", port);
        }
        match port & 0xff {
            0 | 2 | 8 => {
                warn!("Reading from write-only I/O port {:#06x}", port);
                (0, self.fault())
            }
            1 => (self.psg1.read_data(), Signal::Ok),
            3 => (self.psg2.read_data(), Signal::Ok),
            4..=7 => (self.vdc.read((port & 0xff) as u8 - 4), Signal::Ok),
            _ => {
                warn!("Reading from undefined I/O port {:#06x}", port);
                (0, self.fault())
            }
        }
    }

    fn fault(&self) -> Signal {
        if self.strict {
            Signal::Fatal
        } else {
            Signal::Ok
        }
    }
}
