// Host-side capabilities. The core only ever talks to the three traits below;
// the concrete backends (a rodio output stream, a minifb window, stdout) are
// injected by the board configuration so tests can swap in capture buffers.

use crate::EmResult;
use minifb::{Window, WindowOptions};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::io::{self, Write};
use std::time::Duration;

// PCM output, interleaved signed 16-bit frames.
pub trait PcmSink {
    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    fn append(&mut self, frames: &[i16]) -> EmResult;
}

// A resizable pixel surface in 0RGB.
pub trait Surface {
    fn size(&self) -> (usize, usize);
    fn resize(&mut self, width: usize, height: usize) -> EmResult;
    fn clear(&mut self, color: u32);
    fn draw_pixel(&mut self, x: usize, y: usize, color: u32);
    fn flip(&mut self) -> EmResult;
    fn is_open(&self) -> bool;
}

// One-way byte stream (UART transmit side).
pub trait ByteSink {
    fn write(&mut self, byte: u8) -> EmResult;
    fn flush(&mut self) -> EmResult;
}

// The host audio device. One output stream is shared by both sound chips,
// each of which gets its own mixer lane.
pub struct AudioOut {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOut {
    pub fn new() -> EmResult<AudioOut> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(AudioOut { _stream: stream, handle })
    }

    pub fn sink(&self, sample_rate: u32, channels: u16) -> EmResult<Speaker> {
        let sink = Sink::try_new(&self.handle)?;
        Ok(Speaker { sink, sample_rate, channels })
    }
}

pub struct Speaker {
    sink: Sink,
    sample_rate: u32,
    channels: u16,
}

impl PcmSink for Speaker {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    fn channels(&self) -> u16 {
        self.channels
    }
    fn append(&mut self, frames: &[i16]) -> EmResult {
        self.sink
            .append(SamplesBuffer::new(self.channels, self.sample_rate, frames.to_vec()));
        Ok(())
    }
}

pub struct Monitor {
    title: String,
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl Monitor {
    pub fn new(title: &str, width: usize, height: usize) -> EmResult<Monitor> {
        let window = Self::open_window(title, width, height)?;
        Ok(Monitor {
            title: title.to_string(),
            window,
            buffer: vec![0; width * height],
            width,
            height,
        })
    }

    fn open_window(title: &str, width: usize, height: usize) -> EmResult<Window> {
        let mut window = Window::new(title, width, height, WindowOptions::default())?;
        // ~60 Hz cap keeps the flip from saturating the host compositor.
        window.limit_update_rate(Some(Duration::from_micros(16600)));
        Ok(window)
    }
}

impl Surface for Monitor {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    // minifb windows have a fixed size, so a mode change opens a fresh one.
    fn resize(&mut self, width: usize, height: usize) -> EmResult {
        self.window = Self::open_window(&self.title, width, height)?;
        self.buffer = vec![0; width * height];
        self.width = width;
        self.height = height;
        Ok(())
    }
    fn clear(&mut self, color: u32) {
        for px in self.buffer.iter_mut() {
            *px = color;
        }
    }
    fn draw_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x] = color;
        }
    }
    fn flip(&mut self) -> EmResult {
        self.window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
    fn is_open(&self) -> bool {
        self.window.is_open()
    }
}

pub struct Console {
    out: io::Stdout,
}

impl Console {
    pub fn new() -> Console {
        Console { out: io::stdout() }
    }
}

impl ByteSink for Console {
    fn write(&mut self, byte: u8) -> EmResult {
        self.out.write_all(&[byte])?;
        Ok(())
    }
    fn flush(&mut self) -> EmResult {
        self.out.flush()?;
        Ok(())
    }
}
