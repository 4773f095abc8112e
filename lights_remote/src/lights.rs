use anyhow::{Context, Result};
use lights_common::{chunk_leds, hexdump_hex, ColorChunk, Config, Message, Rgb};
use log::{debug, trace};
use serialport::{SerialPort, SerialPortInfo};
use std::{io::Write, time::Duration};

// The port is a USB CDC device, the baud rate is a dummy anyway.
const BAUD_RATE: u32 = 9600;
const WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Sends frames to the microcontroller driving the led string.
pub struct Lights<W: Write> {
    port: W,
    limit_factor: f32,
    frames_sent: usize,
}

impl Lights<Box<dyn SerialPort>> {
    /// Open the serial port of the microcontroller.
    /// The port is put in raw mode, frames go out untouched.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(WRITE_TIMEOUT)
            .open()
            .with_context(|| format!("Port '{}' not available", port_name))?;
        debug!("Opened {}", port_name);
        Ok(Self::new(port))
    }
}

/// Helper function to list the available ports.
pub fn available_ports() -> Result<Vec<SerialPortInfo>> {
    Ok(serialport::available_ports()?)
}

impl<W: Write> Lights<W> {
    pub fn new(port: W) -> Self {
        Self {
            port,
            limit_factor: 1.0,
            frames_sent: 0,
        }
    }

    /// Set the brightness limiting factor (0.0 - 1.0), this reduces the overall brightness for any
    /// values set through [`Lights::fill`] or [`Lights::set_leds`].
    pub fn set_limit_factor(&mut self, factor: f32) {
        self.limit_factor = factor.max(0.0).min(1.0);
        debug!("Limit factor set to {}", self.limit_factor);
    }

    pub fn limit_factor(&self) -> f32 {
        self.limit_factor
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    pub fn nop(&mut self) -> Result<()> {
        self.send(&Message::Nop)?;
        self.port.flush()?;
        Ok(())
    }

    pub fn set_config(&mut self, config: &Config) -> Result<()> {
        debug!("Set config {:?}", config);
        self.send(&Message::Config(*config))?;
        self.port.flush()?;
        Ok(())
    }

    /// Fill the entire string with a single color and show it.
    pub fn fill(&mut self, color: Rgb) -> Result<()> {
        let chunk = ColorChunk::fill(color.scaled(self.limit_factor));
        self.send(&chunk.into())?;
        self.port.flush()?;
        Ok(())
    }

    /// Set the leds to the provided colors, the string is shown after the last chunk.
    pub fn set_leds(&mut self, leds: &[Rgb]) -> Result<()> {
        let limited: Vec<Rgb> = leds
            .iter()
            .map(|color| color.scaled(self.limit_factor))
            .collect();

        let chunks = chunk_leds(&limited);
        debug!("Sending {} leds in {} chunks", leds.len(), chunks.len());
        for chunk in chunks {
            self.send(&chunk.into())?;
        }
        self.port.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.port
    }

    fn send(&mut self, message: &Message) -> Result<()> {
        let frame = message.to_bytes();
        trace!("Frame: {}", hexdump_hex(&frame));
        self.port.write_all(&frame)?;
        self.frames_sent += 1;
        Ok(())
    }
}
