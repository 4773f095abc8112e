use anyhow::{bail, Result};
use lights_common::Rgb;
use log::debug;

pub trait LedController {
    fn led_amount(&self) -> usize;
    fn set_all(&mut self, color: Rgb);
    fn set_individual(&mut self, i: usize, color: Rgb);
    fn commit(&mut self) -> Result<()>;

    fn reset(&mut self) -> Result<()>;
}

// In memory controller
// <editor-fold>
/// Keeps the led string in memory, the committed state is what a real string would display.
#[derive(Clone, Debug)]
pub struct LedBuffer {
    leds: Vec<Rgb>,
    shown: Vec<Rgb>,
    commits: usize,
}

impl LedBuffer {
    pub fn new(led_count: usize) -> Result<Self> {
        if led_count == 0 {
            bail!("A led string needs at least one led !");
        }
        debug!("Create led buffer with {} leds", led_count);

        Ok(Self {
            leds: vec![Rgb::BLACK; led_count],
            shown: vec![Rgb::BLACK; led_count],
            commits: 0,
        })
    }

    /// State that will be displayed on the next commit.
    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    /// State displayed by the last commit.
    pub fn shown(&self) -> &[Rgb] {
        &self.shown
    }

    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl LedController for LedBuffer {
    fn led_amount(&self) -> usize {
        self.leds.len()
    }

    fn set_all(&mut self, color: Rgb) {
        for led in self.leds.iter_mut() {
            *led = color;
        }
    }

    fn set_individual(&mut self, i: usize, color: Rgb) {
        self.leds[i] = color;
    }

    fn commit(&mut self) -> Result<()> {
        self.shown.copy_from_slice(&self.leds);
        self.commits += 1;

        let state = self
            .shown
            .iter()
            .map(|led| format!("{:06x}", led.to_u32()))
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Show #{}: {}", self.commits, state);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.set_all(Rgb::BLACK);
        self.commit()
    }
}
// </editor-fold>
