use crate::led_controllers::LedController;
use anyhow::Result;
use lights_common::{ColorChunk, Config, Message, LEDS_PER_MESSAGE};
use log::{debug, info};
use std::cmp::min;

/// Applies incoming messages to a led string.
pub struct Lights<C: LedController> {
    controller: C,
    config: Config,
}

impl<C: LedController> Lights<C> {
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            config: Config::default(),
        }
    }

    /// Last configuration received, stored as-is.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn into_inner(self) -> C {
        self.controller
    }

    /// Returns whether the led string has been shown.
    pub fn apply(&mut self, message: &Message) -> Result<bool> {
        match message {
            Message::Nop => Ok(false),
            Message::Config(config) => {
                info!("New config: {:?}", config);
                self.config = *config;
                Ok(false)
            }
            Message::Color(chunk) => self.apply_color(chunk),
        }
    }

    fn apply_color(&mut self, chunk: &ColorChunk) -> Result<bool> {
        if chunk.set_all() {
            self.controller.set_all(chunk.color[0]);
        } else {
            // Whatever falls beyond the end of the string is dropped.
            let led_amount = self.controller.led_amount();
            let start = min(chunk.offset as usize, led_amount);
            let end = min(chunk.offset as usize + LEDS_PER_MESSAGE, led_amount);
            if start == end {
                debug!("Chunk at {} is out of the string", chunk.offset);
            }
            for (i, color) in (start..end).zip(chunk.color.iter()) {
                self.controller.set_individual(i, *color);
            }
        }

        if chunk.show_after() {
            self.controller.commit()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::led_controllers::LedBuffer;
    use lights_common::{chunk_leds, Rgb};

    fn lights(led_count: usize) -> Lights<LedBuffer> {
        Lights::new(LedBuffer::new(led_count).unwrap())
    }

    #[test]
    fn nop_does_nothing() {
        let mut lights = lights(4);
        assert!(!lights.apply(&Message::Nop).unwrap());
        assert_eq!(lights.controller().commits(), 0);
    }

    #[test]
    fn config_is_stored() {
        let config = Config {
            decay_time_delay_ms: 10,
            gamma_g: 2.2,
            ..Default::default()
        };
        let mut lights = lights(4);
        assert!(!lights.apply(&config.into()).unwrap());
        assert_eq!(lights.config(), &config);
        assert_eq!(lights.controller().commits(), 0);
    }

    #[test]
    fn set_all_ignores_offset() {
        let mut chunk = ColorChunk::fill(Rgb::RED);
        chunk.offset = 100;
        chunk.color[1] = Rgb::BLUE;

        let mut lights = lights(30);
        assert!(lights.apply(&chunk.into()).unwrap());
        assert_eq!(lights.controller().shown(), &vec![Rgb::RED; 30][..]);
    }

    #[test]
    fn chunk_at_offset() {
        let mut chunk = ColorChunk::new(5);
        for (i, color) in chunk.color.iter_mut().enumerate() {
            *color = Rgb::new(i as u8 + 1, 0, 0);
        }

        let mut lights = lights(30);
        assert!(!lights.apply(&chunk.into()).unwrap());
        let leds = lights.controller().leds();
        assert!(leds[..5].iter().all(|led| *led == Rgb::BLACK));
        assert_eq!(leds[5], Rgb::new(1, 0, 0));
        assert_eq!(leds[23], Rgb::new(19, 0, 0));
        assert!(leds[24..].iter().all(|led| *led == Rgb::BLACK));
        assert_eq!(lights.controller().commits(), 0);
    }

    #[test]
    fn chunk_clipped_at_end() {
        let mut chunk = ColorChunk::new(8).with_show_after(true);
        chunk.color = [Rgb::GREEN; LEDS_PER_MESSAGE];

        let mut lights = lights(10);
        assert!(lights.apply(&chunk.into()).unwrap());
        let shown = lights.controller().shown();
        assert!(shown[..8].iter().all(|led| *led == Rgb::BLACK));
        assert_eq!(&shown[8..], &[Rgb::GREEN; 2]);
    }

    #[test]
    fn chunk_out_of_string() {
        let chunk = ColorChunk::new(u16::MAX).with_show_after(true);
        let mut lights = lights(10);
        assert!(lights.apply(&chunk.into()).unwrap());
        assert_eq!(lights.controller().commits(), 1);
    }

    #[test]
    fn chunked_buffer_is_shown_once() {
        let leds: Vec<Rgb> = (0..50u8).map(|i| Rgb::new(i, i, 0)).collect();
        let mut lights = lights(50);
        let shows = chunk_leds(&leds)
            .map(|chunk| lights.apply(&chunk.into()).unwrap())
            .filter(|shown| *shown)
            .count();

        assert_eq!(shows, 1);
        assert_eq!(lights.controller().shown(), &leds[..]);
    }
}
