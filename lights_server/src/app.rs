use crate::{
    errors::ServerError,
    frames::FrameReader,
    led_controllers::LedController,
    lights::Lights,
};
use anyhow::Result;
use lights_common::DecodeMode;
use log::{debug, info, warn};
use std::io::Read;

pub struct App<R: Read, C: LedController> {
    frames: FrameReader<R>,
    lights: Lights<C>,
    dropped: usize,
}

impl<R: Read, C: LedController> App<R, C> {
    pub fn new(reader: R, mode: DecodeMode, controller: C) -> Self {
        debug!("Decoding frames in {:?} mode", mode);
        Self {
            frames: FrameReader::new(reader, mode),
            lights: Lights::new(controller),
            dropped: 0,
        }
    }

    pub fn lights(&self) -> &Lights<C> {
        &self.lights
    }

    /// Frames that failed to decode and were skipped.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Handles a single frame, returns false once the stream is over.
    pub fn run_once(&mut self) -> Result<bool> {
        match self.frames.next_frame() {
            Ok(Some(message)) => {
                self.lights.apply(&message)?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(ServerError::Decode(err)) => {
                warn!("Dropping frame {}: {}", self.frames.frames_read(), err);
                self.dropped += 1;
                Ok(true)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        while self.run_once()? {}

        info!(
            "Stream over, {} frames read, {} dropped",
            self.frames.frames_read(),
            self.dropped
        );
        Ok(())
    }
}
