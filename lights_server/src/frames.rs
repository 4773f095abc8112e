use crate::errors::{Result, ServerError};
use lights_common::{decode_with, hexdump_hex, DecodeMode, Message, FRAME_LEN};
use log::trace;
use std::io::{ErrorKind, Read};

/// Splits a byte stream into frames and decodes them.
pub struct FrameReader<R: Read> {
    reader: R,
    mode: DecodeMode,
    scratch: [u8; FRAME_LEN],
    frames_read: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R, mode: DecodeMode) -> Self {
        Self {
            reader,
            mode,
            scratch: [0; FRAME_LEN],
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Reads the next frame, `Ok(None)` once the stream ends cleanly.
    ///
    /// A frame that doesn't decode is still consumed entirely, so the stream
    /// stays in sync and the caller can keep reading.
    pub fn next_frame(&mut self) -> Result<Option<Message>> {
        let mut filled = 0;
        while filled < FRAME_LEN {
            match self.reader.read(&mut self.scratch[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }

        match filled {
            0 => return Ok(None),
            FRAME_LEN => {}
            n => return Err(ServerError::TruncatedFrame(n)),
        }

        self.frames_read += 1;
        trace!("Frame {}: {}", self.frames_read, hexdump_hex(&self.scratch));

        let message = decode_with(&self.scratch, self.mode)?;
        Ok(Some(message))
    }
}
