use lights_common::DecodeMode;
use std::path::PathBuf;
use structopt::StructOpt;

pub mod app;
pub mod frames;
pub mod led_controllers;
pub mod lights;

#[derive(Clone, Debug, StructOpt)]
pub struct Opt {
    /// File to read the frames from, defaults to stdin.
    #[structopt(short, long, parse(from_os_str))]
    pub input: Option<PathBuf>,

    /// Amount of LEDs on the string.
    #[structopt(short = "c", long)]
    pub led_count: usize,

    /// Drop frames whose reserved bytes aren't zero.
    #[structopt(short, long)]
    pub strict: bool,
}

impl Opt {
    pub fn decode_mode(&self) -> DecodeMode {
        if self.strict {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        }
    }
}

pub mod errors {
    use lights_common::errors::DecodeError;
    use thiserror::Error;

    pub type Result<T> = std::result::Result<T, ServerError>;

    #[derive(Debug, Error)]
    pub enum ServerError {
        #[error(transparent)]
        Io(#[from] std::io::Error),
        #[error("Stream ended in the middle of a frame, got {0} bytes !")]
        TruncatedFrame(usize),
        #[error(transparent)]
        Decode(#[from] DecodeError),
    }
}
