pub use int_enum::IntEnum;

pub mod packets;

pub use packets::{
    chunk_leds, decode, decode_with, encode, Chunks, ColorChunk, Config, DecodeMode, Message,
    MessageType, Rgb, FRAME_LEN, HEADER_LEN, LEDS_PER_MESSAGE, PAYLOAD_LEN,
};

pub mod errors {
    use thiserror::Error;

    pub type Result<T> = std::result::Result<T, DecodeError>;

    #[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
    pub enum DecodeError {
        #[error("Frame must be exactly 64 bytes, got {actual} !")]
        Length { actual: usize },
        #[error("Unknown message type {0} !")]
        UnknownType(u8),
        #[error("Reserved bytes must be zero, got {0:?} !")]
        ReservedField([u8; 3]),
    }
}

/// Messages both sides of the protocol agree on byte for byte.
pub mod reference {
    use crate::{ColorChunk, Config, Message, Rgb};

    /// Encodes to `1, 0, 0, 0, 239, 190, 173, 222, 4, 3, 2, 1, 244, 243, 242, 241, 59, 170, 170, 62, 0, 0, 128, 63`
    /// followed by zeros.
    pub fn config() -> Config {
        Config {
            decay_time_delay_ms: 0xdeadbeef,
            decay_interval_us: 0x01020304,
            decay_amount: 0xF1F2F3F4,
            gamma_r: 0.33333,
            gamma_g: 1.0,
            gamma_b: 0.0,
        }
    }

    /// Led `c` is `(3c, 3c + 1, 3c + 2)`, so the frame ends with the bytes 0 to 56.
    pub fn color_chunk() -> ColorChunk {
        let mut chunk = ColorChunk {
            offset: 0x0102,
            settings: 0xAB,
            ..Default::default()
        };
        for (c, color) in chunk.color.iter_mut().enumerate() {
            let c = c as u8 * 3;
            *color = Rgb::new(c, c + 1, c + 2);
        }
        chunk
    }

    pub fn messages() -> [Message; 3] {
        [
            Message::Nop,
            Message::Config(config()),
            Message::Color(color_chunk()),
        ]
    }
}

/// Renders a frame as comma separated decimal bytes, the same format the
/// firmware side cross-check tool prints.
pub fn hexdump(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a frame as space separated two digit hex bytes.
pub fn hexdump_hex(frame: &[u8]) -> String {
    frame
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
