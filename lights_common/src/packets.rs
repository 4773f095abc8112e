use crate::errors::{DecodeError, Result};
use byteorder::{ByteOrder, LittleEndian};
use int_enum::IntEnum;
use std::cmp::min;

/// One frame is exactly one USB packet.
pub const FRAME_LEN: usize = 64;
/// Tag byte followed by three reserved bytes.
pub const HEADER_LEN: usize = 4;
pub const PAYLOAD_LEN: usize = FRAME_LEN - HEADER_LEN;
pub const LEDS_PER_MESSAGE: usize = 19;

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, IntEnum)]
pub enum MessageType {
    Nop = 0,
    Config = 1,
    Color = 2,
}

/// Color of a single led.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the channels as `0x00RRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Inverse of [`Rgb::to_u32`], the top byte is ignored.
    pub const fn from_u32(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Scale every channel by `factor`, truncating.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(
            (self.r as f32 * factor) as u8,
            (self.g as f32 * factor) as u8,
            (self.b as f32 * factor) as u8,
        )
    }
}

/// Runtime configuration of the firmware.
/// The codec carries these values as-is, range checks are up to the receiver.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// If there has been activity, decay won't take place for this many milliseconds.
    /// 0 disables the decay.
    pub decay_time_delay_ms: u32,

    /// After inactivity the decay will be performed every `decay_interval_us` microseconds.
    pub decay_interval_us: u32,

    /// The amount of decay that occurs each cycle.
    pub decay_amount: u32,

    pub gamma_r: f32,
    pub gamma_g: f32,
    pub gamma_b: f32,
}

impl Config {
    // Offsets inside the payload region.
    const DECAY_TIME_DELAY_MS: usize = 0;
    const DECAY_INTERVAL_US: usize = 4;
    const DECAY_AMOUNT: usize = 8;
    const GAMMA_R: usize = 12;
    const GAMMA_G: usize = 16;
    const GAMMA_B: usize = 20;

    pub fn decay_enabled(&self) -> bool {
        self.decay_time_delay_ms != 0
    }

    fn write_payload(&self, payload: &mut [u8]) {
        LittleEndian::write_u32(
            &mut payload[Self::DECAY_TIME_DELAY_MS..],
            self.decay_time_delay_ms,
        );
        LittleEndian::write_u32(&mut payload[Self::DECAY_INTERVAL_US..], self.decay_interval_us);
        LittleEndian::write_u32(&mut payload[Self::DECAY_AMOUNT..], self.decay_amount);
        LittleEndian::write_f32(&mut payload[Self::GAMMA_R..], self.gamma_r);
        LittleEndian::write_f32(&mut payload[Self::GAMMA_G..], self.gamma_g);
        LittleEndian::write_f32(&mut payload[Self::GAMMA_B..], self.gamma_b);
    }

    fn read_payload(payload: &[u8]) -> Self {
        Self {
            decay_time_delay_ms: LittleEndian::read_u32(&payload[Self::DECAY_TIME_DELAY_MS..]),
            decay_interval_us: LittleEndian::read_u32(&payload[Self::DECAY_INTERVAL_US..]),
            decay_amount: LittleEndian::read_u32(&payload[Self::DECAY_AMOUNT..]),
            gamma_r: LittleEndian::read_f32(&payload[Self::GAMMA_R..]),
            gamma_g: LittleEndian::read_f32(&payload[Self::GAMMA_G..]),
            gamma_b: LittleEndian::read_f32(&payload[Self::GAMMA_B..]),
        }
    }
}

/// Colors for up to [`LEDS_PER_MESSAGE`] consecutive leds, starting at `offset`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ColorChunk {
    pub offset: u16,
    /// Raw settings byte, see the `SETTINGS_*` flags. Unknown bits are kept.
    pub settings: u8,
    pub color: [Rgb; LEDS_PER_MESSAGE],
}

impl ColorChunk {
    /// Latch the led string once this chunk has been applied.
    pub const SETTINGS_SHOW_AFTER: u8 = 1 << 0;
    /// Apply `color[0]` to every led, `offset` is ignored.
    pub const SETTINGS_SET_ALL: u8 = 1 << 1;

    // Offsets inside the payload region.
    // The color array follows the settings byte directly, no alignment padding.
    const OFFSET: usize = 0;
    const SETTINGS: usize = 2;
    const COLOR: usize = 3;

    pub fn new(offset: u16) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// A single chunk that sets the whole string to `color` and shows it.
    pub fn fill(color: Rgb) -> Self {
        let mut chunk = Self::new(0)
            .with_set_all(true)
            .with_show_after(true);
        chunk.color[0] = color;
        chunk
    }

    /// Splits `leds` into chunks, see [`chunk_leds`].
    pub fn chunks(leds: &[Rgb]) -> Chunks<'_> {
        chunk_leds(leds)
    }

    pub fn show_after(&self) -> bool {
        self.settings & Self::SETTINGS_SHOW_AFTER != 0
    }

    pub fn set_all(&self) -> bool {
        self.settings & Self::SETTINGS_SET_ALL != 0
    }

    pub fn with_show_after(self, show_after: bool) -> Self {
        self.with_flag(Self::SETTINGS_SHOW_AFTER, show_after)
    }

    pub fn with_set_all(self, set_all: bool) -> Self {
        self.with_flag(Self::SETTINGS_SET_ALL, set_all)
    }

    fn with_flag(mut self, flag: u8, enabled: bool) -> Self {
        if enabled {
            self.settings |= flag;
        } else {
            self.settings &= !flag;
        }
        self
    }

    fn write_payload(&self, payload: &mut [u8]) {
        LittleEndian::write_u16(&mut payload[Self::OFFSET..], self.offset);
        payload[Self::SETTINGS] = self.settings;
        for (i, color) in self.color.iter().enumerate() {
            let base = Self::COLOR + i * 3;
            payload[base] = color.r;
            payload[base + 1] = color.g;
            payload[base + 2] = color.b;
        }
    }

    fn read_payload(payload: &[u8]) -> Self {
        let mut chunk = Self {
            offset: LittleEndian::read_u16(&payload[Self::OFFSET..]),
            settings: payload[Self::SETTINGS],
            ..Default::default()
        };
        for (color, rgb) in chunk
            .color
            .iter_mut()
            .zip(payload[Self::COLOR..].chunks_exact(3))
        {
            *color = Rgb::new(rgb[0], rgb[1], rgb[2]);
        }
        chunk
    }
}

// Highest chunk count whose offsets still fit in a u16.
const MAX_CHUNKS: usize = u16::MAX as usize / LEDS_PER_MESSAGE + 1;

/// Splits a led buffer into consecutive [`ColorChunk`]s.
///
/// Chunk `i` starts at led `i * LEDS_PER_MESSAGE`, the tail of the last chunk
/// is padded with black and only the last chunk has the show after flag.
/// Leds that can't be addressed by a u16 offset are dropped.
pub fn chunk_leds(leds: &[Rgb]) -> Chunks<'_> {
    let count = min(
        (leds.len() + LEDS_PER_MESSAGE - 1) / LEDS_PER_MESSAGE,
        MAX_CHUNKS,
    );
    Chunks {
        leds,
        index: 0,
        count,
    }
}

/// Iterator returned by [`chunk_leds`].
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    leds: &'a [Rgb],
    index: usize,
    count: usize,
}

impl Iterator for Chunks<'_> {
    type Item = ColorChunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let start = self.index * LEDS_PER_MESSAGE;
        let end = min(start + LEDS_PER_MESSAGE, self.leds.len());
        let mut chunk = ColorChunk::new(start as u16);
        chunk.color[..end - start].copy_from_slice(&self.leds[start..end]);

        self.index += 1;
        Some(chunk.with_show_after(self.index == self.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

/// A single frame worth of message.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Message {
    Nop,
    Config(Config),
    Color(ColorChunk),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Nop => MessageType::Nop,
            Message::Config(_) => MessageType::Config,
            Message::Color(_) => MessageType::Color,
        }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

impl Default for Message {
    fn default() -> Self {
        Message::Nop
    }
}

impl From<Config> for Message {
    fn from(config: Config) -> Self {
        Message::Config(config)
    }
}

impl From<ColorChunk> for Message {
    fn from(chunk: ColorChunk) -> Self {
        Message::Color(chunk)
    }
}

/// How the decoder treats the reserved header bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeMode {
    /// Non zero reserved bytes are ignored.
    Lenient,
    /// Non zero reserved bytes are rejected.
    Strict,
}

impl Default for DecodeMode {
    fn default() -> Self {
        DecodeMode::Lenient
    }
}

/// Serializes a message to its frame.
/// The reserved bytes and every payload byte the variant doesn't use are zero.
pub fn encode(message: &Message) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = message.message_type().int_value();

    let payload = &mut frame[HEADER_LEN..];
    match message {
        Message::Nop => {}
        Message::Config(config) => config.write_payload(payload),
        Message::Color(chunk) => chunk.write_payload(payload),
    }

    frame
}

/// Deserializes a frame, ignoring the reserved bytes.
pub fn decode(bytes: &[u8]) -> Result<Message> {
    decode_with(bytes, DecodeMode::Lenient)
}

pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<Message> {
    if bytes.len() != FRAME_LEN {
        return Err(DecodeError::Length {
            actual: bytes.len(),
        });
    }

    let tag = bytes[0];
    let message_type = MessageType::from_int(tag).map_err(|_| DecodeError::UnknownType(tag))?;

    let reserved = [bytes[1], bytes[2], bytes[3]];
    if mode == DecodeMode::Strict && reserved != [0; 3] {
        return Err(DecodeError::ReservedField(reserved));
    }

    let payload = &bytes[HEADER_LEN..];
    let message = match message_type {
        MessageType::Nop => Message::Nop,
        MessageType::Config => Message::Config(Config::read_payload(payload)),
        MessageType::Color => Message::Color(ColorChunk::read_payload(payload)),
    };

    Ok(message)
}
