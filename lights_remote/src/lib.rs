use anyhow::anyhow;
use lights_common::{reference, Message};
use std::str::FromStr;
use structopt::StructOpt;

pub mod lights;

#[derive(Clone, Debug, StructOpt)]
pub struct Opt {
    /// Brightness limiting factor between 0.0 and 1.0.
    /// Applied to every color sent, useful if the power supply is inadequate.
    #[structopt(short, long, default_value = "1.0")]
    pub limit_factor: f32,

    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, StructOpt)]
pub enum Command {
    /// Print a reference frame, to compare against another implementation.
    Dump {
        /// One of nop, config or color.
        kind: DumpKind,

        /// Print hex instead of decimal bytes.
        #[structopt(long)]
        hex: bool,
    },

    /// Set the whole led string to a single color.
    Fill {
        /// Serial port of the microcontroller, the available ports are listed if absent.
        #[structopt(short, long)]
        port: Option<String>,

        r: u8,
        g: u8,
        b: u8,
    },

    /// Send a new configuration to the firmware.
    #[structopt(name = "config")]
    SetConfig {
        /// Serial port of the microcontroller, the available ports are listed if absent.
        #[structopt(short, long)]
        port: Option<String>,

        /// Delay after activity before the decay kicks in, 0 disables the decay.
        #[structopt(long, default_value = "0")]
        decay_time_delay_ms: u32,

        /// Interval between two decay steps.
        #[structopt(long, default_value = "0")]
        decay_interval_us: u32,

        /// Amount subtracted from every channel at each decay step.
        #[structopt(long, default_value = "0")]
        decay_amount: u32,

        #[structopt(long, default_value = "1.0")]
        gamma_r: f32,

        #[structopt(long, default_value = "1.0")]
        gamma_g: f32,

        #[structopt(long, default_value = "1.0")]
        gamma_b: f32,
    },

    /// Scroll a rainbow along the led string.
    Demo {
        /// Serial port of the microcontroller, the available ports are listed if absent.
        #[structopt(short, long)]
        port: Option<String>,

        /// Amount of LEDs on the string.
        #[structopt(short = "c", long)]
        led_count: usize,

        /// Delay between two updates in milliseconds.
        #[structopt(long, default_value = "50")]
        period: u64,

        /// Stop after this many updates, runs forever otherwise.
        #[structopt(short, long)]
        iterations: Option<usize>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DumpKind {
    Nop,
    Config,
    Color,
}

impl FromStr for DumpKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nop" => Ok(Self::Nop),
            "config" => Ok(Self::Config),
            "color" => Ok(Self::Color),
            _ => Err(anyhow!("Unknown frame kind !")),
        }
    }
}

/// Reference frame for each kind, see [`lights_common::reference`].
pub fn reference_message(kind: DumpKind) -> Message {
    match kind {
        DumpKind::Nop => Message::Nop,
        DumpKind::Config => Message::Config(reference::config()),
        DumpKind::Color => Message::Color(reference::color_chunk()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lights_common::hexdump;

    #[test]
    fn parse_dump_kind() {
        assert_eq!("NOP".parse::<DumpKind>().unwrap(), DumpKind::Nop);
        assert_eq!("config".parse::<DumpKind>().unwrap(), DumpKind::Config);
        assert_eq!("Color".parse::<DumpKind>().unwrap(), DumpKind::Color);
        assert!("rgb".parse::<DumpKind>().is_err());
    }

    #[test]
    fn reference_config_dump() {
        let frame = reference_message(DumpKind::Config).to_bytes();
        let dump = hexdump(&frame);
        assert!(dump.starts_with(
            "1, 0, 0, 0, 239, 190, 173, 222, 4, 3, 2, 1, 244, 243, 242, 241, 59, 170, 170, 62, 0, 0, 128, 63, 0, 0, 0, 0, 0"
        ));
        assert_eq!(dump.split(", ").count(), 64);
    }

    #[test]
    fn reference_color_dump() {
        let frame = reference_message(DumpKind::Color).to_bytes();
        assert_eq!(&frame[..8], &[2, 0, 0, 0, 2, 1, 171, 0]);
        assert_eq!(frame[63], 56);
    }

    #[test]
    fn parse_args() {
        let opt = Opt::from_iter(&["lights_remote", "-l", "0.5", "fill", "-p", "/dev/ttyACM0", "1", "2", "3"]);
        assert_eq!(opt.limit_factor, 0.5);
        match opt.cmd {
            Command::Fill { port, r, g, b } => {
                assert_eq!(port.as_deref(), Some("/dev/ttyACM0"));
                assert_eq!((r, g, b), (1, 2, 3));
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn port_is_optional() {
        let opt = Opt::from_iter(&["lights_remote", "demo", "-c", "10"]);
        match opt.cmd {
            Command::Demo { port, led_count, .. } => {
                assert_eq!(port, None);
                assert_eq!(led_count, 10);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn dump_matches_shared_fixtures() {
        for (kind, message) in [DumpKind::Nop, DumpKind::Config, DumpKind::Color]
            .iter()
            .zip(reference::messages().iter())
        {
            assert_eq!(reference_message(*kind).to_bytes(), message.to_bytes());
        }
    }
}
