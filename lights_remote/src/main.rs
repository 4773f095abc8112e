use anyhow::bail;
use cichlid::{prelude::RainbowFillSingleCycle, ColorRGB};
use lights_common::{hexdump, hexdump_hex, Config, Rgb};
use lights_remote::{
    lights::{available_ports, Lights},
    reference_message, Command, Opt,
};
use log::{debug, info};
use serialport::SerialPort;
use std::{thread::sleep, time::Duration};
use structopt::StructOpt;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse cmdline
    let opt: Opt = Opt::from_args();
    debug!("{:?}", opt);

    match opt.cmd {
        Command::Dump { kind, hex } => {
            let frame = reference_message(kind).to_bytes();
            if hex {
                println!("{}", hexdump_hex(&frame));
            } else {
                println!("{}", hexdump(&frame));
            }
        }
        Command::Fill { ref port, r, g, b } => {
            let mut lights = match open(port.as_deref(), opt.limit_factor)? {
                Some(lights) => lights,
                None => return Ok(()),
            };
            lights.fill(Rgb::new(r, g, b))?;
            info!("Filled with {:06x}", Rgb::new(r, g, b).to_u32());
        }
        Command::SetConfig {
            ref port,
            decay_time_delay_ms,
            decay_interval_us,
            decay_amount,
            gamma_r,
            gamma_g,
            gamma_b,
        } => {
            let config = Config {
                decay_time_delay_ms,
                decay_interval_us,
                decay_amount,
                gamma_r,
                gamma_g,
                gamma_b,
            };
            if !config.decay_enabled() {
                info!("Decay disabled");
            }
            if let Some(mut lights) = open(port.as_deref(), opt.limit_factor)? {
                lights.set_config(&config)?;
            }
        }
        Command::Demo {
            ref port,
            led_count,
            period,
            iterations,
        } => {
            if led_count == 0 {
                bail!("The led count must be at least 1 !");
            }
            let lights = match open(port.as_deref(), opt.limit_factor)? {
                Some(lights) => lights,
                None => return Ok(()),
            };
            run_demo(lights, led_count, Duration::from_millis(period), iterations)?;
        }
    }

    Ok(())
}

/// Lists the available ports instead when no port is given.
fn open(
    port: Option<&str>,
    limit_factor: f32,
) -> anyhow::Result<Option<Lights<Box<dyn SerialPort>>>> {
    let port = match port {
        Some(port) => port,
        None => {
            println!("Ports: {:#?}", available_ports()?);
            return Ok(None);
        }
    };

    let mut lights = Lights::open(port)?;
    lights.set_limit_factor(limit_factor);
    Ok(Some(lights))
}

fn run_demo(
    mut lights: Lights<Box<dyn SerialPort>>,
    led_count: usize,
    period: Duration,
    iterations: Option<usize>,
) -> anyhow::Result<()> {
    info!("Running the rainbow on {} leds", led_count);

    let mut colors = vec![ColorRGB::Black; led_count];
    let mut leds = vec![Rgb::BLACK; led_count];
    let mut hue = 0u8;
    let mut done = 0;
    while iterations.map_or(true, |max| done < max) {
        colors.rainbow_fill_single_cycle(hue);
        for (led, color) in leds.iter_mut().zip(colors.iter()) {
            *led = Rgb::new(color.r, color.g, color.b);
        }
        lights.set_leds(&leds)?;

        hue = hue.wrapping_add(5);
        done += 1;
        sleep(period);
    }

    info!("Demo done, {} frames sent", lights.frames_sent());
    Ok(())
}
