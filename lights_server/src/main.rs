use lights_server::{
    app::App,
    led_controllers::{LedBuffer, LedController},
    Opt,
};
use log::info;
use std::{fs::File, io::Read};
use structopt::StructOpt;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("Starting...");

    // Parse cmdline
    let opt: Opt = Opt::from_args();

    let controller = LedBuffer::new(opt.led_count)?;
    match &opt.input {
        Some(path) => {
            info!("Reading frames from {}", path.display());
            run_app(&opt, File::open(path)?, controller)
        }
        None => {
            info!("Reading frames from stdin");
            run_app(&opt, std::io::stdin(), controller)
        }
    }
}

fn run_app<R: Read, C: LedController>(opt: &Opt, reader: R, controller: C) -> anyhow::Result<()> {
    let mut app = App::new(reader, opt.decode_mode(), controller);
    app.run()
}
