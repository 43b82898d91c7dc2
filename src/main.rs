use clap::Parser;
use crosswatch::demo::{self, DemoOptions};

fn main() {
    env_logger::init();
    log::info!("crosswatch starting up");

    let opts = DemoOptions::parse();
    match demo::run(&opts) {
        Ok(report) => log::info!(
            "Done: {} frames, {} ticks{}",
            report.frames,
            report.ticks,
            if report.game_over { ", caught" } else { "" }
        ),
        Err(e) => {
            log::error!("Fatal error: {e}");
            std::process::exit(1);
        }
    }
}
