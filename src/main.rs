mod app;
mod colour;
mod compute;
mod config;
mod display;
mod error;
mod export;
mod input;
mod mandelbrot;
mod pixel;
mod screen;
mod session;
mod uniform;
mod viewport;

use log::error;

fn main() {
    env_logger::init();

    if let Err(err) = app::run(config::Settings::default()) {
        error!("{}", err);
        std::process::exit(1);
    }
}
