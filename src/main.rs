mod cli;
mod config;
mod model;
mod palette;
mod repository;
mod search;
mod storage;
mod telemetry;
mod tui;

use std::process;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
