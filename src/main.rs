//! doppler-speed CLI entry point.

#![allow(clippy::print_stderr)]

fn main() {
    if let Err(e) = doppler_speed::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
