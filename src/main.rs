//! # Voxel World Engine Entry Point
//!
//! Runs the headless smoke driver.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(err) = voxel_world_engine::run() {
        log::error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
