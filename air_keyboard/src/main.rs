//! air_keyboard: interactive entry point.

use air_keyboard::app::{run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Virtual Keyboard Started!");
    println!("Point your index finger at a key and curl it to type.");
    println!("Press 'q' or the EXIT key to quit.");

    #[cfg(feature = "mediapipe")]
    println!("  Mode: camera + MediaPipe hand tracking");
    #[cfg(not(feature = "mediapipe"))]
    println!("  Mode: mouse simulation  (hold the left button to press; --features hardware for a camera)");
    println!();

    let result = run(AppConfig::default());
    println!("Virtual Keyboard Closed!");

    match result {
        Ok(summary) => log::info!("typed {:?} ({:?})", summary.typed, summary.end),
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
