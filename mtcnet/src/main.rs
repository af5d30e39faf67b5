use clap::Parser;
use mtcnet::app::NetworkApp;

fn main() {
    env_logger::init();
    let app = NetworkApp::parse();
    log::info!("starting mtcnet at {}", chrono::Local::now().to_rfc3339());
    if let Err(e) = app.run() {
        log::error!("mtcnet failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
