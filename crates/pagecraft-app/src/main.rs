//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use pagecraft_app::{AppConfig, Shell};

    env_logger::init();
    log::info!("Starting Pagecraft");

    let mut config = AppConfig::default();
    if let Some(dir) = std::env::args_os().nth(1) {
        config.storage_dir = Some(dir.into());
    }

    let mut shell = match Shell::open(config) {
        Ok(shell) => shell,
        Err(e) => {
            log::error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = shell.run(stdin.lock(), stdout.lock()) {
        log::error!("Shell terminated: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
