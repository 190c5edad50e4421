//! keyclick - press a key, get a mouse click
//!
//! Listens for the configured trigger key and clicks through the first usable
//! backend in the configured priority list. Escape or Ctrl+C quits.

use clap::Parser;
use keyclick::input_listener::create_event_channel;
use keyclick::{logging, Backend, Config, Controller, InputListener, ListenerEvent, SystemInput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "keyclick", version, about = "Click the mouse when a trigger key is pressed")]
struct Args {
    /// Backend to use for this run (must also be listed in libraries.priority)
    #[arg(short, long, value_enum)]
    library: Option<Backend>,

    /// Print the known backends and exit
    #[arg(long)]
    list_libraries: bool,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_libraries {
        for backend in Backend::ALL {
            println!("{}", backend);
        }
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("keyclick starting...");
    info!(
        "Config: trigger='{}', button={}, priority={:?}",
        config.trigger_key, config.click_button, config.backend_priority
    );

    // Already logged by the controller
    let Ok(mut controller) = Controller::new(&config, args.library, SystemInput::new()) else {
        return ExitCode::FAILURE;
    };

    let (sender, receiver) = create_event_channel();

    let interrupt_sender = sender.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_sender.send(ListenerEvent::Interrupt);
    }) {
        warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let _listener_handle = InputListener::new(sender).start();
    info!(
        "Listening - press '{}' to click, Escape to quit",
        config.trigger_key
    );

    let reason = controller.run(&receiver);

    // The listener thread is blocked inside the OS hook; returning from
    // main ends it with the process.
    if reason.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
