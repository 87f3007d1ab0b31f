use clap::Parser;
use std::process::ExitCode;
use sway_mru::config::{log_level, CycleArgs};
use sway_mru::cycle::run_cycle;
use sway_mru::pause::PauseSignal;
use sway_mru::state_store::StateStore;
use sway_mru::sway_client::RealSwayClient;
use tracing::error;

fn main() -> ExitCode {
    let args = match CycleArgs::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level(args.verbose, tracing::Level::WARN))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = RealSwayClient::new().and_then(|mut client| {
        run_cycle(
            &mut client,
            &StateStore::default_location(),
            &PauseSignal::default_location(),
            args.direction,
        )
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
