use std::path::PathBuf;
use std::process::ExitCode;

use trailburst_app::error::AppError;
use trailburst_app::game_loop::run_salvo;
use trailburst_app::scenario::Scenario;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn run() -> Result<(), AppError> {
    let scenario = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading scenario");
            Scenario::load(&path)?
        }
        None => Scenario::default(),
    };

    let snapshot = run_salvo(&scenario)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "trailburst failed");
            ExitCode::FAILURE
        }
    }
}
