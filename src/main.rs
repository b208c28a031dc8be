//! cam-mapper: place video server cameras on the map from CSV sheets.

use std::path::Path;
use std::process::ExitCode;

use cam_mapper::cli::{self, HelpText, ParseOutcome, Registry, TerminalAction};
use cam_mapper::config::Config;
use cam_mapper::export::export;
use cam_mapper::inputs::expand_paths;
use cam_mapper::server::ServerClient;
use cam_mapper::sync;

const LOG_FILTER_ENV: &str = "RUST_LOG";

const USAGE: &str = "Usage: cam-mapper <files>";

const FOOTER: &str = "Rows are matched to channels by channel id, then by camera name. \
    Directories are read one level deep.";

fn main() -> ExitCode {
    let from_env = init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let registry = Registry::new();
    let mut config = Config::default();

    let outcome = match cli::parse(&registry, &mut config, &args) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.verbose && !from_env {
        log::set_max_level(log::LevelFilter::Info);
    }
    log::debug!("Resolved configuration: {:?}", config);

    match outcome {
        ParseOutcome::Terminate(TerminalAction::Help) => {
            cli::print_help(&registry, &config, &HelpText::new(USAGE).with_footer(FOOTER));
            ExitCode::SUCCESS
        }
        ParseOutcome::Terminate(TerminalAction::ListEncodings) => {
            cli::show_encodings();
            ExitCode::SUCCESS
        }
        ParseOutcome::Terminate(TerminalAction::ListCultures) => {
            cli::show_cultures();
            ExitCode::SUCCESS
        }
        ParseOutcome::Terminate(TerminalAction::Export(path)) => run_export(&config, &path),
        ParseOutcome::Continue(paths) => run_sync(&config, &paths),
    }
}

/// Start logging before the command line is parsed.
///
/// A `RUST_LOG` filter is used as given. Without one the level is warn until
/// `--verbose` raises it to info. Returns whether `RUST_LOG` is in effect.
fn init_logging() -> bool {
    let from_env = std::env::var_os(LOG_FILTER_ENV).is_some();

    let mut builder = env_logger::Builder::from_env(LOG_FILTER_ENV);
    if !from_env {
        builder.filter_level(log::LevelFilter::Trace);
    }
    builder.format_timestamp(None).init();

    if !from_env {
        log::set_max_level(log::LevelFilter::Warn);
    }
    from_env
}

fn runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn run_export(config: &Config, path: &Path) -> ExitCode {
    let result = runtime().map_err(|e| e.to_string()).and_then(|rt| {
        let client = ServerClient::new(config).map_err(|e| e.to_string())?;
        rt.block_on(export(&client, config, path))
            .map_err(|e| e.to_string())
    });

    match result {
        Ok(count) => {
            println!("Exported {} channels to {}", count, path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_sync(config: &Config, paths: &[String]) -> ExitCode {
    let files = match expand_paths(paths) {
        Ok(files) => files,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            println!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = match ServerClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let failed = rt.block_on(sync::run(&client, config, &files));
    if failed > 0 {
        log::warn!("{} of {} files were not applied", failed, files.len());
    }
    ExitCode::SUCCESS
}
