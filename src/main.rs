mod cli;

use cli::Args;
use eol_sync::adapters::outbound::console::StderrProgressReporter;
use eol_sync::adapters::outbound::network::{PortAuthenticator, PortCatalogClient};
use eol_sync::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use eol_sync::application::use_cases::SyncEolCountsUseCase;
use eol_sync::config::{
    discover_config, load_config_from_path, ConfigFile, RunSettings, CONFIG_FILENAME,
};
use eol_sync::shared::error::ExitCode;
use eol_sync::shared::Result;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // .env must be loaded before clap reads the environment
    dotenvy::dotenv().ok();
    let args = Args::parse_args();

    let exit_code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    let (config_path, overrides) = args.into_overrides();
    let config_file = load_config(config_path.as_deref())?;
    let settings = RunSettings::resolve(overrides, config_file)?;

    // Create adapters (Dependency Injection)
    let authenticator = PortAuthenticator::new(settings.credentials)?;
    let catalog = PortCatalogClient::new(settings.client)?;
    let progress_reporter = StderrProgressReporter::new();

    let use_case = SyncEolCountsUseCase::new(authenticator, catalog, progress_reporter);
    let report = use_case.execute(settings.request).await?;

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let colored = settings.output.is_none() && std::io::stdout().is_terminal();
    let formatter = FormatterFactory::create(settings.format, colored);
    let formatted_output = formatter.format(&report)?;

    let presenter = PresenterFactory::create(PresenterType::from(settings.output));
    presenter.present(&formatted_output)?;

    if report.has_failures() {
        Ok(ExitCode::SyncFailures)
    } else {
        Ok(ExitCode::Success)
    }
}

/// An explicit path must exist; otherwise the working directory is searched.
fn load_config(path: Option<&Path>) -> Result<Option<ConfigFile>> {
    match path {
        Some(path) => load_config_from_path(path).map(Some),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let config = discover_config(&cwd)?;
            if config.is_some() {
                eprintln!("📄 Auto-discovered config file: {}", CONFIG_FILENAME);
            }
            Ok(config)
        }
    }
}
