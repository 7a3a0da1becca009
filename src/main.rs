//! qrstamp entrypoint

use chrono::Local;
use clap::Parser;
use qrstamp::{Error, QrStampConfig, Result, RunOutcome, RunRequest, app, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "qrstamp",
    version,
    about = "Validate a URL and save it as a timestamped QR code image"
)]
struct Cli {
    /// URL to encode. Defaults to the configured default URL.
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Optional configuration file (toml/yaml). Defaults to qrstamp.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory receiving the image (created if missing)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Color of the dark modules (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    fill_color: Option<String>,

    /// Background color (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    back_color: Option<String>,

    /// Decode the written image and check it matches the URL
    #[arg(long)]
    verify: bool,

    /// Print the run outcome as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("qrstamp: {err}");
            ExitCode::from(1)
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let mut config = QrStampConfig::load(cli.config.as_deref())?;

    if let Some(ref dir) = cli.output_dir {
        config.output.directory = dir.clone();
    }

    if let Some(ref color) = cli.fill_color {
        config.render.fill_color = color.parse().map_err(Error::Config)?;
    }

    if let Some(ref color) = cli.back_color {
        config.render.back_color = color.parse().map_err(Error::Config)?;
    }

    config.validate()?;

    let logger = logging::init(&config.logging)?;

    let request = RunRequest {
        url: cli.url.unwrap_or_else(|| config.output.default_url.clone()),
        now: Local::now().naive_local(),
        verify: cli.verify,
    };

    let outcome = logger.scope(|| {
        if let Some(ref source) = config.source {
            tracing::info!("Using configuration file: {}", source.display());
        }
        app::run(&config, &request)
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if let RunOutcome::Saved { file, .. } = &outcome {
        println!("{}", file.path.display());
    }

    Ok(())
}
