use brushbatch_lib::commands::{run_import, TerminalProgress};
use brushbatch_lib::config::ImportSettings;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "brushbatch",
    version,
    about = "Convert every image in a folder into brush assets inside one library file"
)]
struct Cli {
    /// Folder holding the source images (not searched recursively)
    image_folder: PathBuf,

    /// Library file to create; ".brushlib" is appended when missing
    output: PathBuf,

    /// Existing library to start from; its brushes are kept and their names stay reserved
    #[arg(long)]
    base: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(long, env = "BRUSHBATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Author tag stamped on generated assets
    #[arg(long)]
    author: Option<String>,

    /// Milliseconds between two conversion ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    brushbatch_lib::init();
    let cli = Cli::parse();

    let mut settings = match ImportSettings::load_or_default(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(author) = cli.author {
        settings.author = author;
    }
    if let Some(tick_ms) = cli.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }

    let progress = if cli.quiet || cli.json {
        TerminalProgress::hidden()
    } else {
        TerminalProgress::new()
    };

    let summary =
        match run_import(cli.image_folder, cli.output, cli.base, settings, progress).await {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", summary);
    }

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
