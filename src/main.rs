//! Entry point: parse CLI, run one import and print the result.

use anyhow::Context;
use clap::Parser;
use league_import::{
    cli::{render_summary, resolve_credentials, Cli, Commands},
    ImportConfig, Importer,
};
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,league_import=info,reqwest=warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = Cli::parse();
    init_logging(app.log_json);

    match app.command {
        Commands::Import { target } => {
            let (platform, options, output) = target.into_parts();
            let credentials = resolve_credentials(platform, output.cookies)?;

            let config = ImportConfig::from_env().context("invalid LEAGUE_IMPORT_* settings")?;
            let importer = Importer::new(config)?;
            let outcome = importer.import_league(platform, options, credentials).await;
            importer.shutdown().await;

            let league = outcome.with_context(|| format!("{platform} import failed"))?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&league)?);
            } else {
                print!("{}", render_summary(&league));
            }
        }
    }

    Ok(())
}
