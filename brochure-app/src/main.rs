use std::path::PathBuf;

use anyhow::Result;
use brochure_app::cli::{Cli, Command};
use brochure_app::server::{self, AppState, BrochureResponse};
use brochure_common::observability::{LogConfig, init_logging};
use brochure_config::{Settings, SettingsLoader};
use brochure_core::BrochureRequest;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // .env never overrides the real environment
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => SettingsLoader::new().with_file(path),
        None => SettingsLoader::new().with_optional_file("brochure.yaml"),
    };
    let settings: Settings = loader.load()?;

    let log_path = init_logging(LogConfig {
        app_name: "brochure",
        log_dir: settings.log_dir.as_ref().map(PathBuf::from),
        format: settings.log_format,
        ..LogConfig::default()
    })?;
    tracing::debug!(log_path = %log_path.display(), model = %settings.openai_chat_model, "startup");

    match cli.command() {
        Command::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| settings.bind_addr.clone());
            let state = AppState::from_settings(settings)?;
            server::serve(state, &bind_addr).await
        }
        Command::Generate {
            company,
            url,
            tone,
            json,
        } => {
            let request = BrochureRequest::new(company, url, Some(&tone));
            request.validate()?;
            let state = AppState::from_settings(settings)?;
            let result = state.generate(&request).await?;
            if json {
                let response = BrochureResponse::from(result);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}\n", result.brochure_markdown);
                println!("Sources:");
                for source in &result.sources {
                    println!("- {source}");
                }
            }
            Ok(())
        }
    }
}
