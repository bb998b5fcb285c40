use std::path::PathBuf;

use brochure_core::DEFAULT_TONE;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "brochure",
    version,
    about = "Generate a company brochure from its website"
)]
pub struct Cli {
    /// YAML settings file (defaults to ./brochure.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the web server (default)
    Serve {
        /// Listen address, overriding `bind_addr`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate one brochure and print it
    Generate {
        #[arg(long)]
        company: String,
        #[arg(long)]
        url: String,
        #[arg(long, default_value = DEFAULT_TONE)]
        tone: String,
        /// Print the JSON API response instead of Markdown
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { bind: None })
    }
}
