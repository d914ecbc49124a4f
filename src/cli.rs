use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytstamp",
    about = "Generate chapter timestamps for a YouTube video",
    version
)]
pub struct Cli {
    /// YouTube video URL (reads one URL per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json [config: default_format]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Preferred caption language [config: default_lang, fallback: en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// LLM model used to generate timestamps [config: default_model, fallback: gpt-4]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Show config, model and video details on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
