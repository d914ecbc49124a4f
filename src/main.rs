use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info};

use ytstamp::completion::{DEFAULT_MODEL, LlmClient};
use ytstamp::pipeline::TimestampGenerator;
use ytstamp::youtube::CaptionClient;

mod cli;

use cli::{Cli, OutputFormat};

const DEFAULT_LANG: &str = "en";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytstamp.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytstamp")
        .join("logs")
}

fn build_after_help() -> String {
    format!(
        "\nENVIRONMENT:\n  OPENAI_API_KEY      required for OpenAI models\n  ANTHROPIC_API_KEY   required for claude-* models\n  (also read from a .env file in the current directory or its parents)\n\nConfig is read from: {}\nLogs are written to: {}",
        ytstamp::config::config_path().display(),
        log_dir().join("ytstamp.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cmd = <Cli as clap::CommandFactory>::command().after_help(build_after_help());
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // .env before anything reads API keys (non-fatal if missing)
    ytstamp::config::load_env_file(None);

    // Load config file (non-fatal if missing/invalid)
    let config = ytstamp::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| DEFAULT_LANG.to_string());
    let format = match (cli.format, config.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => OutputFormat::from_str(name, true)
            .map_err(|e| eyre::eyre!("invalid default_format in config: {e}"))?,
        (None, None) => OutputFormat::Text,
    };

    if cli.verbose {
        let config_path = ytstamp::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Model: {model}\nLanguage: {lang}");
    }
    debug!("Resolved model={model} lang={lang} format={format:?}");

    let http = reqwest::Client::new();
    let completions = LlmClient::from_env(http.clone(), &model)?;
    debug!("Completion provider: {}", completions.provider());
    let transcripts = CaptionClient::new(http, lang);

    let mut generator = TimestampGenerator::new(transcripts, completions, model);
    if let Some(system_prompt) = config.system_prompt {
        generator = generator.with_system_prompt(system_prompt);
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    let urls: Vec<String> = urls
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if urls.is_empty() {
        bail!("no URL provided\n\nUsage: ytstamp <URL>\n       echo <URL> | ytstamp");
    }

    let mut rendered = Vec::with_capacity(urls.len());
    for url in &urls {
        let result = generator.generate(url).await?;

        if cli.verbose {
            eprintln!("Video: {}", result.video_id);
        }

        rendered.push(match format {
            OutputFormat::Text => ytstamp::output::render_text(&result),
            OutputFormat::Json => ytstamp::output::render_json(&result, generator.model()),
        });
    }

    let rendered = rendered.join("\n\n");
    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    Ok(())
}
