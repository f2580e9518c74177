use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ns_core::logging::init_logging;
use ns_core::AppConfig;
use ns_scrapers::{handle_search, handle_url, SearchArgs, SearchManager, UrlArgs};
use ns_web::AppState;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search Naver news, extract article bodies and analyze them", long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long, help = "Model to use for analysis. Available models: openai (default), dummy")]
    model: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Search, fetch and extract articles
    Search(SearchArgs),
    /// Fetch and extract a single article URL
    Url(UrlArgs),
    /// Search and run a prompt over the accepted articles
    Analyze {
        query: String,
        /// Instruction given to the model
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long, default_value_t = 10)]
        display: u32,
    },
    /// Turn a voice recording into text, optionally searching with it
    Transcribe {
        /// Audio file (wav, mp3, m4a, webm, ...)
        file: PathBuf,
        /// Search news with the transcribed text
        #[arg(long)]
        search: bool,
        #[arg(short, long, default_value_t = 10)]
        display: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(model) = cli.model {
        config.inference.model = model;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate().context("refusing to start")?;

            let manager = SearchManager::from_config(&config)?;
            let inference_model = match ns_inference::create_model(&config.inference) {
                Ok(model) => {
                    info!("🧠 Inference model initialized (using {})", model.name());
                    Some(model)
                }
                Err(e) => {
                    warn!("⚠️ Analysis disabled: {}", e);
                    None
                }
            };

            let transcriber = match ns_inference::create_transcriber(&config.inference) {
                Ok(transcriber) => Some(transcriber),
                Err(e) => {
                    warn!("⚠️ Transcription disabled: {}", e);
                    None
                }
            };

            let state = AppState {
                manager: Arc::new(manager),
                inference_model,
                transcriber,
            };
            ns_web::serve(state, &config.server).await?;
        }
        Commands::Search(args) => {
            config.validate()?;
            let manager = SearchManager::from_config(&config)?;
            handle_search(args, &manager).await?;
        }
        Commands::Url(args) => {
            let manager = SearchManager::from_config(&config)?;
            handle_url(args, &manager).await?;
        }
        Commands::Analyze { query, prompt, display } => {
            config.validate()?;
            let model = ns_inference::create_model(&config.inference)?;
            let manager = SearchManager::from_config(&config)?;

            let assembly = manager.search(&query, display).await?;
            if assembly.response.is_empty() {
                println!("No articles found for '{}'", query);
                return Ok(());
            }
            info!("🧠 Analyzing {} articles with {}", assembly.response.total, model.name());
            let analysis = model.analyze(&prompt, &assembly.response.articles).await?;
            println!("{}", analysis);
        }
        Commands::Transcribe { file, search, display } => {
            if search {
                config.validate()?;
            }
            let transcriber = ns_inference::create_transcriber(&config.inference)?;
            let audio = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();

            info!("🎤 Transcribing {} ({} bytes)", file.display(), audio.len());
            let text = transcriber.transcribe(audio, filename).await?;
            println!("{}", text);

            if search {
                let manager = SearchManager::from_config(&config)?;
                let args = SearchArgs {
                    query: text,
                    display,
                    json: false,
                    show_dropped: false,
                };
                handle_search(args, &manager).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["ns", "search", "주식", "--display", "5", "--show-dropped"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "주식");
                assert_eq!(args.display, 5);
                assert!(args.show_dropped);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["ns", "--model", "dummy", "analyze", "AI", "-p", "요약해줘"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("dummy"));
        assert!(matches!(cli.command, Commands::Analyze { display: 10, .. }));
    }

    #[test]
    fn test_parse_transcribe() {
        let cli = Cli::try_parse_from(["ns", "transcribe", "voice.m4a", "--search", "-d", "5"]).unwrap();
        match cli.command {
            Commands::Transcribe { file, search, display } => {
                assert_eq!(file, PathBuf::from("voice.m4a"));
                assert!(search);
                assert_eq!(display, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
