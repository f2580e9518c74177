use clap::Args;
use ns_core::{Assembly, Result};

use crate::manager::SearchManager;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free-text query sent to the news search provider
    pub query: String,
    /// Number of search candidates to request (clamped to 1..=max)
    #[arg(short, long, default_value_t = 10)]
    pub display: u32,
    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
    /// Also list candidates that were dropped and why
    #[arg(long)]
    pub show_dropped: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UrlArgs {
    /// Article URL to fetch and extract
    pub url: String,
}

pub async fn handle_search(args: SearchArgs, manager: &SearchManager) -> Result<Assembly> {
    let assembly = manager.search(&args.query, args.display).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assembly.response)?);
    } else {
        println!("Found {} articles", assembly.response.total);
        for article in &assembly.response.articles {
            println!("📰 {} - {}", article.title, article.link);
            println!("{}\n", article.text);
        }
    }

    if args.show_dropped {
        for dropped in &assembly.dropped {
            eprintln!("⏭️ {} - {} ({})", dropped.title, dropped.link, dropped.reason);
        }
    }

    Ok(assembly)
}

pub async fn handle_url(args: UrlArgs, manager: &SearchManager) -> Result<()> {
    match manager.scrape_url(&args.url).await? {
        Ok(text) => println!("{}", text),
        Err(reason) => eprintln!("Failed to extract {}: {}", args.url, reason),
    }
    Ok(())
}
