mod error;
mod gatherer;

use anyhow::{bail, Result};
use futures::stream::FuturesOrdered;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: gatherer-scraper <card-url>...");
    }

    let fetcher = gatherer::CardFetcher::new()?;
    let mut records = urls
        .iter()
        .map(|url| fetcher.fetch(url))
        .collect::<FuturesOrdered<_>>();

    while let Some(record) = records.next().await {
        println!("{}", serde_json::to_string_pretty(&record?)?);
    }

    Ok(())
}
