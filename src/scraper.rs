use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

#[async_trait]
pub trait Scraper {
    /// Raw spot price body, decoded as untyped JSON.
    async fn fetch_spot_price(&self) -> anyhow::Result<Value>;
}

/// GETs a Coinbase-style spot price endpoint. The HTTP status is not checked;
/// whatever JSON comes back is handed to the transformer.
pub struct CoinbaseScraper {
    client: Client,
    url: String,
}

impl CoinbaseScraper {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Scraper for CoinbaseScraper {
    async fn fetch_spot_price(&self) -> anyhow::Result<Value> {
        let response = self.client.get(&self.url).send().await?;
        debug!("Spot price responded with {}", response.status());

        let payload = response.json::<Value>().await?;
        Ok(payload)
    }
}
