use anyhow::Result;
use async_trait::async_trait;

use crate::pkg::inventory::drink::Drink;

/// Anything that can hand the board a fresh inventory snapshot.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn fetch_inventory(&self) -> Result<Vec<Drink>>;
    fn name(&self) -> &str;
}
