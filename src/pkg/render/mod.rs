pub mod card;
pub mod html;
pub mod terminal;

use anyhow::Result;
use async_trait::async_trait;

use crate::pkg::inventory::drink::Drink;

/// Output surface for the board. Each call replaces what was shown before.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render_page(&self, drinks: &[Drink]) -> Result<()>;
    async fn render_clock(&self, now: &str) -> Result<()>;
}
