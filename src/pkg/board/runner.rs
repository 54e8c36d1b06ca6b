use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::pkg::board::session::DisplaySession;
use crate::pkg::inventory::source::InventorySource;
use crate::pkg::render::Renderer;

/// Drives fetch → display → wait, one cycle at a time.
pub struct BoardRunner {
    source: Arc<dyn InventorySource>,
    renderer: Arc<dyn Renderer>,
    session: DisplaySession,
    retry_delay: Duration,
    debug: bool,
}

impl BoardRunner {
    pub fn new(
        source: Arc<dyn InventorySource>,
        renderer: Arc<dyn Renderer>,
        session: DisplaySession,
        retry_delay: Duration,
        debug: bool,
    ) -> Self {
        Self {
            source,
            renderer,
            session,
            retry_delay,
            debug,
        }
    }

    pub fn session(&self) -> &DisplaySession {
        &self.session
    }

    /// Runs one cycle and returns how long to wait before the next one.
    ///
    /// A failed fetch leaves the cursor and the visible page alone.
    pub async fn run_cycle(&mut self) -> Duration {
        let drinks = match self.source.fetch_inventory().await {
            Ok(d) => d,
            Err(e) => {
                warn!(
                    "⚠️ Inventory fetch from {} failed, retrying in {:?}: {:#}",
                    self.source.name(),
                    self.retry_delay,
                    e
                );
                return self.retry_delay;
            }
        };

        let cycle = self.session.display(drinks.len());
        let page = &drinks[cycle.slice.start..cycle.slice.end];

        if let Err(e) = self.renderer.render_page(page).await {
            warn!("⚠️ Failed to render page: {:#}", e);
        }

        info!(
            "🍺 Showing {}-{} of {} drinks, next page in {:?}",
            cycle.slice.start,
            cycle.slice.end,
            cycle.item_count,
            cycle.delay
        );
        if self.debug {
            let names: Vec<&str> = page.iter().map(|d| d.name.as_str()).collect();
            info!("[Debug] Cycle {} page contents: {:?}", self.session.cycles(), names);
        }

        cycle.delay
    }

    /// Loops until `shutdown` resolves. Shutdown is only observed between cycles.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let delay = self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    self.session.resume();
                }
                _ = &mut shutdown => {
                    info!("🛑 Shutdown signal received");
                    break;
                }
            }
        }
    }
}
