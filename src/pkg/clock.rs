use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use log::warn;
use tokio::time::{interval, MissedTickBehavior};

use crate::pkg::render::Renderer;

pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(format).to_string()
}

/// Re-renders the wall clock forever. Independent of the page loop.
pub async fn run_clock(renderer: Arc<dyn Renderer>, every: Duration, format: String) {
    let mut ticker = interval(every.max(Duration::from_millis(100)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now = format_time(&Local::now(), &format);
        if let Err(e) = renderer.render_clock(&now).await {
            warn!("⚠️ Failed to render clock: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::pkg::inventory::drink::Drink;

    #[derive(Default)]
    struct ClockSink {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Renderer for ClockSink {
        async fn render_page(&self, _drinks: &[Drink]) -> Result<()> {
            Ok(())
        }

        async fn render_clock(&self, now: &str) -> Result<()> {
            self.seen.lock().await.push(now.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_format_time() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 21, 7, 0).unwrap();
        assert_eq!(format_time(&t, "%-I:%M %p"), "9:07 PM");
        assert_eq!(format_time(&t, "%H:%M"), "21:07");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks_on_interval() {
        let sink = Arc::new(ClockSink::default());
        let task = tokio::spawn(run_clock(
            sink.clone(),
            Duration::from_millis(1000),
            "%H:%M".to_string(),
        ));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        task.abort();

        // immediate first tick, then one per second
        assert_eq!(sink.seen.lock().await.len(), 3);
    }
}
