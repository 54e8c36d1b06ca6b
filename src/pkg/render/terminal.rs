use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::pkg::inventory::drink::Drink;
use crate::pkg::render::card::CardView;
use crate::pkg::render::Renderer;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Prints cards as plain text blocks.
pub struct TerminalRenderer {
    out: Mutex<Box<dyn Write + Send>>,
    nicknames: HashMap<String, String>,
    image_base_url: String,
    clear_screen: bool,
}

impl TerminalRenderer {
    pub fn stdout(nicknames: HashMap<String, String>, image_base_url: &str, clear_screen: bool) -> Self {
        Self::with_writer(
            Box::new(std::io::stdout()),
            nicknames,
            image_base_url,
            clear_screen,
        )
    }

    pub fn with_writer(
        out: Box<dyn Write + Send>,
        nicknames: HashMap<String, String>,
        image_base_url: &str,
        clear_screen: bool,
    ) -> Self {
        Self {
            out: Mutex::new(out),
            nicknames,
            image_base_url: image_base_url.to_string(),
            clear_screen,
        }
    }

    fn format_page(&self, drinks: &[Drink]) -> String {
        let mut text = String::new();
        if self.clear_screen {
            text.push_str(CLEAR_SCREEN);
        } else {
            // step off the clock line
            text.push('\n');
        }
        if drinks.is_empty() {
            text.push_str("Nothing on tap right now\n");
            return text;
        }
        for drink in drinks {
            let card = CardView::from_drink(drink, &self.nicknames, &self.image_base_url);
            text.push_str(&format!("┌ {}\n│ {}\n", card.brand, card.name));
            let details = card.details();
            if !details.is_empty() {
                text.push_str(&format!("│ {}\n", details));
            }
            text.push_str(&format!("└ {}\n\n", card.stock_line()));
        }
        text
    }
}

#[async_trait]
impl Renderer for TerminalRenderer {
    async fn render_page(&self, drinks: &[Drink]) -> Result<()> {
        let text = self.format_page(drinks);
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    async fn render_clock(&self, now: &str) -> Result<()> {
        let mut out = self.out.lock().await;
        write!(out, "\r🕒 {}", now)?;
        out.flush()?;
        Ok(())
    }
}
