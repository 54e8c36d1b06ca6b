use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use tokio::fs;

use crate::pkg::inventory::drink::Drink;
use crate::pkg::render::card::CardView;
use crate::pkg::render::Renderer;

pub const BOARD_FILE: &str = "index.html";
pub const CLOCK_FILE: &str = "clock.html";

/// Writes the board as static HTML for a kiosk browser.
pub struct HtmlRenderer {
    output_dir: PathBuf,
    nicknames: HashMap<String, String>,
    image_base_url: String,
    refresh_secs: u64,
    show_clock: bool,
}

impl HtmlRenderer {
    pub async fn new(
        output_dir: &Path,
        nicknames: HashMap<String, String>,
        image_base_url: &str,
        refresh_secs: u64,
        show_clock: bool,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("cannot create output dir {:?}", output_dir))?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            nicknames,
            image_base_url: image_base_url.to_string(),
            refresh_secs: refresh_secs.max(1),
            show_clock,
        })
    }

    pub fn board_path(&self) -> PathBuf {
        self.output_dir.join(BOARD_FILE)
    }

    pub fn clock_path(&self) -> PathBuf {
        self.output_dir.join(CLOCK_FILE)
    }

    fn board_html(&self, drinks: &[Drink]) -> String {
        let mut cards = String::new();
        for drink in drinks {
            let card = CardView::from_drink(drink, &self.nicknames, &self.image_base_url);
            cards.push_str(&format!(
                concat!(
                    "    <div class=\"grid-item\">\n",
                    "      <img class=\"logo\" src=\"{}\" alt=\"{}\">\n",
                    "      <div class=\"brand\">{}</div>\n",
                    "      <div class=\"name\">{}</div>\n",
                    "      <div class=\"details\">{}</div>\n",
                    "      <div class=\"quantity\">{}</div>\n",
                    "    </div>\n",
                ),
                escape(&card.image_url),
                escape(&card.name),
                escape(&card.brand),
                escape(&card.name),
                escape(&card.details()),
                escape(&card.stock_line()),
            ));
        }

        // clock.html only exists while the clock task runs
        let clock_frame = if self.show_clock {
            format!("  <iframe class=\"clock\" src=\"{}\"></iframe>\n", CLOCK_FILE)
        } else {
            String::new()
        };

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head>\n",
                "  <meta charset=\"utf-8\">\n",
                "  <meta http-equiv=\"refresh\" content=\"{}\">\n",
                "  <title>Beer Board</title>\n",
                "</head>\n",
                "<body>\n",
                "{}",
                "  <div id=\"beer-list\">\n",
                "{}",
                "  </div>\n",
                "</body>\n",
                "</html>\n",
            ),
            self.refresh_secs, clock_frame, cards
        )
    }

    fn clock_html(&self, now: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><meta http-equiv=\"refresh\" content=\"{}\"></head>\n<body><div id=\"clock\">{}</div></body>\n</html>\n",
            self.refresh_secs,
            escape(now)
        )
    }
}

#[async_trait]
impl Renderer for HtmlRenderer {
    async fn render_page(&self, drinks: &[Drink]) -> Result<()> {
        let path = self.board_path();
        write_atomic(&path, &self.board_html(drinks)).await?;
        debug!("Wrote {} cards to {:?}", drinks.len(), path);
        Ok(())
    }

    async fn render_clock(&self, now: &str) -> Result<()> {
        write_atomic(&self.clock_path(), &self.clock_html(now)).await
    }
}

/// Readers never see a half-written page.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("html.tmp");
    fs::write(&tmp, contents)
        .await
        .with_context(|| format!("write {:?}", tmp))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drink(name: &str) -> Drink {
        Drink {
            barcode: "7".into(),
            brand: "Dogfish Head".into(),
            name: name.into(),
            abv: 6.0,
            ibu: 60.0,
            style: "IPA".into(),
            logo: "https://labels.example.com/60min.png".into(),
            date: 0,
            quantity: 2,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[tokio::test]
    async fn test_render_page_writes_board() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("board");
        let r = HtmlRenderer::new(&out, HashMap::new(), "http://board.local/images", 2, true)
            .await
            .unwrap();

        r.render_page(&[drink("60 Minute"), drink("Fish & <Chips>")])
            .await
            .unwrap();

        let html = std::fs::read_to_string(r.board_path()).unwrap();
        assert_eq!(html.matches("class=\"grid-item\"").count(), 2);
        assert!(html.contains("src=\"http://board.local/images/60min.png\""));
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(html.contains("content=\"2\""));
        assert!(html.contains("<iframe class=\"clock\" src=\"clock.html\">"));
        assert!(!out.join("index.html.tmp").exists());
    }

    #[tokio::test]
    async fn test_render_page_replaces_previous_set() {
        let dir = tempfile::tempdir().unwrap();
        let r = HtmlRenderer::new(dir.path(), HashMap::new(), "/images", 1, true)
            .await
            .unwrap();

        r.render_page(&[drink("First")]).await.unwrap();
        r.render_page(&[drink("Second")]).await.unwrap();

        let html = std::fs::read_to_string(r.board_path()).unwrap();
        assert!(!html.contains("First"));
        assert!(html.contains("Second"));
    }

    #[tokio::test]
    async fn test_board_without_clock_has_no_frame() {
        let dir = tempfile::tempdir().unwrap();
        let r = HtmlRenderer::new(dir.path(), HashMap::new(), "/images", 1, false)
            .await
            .unwrap();

        r.render_page(&[drink("Solo")]).await.unwrap();

        let html = std::fs::read_to_string(r.board_path()).unwrap();
        assert!(!html.contains("<iframe"));
        assert!(!html.contains(CLOCK_FILE));
        assert!(html.contains("Solo"));
    }

    #[tokio::test]
    async fn test_render_clock_writes_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let r = HtmlRenderer::new(dir.path(), HashMap::new(), "/images", 1, true)
            .await
            .unwrap();

        r.render_clock("10:05 AM").await.unwrap();

        let html = std::fs::read_to_string(r.clock_path()).unwrap();
        assert!(html.contains("<div id=\"clock\">10:05 AM</div>"));
    }
}
