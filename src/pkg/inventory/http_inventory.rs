use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use serde::Deserialize;

use crate::pkg::inventory::drink::Drink;
use crate::pkg::inventory::retry_client::RetryClient;
use crate::pkg::inventory::source::InventorySource;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    alive: bool,
}

/// Inventory API client (`GET /inventory`, `GET /inventory/sorted/...`).
pub struct HttpInventory {
    base_url: String,
    sort_by: Vec<String>,
    timeout: Duration,
    client: RetryClient,
}

impl HttpInventory {
    pub fn new(base_url: &str, sort_by: Vec<String>, timeout: Duration, max_retries: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sort_by,
            timeout,
            client: RetryClient::new(None, max_retries),
        }
    }

    pub fn inventory_url(&self) -> String {
        if self.sort_by.is_empty() {
            return format!("{}/inventory", self.base_url);
        }
        let fields: Vec<String> = self
            .sort_by
            .iter()
            .map(|f| format!("sortBy={}", f.trim()))
            .collect();
        format!("{}/inventory/sorted/{}", self.base_url, fields.join("&"))
    }

    /// Probes `/health`; only used for a startup log line.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let bytes = self.get_bytes(&url).await?;
        let parsed: HealthResponse =
            serde_json::from_slice(&bytes).context("health response is not JSON")?;
        Ok(parsed.alive)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let req = self.client.http().get(url).timeout(self.timeout).build()?;

        let resp = self
            .client
            .send_with_retry(req)
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(anyhow!("Non-200 response: {} - {}", status.as_u16(), body));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl InventorySource for HttpInventory {
    async fn fetch_inventory(&self) -> Result<Vec<Drink>> {
        let url = self.inventory_url();
        let bytes = self.get_bytes(&url).await?;

        // the API encodes an empty inventory as `null`
        let drinks: Option<Vec<Drink>> =
            serde_json::from_slice(&bytes).context("inventory response is not a drink list")?;
        let drinks = drinks.unwrap_or_default();

        info!("📥 Fetched {} drinks from {}", drinks.len(), url);
        Ok(drinks)
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serves each canned response to one connection, reporting request lines.
    async fn serve(responses: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for body in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let line = request.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(line);
                stream.write_all(body.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        (format!("http://{}", addr), rx)
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[test]
    fn test_inventory_url_variants() {
        let plain = HttpInventory::new("http://localhost:8081/", vec![], Duration::from_secs(1), 0);
        assert_eq!(plain.inventory_url(), "http://localhost:8081/inventory");

        let sorted = HttpInventory::new(
            "http://localhost:8081",
            vec!["Brand".into(), " Name".into()],
            Duration::from_secs(1),
            0,
        );
        assert_eq!(
            sorted.inventory_url(),
            "http://localhost:8081/inventory/sorted/sortBy=Brand&sortBy=Name"
        );
    }

    #[tokio::test]
    async fn test_fetch_inventory_parses_drinks() {
        let body = r#"[{"Barcode":"1","Brand":"A","Name":"One","Quantity":2},{"Barcode":"2","Brand":"B","Name":"Two","Quantity":1}]"#;
        let (url, mut requests) = serve(vec![response("200 OK", body)]).await;

        let api = HttpInventory::new(&url, vec![], Duration::from_secs(5), 0);
        let drinks = api.fetch_inventory().await.unwrap();

        assert_eq!(drinks.len(), 2);
        assert_eq!(drinks[1].name, "Two");
        assert_eq!(requests.recv().await.unwrap(), "GET /inventory HTTP/1.1");
    }

    #[tokio::test]
    async fn test_fetch_inventory_null_is_empty() {
        let (url, _requests) = serve(vec![response("200 OK", "null")]).await;
        let api = HttpInventory::new(&url, vec![], Duration::from_secs(5), 0);
        assert!(api.fetch_inventory().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_inventory_error_status() {
        let (url, _requests) = serve(vec![response("500 Internal Server Error", "db locked")]).await;
        let api = HttpInventory::new(&url, vec![], Duration::from_secs(5), 0);

        let err = api.fetch_inventory().await.unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("500"), "{msg}");
        assert!(msg.contains("db locked"), "{msg}");
    }

    #[tokio::test]
    async fn test_rate_limited_response_is_retried() {
        let limited = "HTTP/1.1 429 Too Many Requests\r\nRetry-After: 0\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let (url, mut requests) = serve(vec![limited, response("200 OK", "[]")]).await;

        let api = HttpInventory::new(&url, vec!["Brand".into()], Duration::from_secs(5), 1);
        let drinks = api.fetch_inventory().await.unwrap();

        assert!(drinks.is_empty());
        assert_eq!(
            requests.recv().await.unwrap(),
            "GET /inventory/sorted/sortBy=Brand HTTP/1.1"
        );
        assert!(requests.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_health_probe() {
        let (url, mut requests) = serve(vec![response("200 OK", r#"{"alive": true}"#)]).await;
        let api = HttpInventory::new(&url, vec![], Duration::from_secs(5), 0);

        assert!(api.health().await.unwrap());
        assert_eq!(requests.recv().await.unwrap(), "GET /health HTTP/1.1");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpInventory::new(&format!("http://{}", addr), vec![], Duration::from_secs(2), 0);
        assert!(api.fetch_inventory().await.is_err());
    }
}
