use std::time::Duration;

use log::{error, warn};
use rand::Rng;
use reqwest::{Client, Request, Response, StatusCode};

/// Sends requests, retrying transient failures a bounded number of times.
pub struct RetryClient {
    http_client: Client,
    max_retries: usize,
}

impl RetryClient {
    pub fn new(client: Option<Client>, max_retries: usize) -> Self {
        let http_client = client.unwrap_or_else(Client::new);
        Self {
            http_client,
            max_retries,
        }
    }

    pub fn http(&self) -> &Client {
        &self.http_client
    }

    pub async fn send_with_retry(&self, req: Request) -> Result<Response, reqwest::Error> {
        let mut retry_count = 0;

        loop {
            let attempt = match req.try_clone() {
                Some(r) => r,
                // streaming bodies cannot be replayed
                None => return self.http_client.execute(req).await,
            };

            match self.http_client.execute(attempt).await {
                Ok(resp) => {
                    if is_retryable_status(resp.status()) {
                        if retry_count >= self.max_retries {
                            error!("Max retries reached for {} response", resp.status());
                            return Ok(resp);
                        }
                        let delay = retry_delay(Some(&resp), retry_count);
                        warn!("{} from {}, retrying after {:?}", resp.status(), req.url(), delay);
                        tokio::time::sleep(delay).await;
                        retry_count += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(e) => {
                    if is_transient(&e) {
                        if retry_count >= self.max_retries {
                            error!("Max retries reached for transient error: {}", e);
                            return Err(e);
                        }
                        let delay = retry_delay(None, retry_count);
                        warn!("Transient error: {}. Retrying after {:?}", e, delay);
                        tokio::time::sleep(delay).await;
                        retry_count += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

fn retry_delay(resp: Option<&Response>, retry: usize) -> Duration {
    if let Some(seconds) = resp.and_then(|r| retry_after(r.headers())) {
        return Duration::from_secs(seconds);
    }
    backoff(retry)
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

fn backoff(retry: usize) -> Duration {
    let base = 2_f64.powi(retry.min(16) as i32);
    let jitter: f64 = rand::thread_rng().gen_range(0.75..1.25);
    Duration::from_secs_f64(base * jitter)
}

fn is_transient(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() {
        return true;
    }
    let err_str = err.to_string().to_lowercase();
    err_str.contains("timeout") || err_str.contains("connection reset")
}
