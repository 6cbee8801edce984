//! Shared HTTP plumbing for provider adapters

use super::settings::{ProviderSettings, ProviderSetupError};
use parley_application::{ProviderError, ProviderErrorKind};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn build_client(settings: &ProviderSettings) -> Result<Client, ProviderSetupError> {
    Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(|err| ProviderSetupError::Client {
            provider: settings.id.clone(),
            detail: err.to_string(),
        })
}

/// Map an HTTP status to an error category.
pub fn classify_status(status: StatusCode) -> ProviderErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Auth,
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimit,
        StatusCode::NOT_FOUND => ProviderErrorKind::InvalidModel,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderErrorKind::Timeout,
        _ => ProviderErrorKind::Other,
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Object { message: String },
    Text(String),
}

/// Build the error for a non-2xx response.
///
/// Uses `error.message` from a JSON body when present, the raw body
/// otherwise.
pub fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorBody::Object { message } | ErrorBody::Text(message),
        }) => message,
        Err(_) => body.trim().to_string(),
    };
    ProviderError::new(
        classify_status(status),
        format!("API error (Status: {}): {}", status.as_u16(), message),
    )
}

pub fn map_transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::timeout(format!("{} request timed out", provider))
    } else {
        ProviderError::network(format!("{} request failed: {}", provider, err))
    }
}

/// Send a prepared request and decode a JSON success body.
pub async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|err| map_transport_error(provider, err))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        debug!(provider, status = status.as_u16(), "Provider returned error status");
        return Err(map_http_error(status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ProviderError::other(format!("Failed to parse {} response: {}", provider, err)))
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server for adapter tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    pub struct Captured {
        pub head: String,
        pub body: String,
    }

    /// Serve one request with `status` and `body`; returns the base URL and
    /// a handle yielding what the client sent.
    pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let (head_end, content_length) = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .map(|v| v.trim().parse::<usize>().unwrap())
                        .unwrap_or(0);
                    break (pos + 4, length);
                }
            };
            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body");
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            Captured {
                head: String::from_utf8_lossy(&buf[..head_end]).to_string(),
                body: String::from_utf8_lossy(&buf[head_end..head_end + content_length])
                    .to_string(),
            }
        });
        (format!("http://{}", addr), handle)
    }
}
