use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{error, info};

use crate::error::{ReportError, ReportResult};
use crate::models::time_entry::TimeEntry;

/// Somewhere time entries can be loaded from.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn fetch_entries(&self) -> ReportResult<Vec<TimeEntry>>;
}

pub fn api_client_init() -> ReportResult<Client> {
    info!("Initializing time entries API client");

    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    match Client::builder().default_headers(headers).build() {
        Ok(client) => {
            info!("API client initialized successfully");
            Ok(client)
        }
        Err(e) => {
            error!("Failed to build API client: {}", e);
            Err(e.into())
        }
    }
}

/// Loads entries with a single GET against the time entries endpoint.
pub struct HttpEntrySource {
    client: Client,
    url: String,
}

impl HttpEntrySource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl EntrySource for HttpEntrySource {
    async fn fetch_entries(&self) -> ReportResult<Vec<TimeEntry>> {
        info!("Fetching time entries from API");

        let response = match self.client.get(&self.url).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    let status = resp.status();
                    let error_text = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    error!("API returned error status {}: {}", status, error_text);
                    return Err(ReportError::Fetch(format!(
                        "API returned status {}: {}",
                        status, error_text
                    )));
                }
                resp
            }
            Err(e) => {
                error!("Failed to send request to API: {}", e);
                return Err(e.into());
            }
        };

        let text = match response.text().await {
            Ok(text) => {
                info!("Successfully received response from API");
                text
            }
            Err(e) => {
                error!("Failed to read response body: {}", e);
                return Err(e.into());
            }
        };

        parse_entries(&text)
    }
}

pub fn parse_entries(text: &str) -> ReportResult<Vec<TimeEntry>> {
    match serde_json::from_str::<Vec<TimeEntry>>(text) {
        Ok(entries) => {
            info!("Successfully parsed {} time entries", entries.len());
            Ok(entries)
        }
        Err(e) => {
            error!("Failed to parse API response: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port and returns its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api/gettimeentries", addr)
    }

    #[tokio::test]
    async fn fetches_entries_over_http() {
        let url = serve_once(
            "200 OK",
            r#"[{"EmployeeName": "A", "StarTimeUtc": "2022-02-22T08:00:00", "EndTimeUtc": "2022-02-22T10:00:00"}]"#,
        )
        .await;

        let source = HttpEntrySource::new(api_client_init().unwrap(), url);
        let entries = source.fetch_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration_hours(), 2.0);
    }

    #[tokio::test]
    async fn error_status_is_a_fetch_error() {
        let url = serve_once("500 Internal Server Error", "function crashed").await;

        let source = HttpEntrySource::new(api_client_init().unwrap(), url);
        match source.fetch_entries().await {
            Err(ReportError::Fetch(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("function crashed"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/", addr);
        let source = HttpEntrySource::new(api_client_init().unwrap(), url);
        let err = source.fetch_entries().await.unwrap_err();
        assert!(matches!(err, ReportError::Http(_)));
        assert!(err.to_string().starts_with("fetch stage failed"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_deserialize_error() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;

        let source = HttpEntrySource::new(api_client_init().unwrap(), url);
        let err = source.fetch_entries().await.unwrap_err();
        assert!(matches!(err, ReportError::Deserialize(_)));
    }

    #[test]
    fn parses_entry_array() {
        let body = r#"[
            {"Id": "1", "EmployeeName": "A", "StarTimeUtc": "2022-02-22T08:00:00", "EndTimeUtc": "2022-02-22T10:00:00", "EntryNotes": "", "DeletedOn": null},
            {"Id": "2", "EmployeeName": null, "StarTimeUtc": "2022-02-22T08:00:00", "EndTimeUtc": "2022-02-22T09:00:00", "EntryNotes": "", "DeletedOn": "2022-02-23T00:00:00"}
        ]"#;

        let entries = parse_entries(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_deref(), Some("1"));
        assert!(entries[1].employee_name.is_none());
    }

    #[test]
    fn non_array_body_is_a_deserialize_error() {
        let err = parse_entries(r#"{"error": "unauthorized"}"#).unwrap_err();
        assert!(matches!(err, ReportError::Deserialize(_)));
        assert!(err.to_string().starts_with("deserialization stage failed"));
    }
}
