//! Media downloads: CDN images, two-phase file downloads and
//! cookie-authenticated videos.
//!
//! Every call opens its own request(s) and reads the body to completion or
//! drops it; nothing is cached and nothing is retried.

pub mod file;
pub mod sniff;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::types::{RetrievedFile, RetrievedMedia};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::StatusCode;
use std::sync::Arc;

pub use file::FileFetch;
pub use sniff::detect_content_type;

#[derive(Clone)]
pub struct MediaRetriever {
    http: reqwest::Client,
    file_base: String,
    token: String,
    log: Arc<dyn Logger>,
}

impl MediaRetriever {
    pub fn new(config: &Config, log: Arc<dyn Logger>) -> Result<Self> {
        Ok(Self::with_client(config, config.http_client()?, log))
    }

    pub fn with_client(config: &Config, http: reqwest::Client, log: Arc<dyn Logger>) -> Self {
        Self {
            http,
            file_base: config.file_base.clone(),
            token: config.token.clone(),
            log,
        }
    }

    /// Fetch an image from the GroupMe image service.
    ///
    /// Append `.large`, `.preview` or `.avatar` to the URL for resized
    /// variants. The status code is not checked.
    pub async fn download_image(&self, url: &str) -> Result<RetrievedMedia> {
        let response = self.http.get(url).send().await.inspect_err(|e| {
            self.log.error(&format!("Failed to download image: {}", e));
        })?;

        let header_mime = content_type(&response);
        let bytes = response.bytes().await.inspect_err(|e| {
            self.log.error(&format!("Failed to read image body: {}", e));
        })?;

        Ok(resolve(bytes.to_vec(), header_mime))
    }

    /// Download an attached file: metadata lookup, then content.
    ///
    /// Fails with [`Error::EmptyMetadata`] when the file is no longer
    /// available; no content request is made in that case.
    pub async fn download_file(&self, conversation_id: &str, file_id: &str) -> Result<RetrievedFile> {
        let mut state = FileFetch::new(conversation_id, file_id);
        loop {
            state = match state {
                FileFetch::ContentFetched(file) => return Ok(file),
                pending => pending.advance(self).await?,
            };
        }
    }

    /// Fetch a video. Authenticates with a `token` cookie rather than the
    /// access-token header, and only accepts 200.
    ///
    /// The preview image is not downloaded.
    pub async fn download_video(&self, _preview_url: &str, video_url: &str) -> Result<RetrievedMedia> {
        let response = self
            .http
            .get(video_url)
            .header(COOKIE, format!("token={}", self.token))
            .send()
            .await
            .inspect_err(|e| {
                self.log.error(&format!("Failed to download video: {}", e));
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            self.log
                .error(&format!("Failed to download video: status {}", status.as_u16()));
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let header_mime = content_type(&response);
        let bytes = response.bytes().await.inspect_err(|e| {
            self.log.error(&format!("Failed to read video body: {}", e));
        })?;
        Ok(resolve(bytes.to_vec(), header_mime))
    }
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Header value if there was one, else whatever the bytes look like.
fn resolve(bytes: Vec<u8>, header_mime: Option<String>) -> RetrievedMedia {
    let mime = header_mime.unwrap_or_else(|| detect_content_type(&bytes).to_string());
    RetrievedMedia { bytes, mime }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logger::testing::{Level, RecordingLogger};
    use axum::body::Body;
    use axum::http::{HeaderMap, Response, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::Router;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01";

    pub async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    pub fn retriever(file_base: &str, log: Arc<RecordingLogger>) -> MediaRetriever {
        let config = Config::new("tok").with_file_base(file_base);
        MediaRetriever::new(&config, log).unwrap()
    }

    /// Serve one connection per entry, in order. `Some` writes those bytes
    /// back verbatim, `None` closes the connection without answering.
    pub async fn serve_raw(replies: Vec<Option<Vec<u8>>>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                read_request(&mut stream).await;
                if let Some(bytes) = reply {
                    let _ = stream.write_all(&bytes).await;
                    let _ = stream.flush().await;
                }
            }
        });
        format!("http://{}", addr)
    }

    /// A bare HTTP/1.1 response announcing `declared_len` body bytes.
    pub fn raw_response(body: &[u8], declared_len: usize) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            declared_len
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    /// Drain headers and body so closing the socket does not reset it.
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let Ok(n) = stream.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    async fn dead_address() -> String {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    /// A response with no Content-Type at all.
    fn untyped(bytes: &'static [u8]) -> Response<Body> {
        Response::new(Body::from(bytes))
    }

    #[tokio::test]
    async fn test_image_without_content_type_is_sniffed() {
        let app = Router::new().route("/img", get(|| async { untyped(PNG) }));
        let base = serve(app).await;

        let media = retriever(&base, Default::default())
            .download_image(&format!("{}/img", base))
            .await
            .unwrap();
        assert_eq!(media.mime, "image/png");
        assert_eq!(media.bytes, PNG);
    }

    #[tokio::test]
    async fn test_image_header_wins_over_sniffing() {
        let app = Router::new().route(
            "/img",
            get(|| async { ([("content-type", "image/jpeg")], PNG) }),
        );
        let base = serve(app).await;

        let media = retriever(&base, Default::default())
            .download_image(&format!("{}/img", base))
            .await
            .unwrap();
        assert_eq!(media.mime, "image/jpeg");
    }

    #[tokio::test]
    async fn test_image_connection_failure_logs_error() {
        let base = dead_address().await;

        let log = Arc::new(RecordingLogger::default());
        let err = retriever("http://unused", log.clone())
            .download_image(&format!("{}/img", base))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(log.at(Level::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_image_truncated_body_logs_error() {
        let base = serve_raw(vec![Some(raw_response(&PNG[..8], 100))]).await;

        let log = Arc::new(RecordingLogger::default());
        let err = retriever(&base, log.clone())
            .download_image(&format!("{}/img", base))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        let errors = log.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to read image body"));
    }

    #[tokio::test]
    async fn test_video_connection_failure_logs_error() {
        let base = dead_address().await;

        let log = Arc::new(RecordingLogger::default());
        let err = retriever("http://unused", log.clone())
            .download_video("", &format!("{}/v.mp4", base))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        let errors = log.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to download video"));
    }

    #[tokio::test]
    async fn test_video_truncated_body_logs_error() {
        let base = serve_raw(vec![Some(raw_response(b"vid", 64))]).await;

        let log = Arc::new(RecordingLogger::default());
        let err = retriever(&base, log.clone())
            .download_video("", &format!("{}/v.mp4", base))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        let errors = log.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to read video body"));
    }

    #[tokio::test]
    async fn test_video_uses_token_cookie() {
        let app = Router::new().route(
            "/v.mp4",
            get(|headers: HeaderMap| async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                if cookie != "token=tok" || headers.contains_key("x-access-token") {
                    return Response::builder()
                        .status(AxumStatus::UNAUTHORIZED)
                        .body(Body::empty())
                        .unwrap();
                }
                Response::builder()
                    .header("content-type", "video/mp4")
                    .body(Body::from("vid"))
                    .unwrap()
            }),
        );
        let base = serve(app).await;

        let media = retriever(&base, Default::default())
            .download_video("", &format!("{}/v.mp4", base))
            .await
            .unwrap();
        assert_eq!(media.bytes, b"vid");
        assert_eq!(media.mime, "video/mp4");
    }

    #[tokio::test]
    async fn test_video_without_content_type_is_sniffed() {
        let app = Router::new().route("/v", get(|| async { untyped(PNG) }));
        let base = serve(app).await;

        let media = retriever(&base, Default::default())
            .download_video("", &format!("{}/v", base))
            .await
            .unwrap();
        assert_eq!(media.mime, "image/png");
    }

    #[tokio::test]
    async fn test_video_non_200_carries_status() {
        for status in [AxumStatus::FORBIDDEN, AxumStatus::NO_CONTENT, AxumStatus::PARTIAL_CONTENT] {
            let app = Router::new().route("/v", get(move || async move { status }));
            let base = serve(app).await;

            let log = Arc::new(RecordingLogger::default());
            let err = retriever(&base, log.clone())
                .download_video("", &format!("{}/v", base))
                .await
                .unwrap_err();
            assert_eq!(err.status(), Some(status.as_u16()));
            match err {
                Error::UnexpectedStatus(code) => assert_eq!(code, status.as_u16()),
                other => panic!("expected unexpected status, got {:?}", other),
            }
            assert!(err_line_mentions(&log, status.as_u16()));
        }
    }

    fn err_line_mentions(log: &RecordingLogger, status: u16) -> bool {
        log.at(Level::Error)
            .iter()
            .any(|l| l.contains(&status.to_string()))
    }
}
