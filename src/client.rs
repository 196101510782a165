//! HTTP client for the caption server.
//!
//! The server takes a multipart form with the media file and a language
//! code, and answers with `{ "captions": [...], "hashtags": "..." }`. On an
//! internal failure it may still answer 200 with `{ "error": "..." }`.

use crate::error::GenerateError;
use crate::media::SelectedFile;
use crate::types::{GenerationResult, Language};
use reqwest::multipart;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info, warn};

const FALLBACK_MIME: &str = "application/octet-stream";

pub struct CaptionClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl CaptionClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, GenerateError> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint,
            http: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Upload `file` and ask for captions in `language`
    pub async fn generate(
        &self,
        file: &SelectedFile,
        language: Language,
    ) -> Result<GenerationResult, GenerateError> {
        let form = multipart::Form::new()
            .part("file", file_part(file))
            .text("language", language.code());

        info!(
            endpoint = %self.endpoint,
            file = %file.name,
            mime = %file.mime,
            bytes = file.bytes.len(),
            language = language.code(),
            "Sending generation request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
            warn!(status = status.as_u16(), %reason, "Caption server returned an error status");
            return Err(GenerateError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Generation response received");
        parse_response(&body)
    }
}

/// Multipart part for `file`. A declared MIME type that does not parse is
/// sent as `application/octet-stream`.
fn file_part(file: &SelectedFile) -> multipart::Part {
    let part = || multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
    match part().mime_str(&file.mime) {
        Ok(part) => part,
        Err(e) => {
            warn!(mime = %file.mime, error = %e, "Unusable MIME type, sending as octet-stream");
            part()
                .mime_str(FALLBACK_MIME)
                .unwrap_or_else(|_| part())
        }
    }
}

/// Check that `endpoint` is an absolute http(s) URL
pub fn parse_endpoint(endpoint: &str) -> Result<Url, GenerateError> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| GenerateError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GenerateError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme {other}"
        ))),
    }
}

/// Validate a success body against the expected shape
pub fn parse_response(body: &[u8]) -> Result<GenerationResult, GenerateError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| GenerateError::InvalidResponse(format!("body is not JSON: {e}")))?;

    if let Some(message) = value.get("error") {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());
        return Err(GenerateError::Backend(message));
    }

    serde_json::from_value(value).map_err(|e| GenerateError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn parses_well_formed_body() {
        let result = parse_response(br##"{"captions":["a","b","c"],"hashtags":"#x #y"}"##).unwrap();
        assert_eq!(result.captions, ["a", "b", "c"]);
        assert_eq!(result.hashtags, "#x #y");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result = parse_response(br#"{"captions":[],"hashtags":"","model":"blip"}"#).unwrap();
        assert!(result.captions.is_empty());
    }

    #[test]
    fn error_body_is_a_backend_failure() {
        let err = parse_response(br#"{"error":"Video Error"}"#).unwrap_err();
        match err {
            GenerateError::Backend(msg) => assert_eq!(msg, "Video Error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_an_invalid_response() {
        let err = parse_response(br##"{"captions":"just one","hashtags":"#x"}"##).unwrap_err();
        assert!(err.is_invalid_response());

        let err = parse_response(br#"{"captions":["a"]}"#).unwrap_err();
        assert!(err.is_invalid_response());

        let err = parse_response(b"<html>oops</html>").unwrap_err();
        assert!(err.is_invalid_response());
    }

    #[test]
    fn endpoint_must_be_http() {
        assert!(parse_endpoint("http://127.0.0.1:8000/generate").is_ok());
        assert!(parse_endpoint(" https://captions.example.com/generate ").is_ok());
        assert!(matches!(
            parse_endpoint("ftp://example.com/generate"),
            Err(GenerateError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(GenerateError::InvalidEndpoint(_))
        ));
    }

    /// Serve exactly one request with a canned response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}/generate"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
        if headers.contains("transfer-encoding: chunked") {
            return request.ends_with(b"0\r\n\r\n");
        }
        let length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }

    fn sample_file() -> SelectedFile {
        SelectedFile::new("sunset.png", None, "image/png", Arc::from(&b"PNGDATA"[..]))
    }

    #[tokio::test]
    async fn sends_multipart_file_and_language() {
        let (endpoint, server) =
            serve_once("200 OK", r##"{"captions":["a","b","c"],"hashtags":"#x #y"}"##).await;
        let client = CaptionClient::new(&endpoint, None).unwrap();

        let result = client.generate(&sample_file(), Language::Es).await.unwrap();
        assert_eq!(result.captions, ["a", "b", "c"]);
        assert_eq!(result.hashtags, "#x #y");

        let request = String::from_utf8_lossy(&server.await.unwrap()).into_owned();
        assert!(request.starts_with("POST /generate"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains("name=\"file\"; filename=\"sunset.png\""));
        assert!(request.contains("Content-Type: image/png"));
        assert!(request.contains("PNGDATA"));
        assert!(request.contains("name=\"language\""));
        assert!(request.contains("\r\n\r\nes\r\n"));
    }

    #[tokio::test]
    async fn non_success_status_surfaces_reason() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "{}").await;
        let client = CaptionClient::new(&endpoint, None).unwrap();

        let err = client.generate(&sample_file(), Language::En).await.unwrap_err();
        match err {
            GenerateError::Status { status, reason } => {
                assert_eq!(status, 500);
                assert_eq!(reason, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_mime_is_sent_as_octet_stream() {
        let (endpoint, server) =
            serve_once("200 OK", r##"{"captions":["a"],"hashtags":"#x"}"##).await;
        let client = CaptionClient::new(&endpoint, None).unwrap();
        let file = SelectedFile::new("clip.bin", None, "not a mime", Arc::from(&b"RAW"[..]));

        let result = client.generate(&file, Language::En).await.unwrap();
        assert_eq!(result.captions, ["a"]);

        let request = String::from_utf8_lossy(&server.await.unwrap()).into_owned();
        assert!(request.contains("name=\"file\"; filename=\"clip.bin\""));
        assert!(request.contains("Content-Type: application/octet-stream"));
        assert!(!request.contains("not a mime"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CaptionClient::new(&format!("http://{addr}/generate"), None).unwrap();
        let err = client.generate(&sample_file(), Language::En).await.unwrap_err();
        assert!(matches!(err, GenerateError::Network(_)));
        assert!(!err.is_invalid_response());
    }
}
