use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::UnixStream;
use tracing::debug;

use crate::error::EngineError;
use crate::ports::EngineApi;

/// Engine API version every request path is pinned to
pub const API_VERSION: &str = "v1.41";

/// Docker engine adapter speaking HTTP/1.1 over the engine's unix socket
pub struct DockerAdapter {
    socket_path: PathBuf,
}

impl DockerAdapter {
    pub fn with_socket(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn socket_error(&self, reason: impl std::fmt::Display) -> EngineError {
        EngineError::socket(&self.socket_path, reason)
    }

    /// Classify a complete engine response
    fn interpret(status: StatusCode, body: &[u8]) -> Result<Option<Value>, EngineError> {
        if status.as_u16() >= 400 {
            return Err(EngineError::Api {
                status: status.as_u16(),
                message: Self::error_message(status, body),
            });
        }

        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(body)?))
    }

    /// Engine `message` field, else the raw body, else a generic description
    fn error_message(status: StatusCode, body: &[u8]) -> String {
        if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
            if let Some(Value::String(message)) = map.get("message") {
                return message.clone();
            }
        }

        let text = String::from_utf8_lossy(body);
        if !text.trim().is_empty() {
            return text.into_owned();
        }

        format!("Docker engine returned status {}", status.as_u16())
    }
}

#[async_trait]
impl EngineApi for DockerAdapter {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Option<Value>, EngineError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| self.socket_error(e))?;

        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| self.socket_error(e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!(error = %e, "engine connection closed with error");
            }
        });

        let uri = format!("/{API_VERSION}{path}");
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri.as_str())
            .header(header::HOST, "docker")
            .header(header::ACCEPT, "application/json");

        let payload = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Bytes::from(bytes)
            }
            None => Bytes::new(),
        };

        let request = builder
            .body(Full::new(payload))
            .map_err(|e| self.socket_error(e))?;

        debug!(%method, %uri, "engine request");

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| self.socket_error(e))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| self.socket_error(e))?
            .to_bytes();

        debug!(%uri, status = status.as_u16(), bytes = body.len(), "engine response");

        Self::interpret(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Accept one connection, answer with `response`, return the raw request head
    async fn serve_once(listener: UnixListener, response: String) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&head).into_owned()
    }

    #[tokio::test]
    async fn test_request_prefixes_api_version_and_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket).unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            http_response("200 OK", r#"[{"Id":"abc"}]"#),
        ));

        let adapter = DockerAdapter::with_socket(&socket);
        let value = adapter
            .request(Method::GET, "/containers/json?all=true", None)
            .await
            .unwrap();

        assert_eq!(value, Some(serde_json::json!([{"Id": "abc"}])));
        let head = server.await.unwrap();
        assert!(head.starts_with("GET /v1.41/containers/json?all=true HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_engine_error_message_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket).unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            http_response("500 Internal Server Error", r#"{"message":"daemon is shutting down"}"#),
        ));

        let adapter = DockerAdapter::with_socket(&socket);
        let err = adapter
            .request(Method::POST, "/containers/abc/start", None)
            .await
            .unwrap_err();

        match err {
            EngineError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "daemon is shutting down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let head = server.await.unwrap();
        assert!(head.starts_with("POST /v1.41/containers/abc/start HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_empty_body_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket).unwrap();
        let server = tokio::spawn(serve_once(listener, http_response("204 No Content", "")));

        let adapter = DockerAdapter::with_socket(&socket);
        let value = adapter
            .request(Method::POST, "/containers/abc/stop", Some(b"{}".to_vec()))
            .await
            .unwrap();

        assert_eq!(value, None);
        let head = server.await.unwrap().to_ascii_lowercase();
        assert!(head.contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn test_missing_socket_is_socket_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = DockerAdapter::with_socket(dir.path().join("absent.sock"));
        let err = adapter.request(Method::GET, "/info", None).await.unwrap_err();
        assert!(matches!(err, EngineError::Socket { .. }));
    }

    #[test]
    fn test_interpret_invalid_json() {
        let err = DockerAdapter::interpret(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, EngineError::ResponseParse(_)));
    }

    #[test]
    fn test_interpret_whitespace_body_is_not_absent() {
        let err = DockerAdapter::interpret(StatusCode::OK, b"\n").unwrap_err();
        assert!(matches!(err, EngineError::ResponseParse(_)));
        assert_eq!(DockerAdapter::interpret(StatusCode::NO_CONTENT, b"").unwrap(), None);
    }

    #[test]
    fn test_interpret_error_fallbacks() {
        let err = DockerAdapter::interpret(StatusCode::NOT_FOUND, b"page not found").unwrap_err();
        assert_eq!(err.to_string(), "page not found");

        let err = DockerAdapter::interpret(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert_eq!(err.to_string(), "Docker engine returned status 502");
    }
}
