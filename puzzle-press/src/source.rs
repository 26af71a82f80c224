//! Where puzzle data comes from.
//!
//! The generation service answers a [`GenerationRequest`] with a
//! [`PuzzlePayload`]. A response captured to disk can stand in for it.

use std::path::PathBuf;

use async_trait::async_trait;
use puzzle_core::{GenerationRequest, PuzzlePayload};
use reqwest::Client;
use url::Url;

use crate::error::{PressError, PressResult};

/// Path appended when the service URL names only a host.
const GENERATE_PATH: &str = "/generate";

/// Produces puzzle data for a request.
#[async_trait]
pub trait PuzzleSource: Send + Sync {
    /// Fetch the payload for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if no data could be obtained.
    async fn fetch(&self, request: &GenerationRequest) -> PressResult<PuzzlePayload>;
}

/// Reads a captured payload from a JSON file.
#[derive(Debug, Clone)]
pub struct FilePuzzleSource {
    path: PathBuf,
}

impl FilePuzzleSource {
    /// Create a source over a file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PuzzleSource for FilePuzzleSource {
    async fn fetch(&self, request: &GenerationRequest) -> PressResult<PuzzlePayload> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let payload = PuzzlePayload::from_json(&json)?;
        if payload.kind() != request.kind {
            tracing::warn!(
                "{} holds {} puzzles, not the requested {}",
                self.path.display(),
                payload.kind(),
                request.kind
            );
        }
        Ok(payload)
    }
}

/// Posts the request to the generation service.
#[derive(Debug, Clone)]
pub struct HttpPuzzleSource {
    http: Client,
    endpoint: Url,
}

impl HttpPuzzleSource {
    /// Create a client for the service.
    ///
    /// `base_url` may be the endpoint itself or just the host, in which
    /// case `/generate` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`PressError::InvalidUrl`] if the URL is malformed.
    /// Returns [`PressError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: impl AsRef<str>) -> PressResult<Self> {
        let mut endpoint =
            Url::parse(base_url.as_ref()).map_err(|e| PressError::InvalidUrl(e.to_string()))?;
        if endpoint.path().is_empty() || endpoint.path() == "/" {
            endpoint.set_path(GENERATE_PATH);
        }

        let http = Client::builder()
            .user_agent(format!("puzzle-press/{}", crate::VERSION))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Endpoint requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PuzzleSource for HttpPuzzleSource {
    async fn fetch(&self, request: &GenerationRequest) -> PressResult<PuzzlePayload> {
        tracing::debug!(
            "Requesting {} x{} from {}",
            request.kind,
            request.puzzle_count,
            self.endpoint
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PressError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(PuzzlePayload::from_json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use puzzle_core::{Difficulty, PuzzleKind};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request(kind: PuzzleKind) -> GenerationRequest {
        GenerationRequest {
            kind,
            words: vec!["apple".to_string(), "pear".to_string()],
            grid_size: 0,
            puzzle_count: 1,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_host_only_url_gets_path() {
        let source = HttpPuzzleSource::new("http://localhost:8080").unwrap();
        assert_eq!(source.endpoint().path(), "/generate");
        let source = HttpPuzzleSource::new("http://localhost:8080/api/puzzles").unwrap();
        assert_eq!(source.endpoint().path(), "/api/puzzles");
        assert!(matches!(
            HttpPuzzleSource::new("not a url"),
            Err(PressError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn test_http_fetch_posts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_partial_json(json!({"kind": "word_scramble", "difficulty": "easy"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "word_scramble",
                "entries": [{"scrambled": "lepap", "answer": "apple"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpPuzzleSource::new(server.uri()).unwrap();
        let payload = source.fetch(&request(PuzzleKind::WordScramble)).await.unwrap();
        assert_eq!(payload.kind(), PuzzleKind::WordScramble);
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpPuzzleSource::new(server.uri()).unwrap();
        let err = source.fetch(&request(PuzzleKind::Hangman)).await.unwrap_err();
        assert!(matches!(err, PressError::Status(503)), "{err:?}");
    }

    #[tokio::test]
    async fn test_file_source_reads_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("hangman.json");
        std::fs::write(
            &file,
            r#"{"type": "hangman", "puzzles": [{"phrase": "Hello there", "category": "Greetings"}]}"#,
        )
        .unwrap();

        let payload = FilePuzzleSource::new(&file)
            .fetch(&request(PuzzleKind::Hangman))
            .await
            .unwrap();
        assert!(payload.can_generate());

        let missing = FilePuzzleSource::new(dir.path().join("absent.json"))
            .fetch(&request(PuzzleKind::Hangman))
            .await;
        assert!(matches!(missing, Err(PressError::Io(_))));
    }
}
