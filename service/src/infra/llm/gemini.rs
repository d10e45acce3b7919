//! [Gemini] text generation client.
//!
//! [Gemini]: https://ai.google.dev/api/generate-content

use derive_more::{Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

use crate::infra::llm::{self, Generate, Llm};

/// [`Gemini`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// API key to authorize requests with, if configured.
    pub api_key: Option<SecretString>,

    /// Name of the model generating completions.
    pub model: String,

    /// Base URL of the Generative Language API.
    pub endpoint: String,
}

/// [Gemini] client issuing `generateContent` requests.
///
/// [Gemini]: https://ai.google.dev/api/generate-content
#[derive(Clone, Debug)]
pub struct Gemini {
    /// HTTP client issuing the requests.
    client: reqwest::Client,

    /// [`Config`] of this [`Gemini`] client.
    config: Config,
}

impl Gemini {
    /// Creates a new [`Gemini`] client with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Returns the URL of the `generateContent` method of the configured
    /// model.
    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
        )
    }
}

impl Llm<Generate> for Gemini {
    type Ok = String;
    type Err = Traced<llm::Error>;

    async fn execute(
        &self,
        Generate(prompt): Generate,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(key) = self
            .config
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
        else {
            return Err(tracerr::new!(llm::Error::NotConfigured));
        };

        let request = Request {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key.expose_secret())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?
            .json::<Response>()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(response.text())
    }
}

/// [`Gemini`] client error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP request failed or returned an unexpected response.
    #[display("`generateContent` request failed: {_0}")]
    Request(reqwest::Error),
}

/// Body of a `generateContent` request.
#[derive(Debug, Serialize)]
struct Request {
    /// Conversation turns to complete.
    contents: Vec<Content>,
}

/// Single conversation turn.
#[derive(Debug, Deserialize, Serialize)]
struct Content {
    /// Parts of this [`Content`].
    #[serde(default)]
    parts: Vec<Part>,
}

/// Text part of a [`Content`].
#[derive(Debug, Deserialize, Serialize)]
struct Part {
    /// Text of this [`Part`].
    #[serde(default)]
    text: String,
}

/// Body of a `generateContent` response.
#[derive(Debug, Default, Deserialize)]
struct Response {
    /// Generated candidates.
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Generated completion candidate.
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Generated [`Content`], if any.
    content: Option<Content>,
}

impl Response {
    /// Returns the text of the first candidate, or an empty string if
    /// nothing was generated.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod spec {
    use super::Response;

    #[test]
    fn extracts_first_candidate_text() {
        let response: Response = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "Dear "}, {"text": "Jane"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(response.text(), "Dear Jane");
    }

    #[test]
    fn empty_without_candidates() {
        let response: Response = serde_json::from_str("{}").unwrap();

        assert_eq!(response.text(), "");

        let response: Response =
            serde_json::from_str(r#"{"candidates": [{}]}"#).unwrap();

        assert_eq!(response.text(), "");
    }
}
