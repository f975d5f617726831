use crate::error::{HelloMcpError, Result};
use log::{debug, error, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use std::time::Duration;

pub const JOKE_TOOL_NAME: &str = "funny-quote-tool";
pub const JOKE_TOOL_DESCRIPTION: &str = "Fetches a random funny quote or joke from an external API";

/// Returned when the API answered but carried no joke text.
pub const NO_JOKE_MESSAGE: &str = "Sorry, hardluck fetching a joke!... laugh later!";
/// Returned for transport, status and decoding failures.
pub const FETCH_FAILED_MESSAGE: &str = "Sorry, couldn't fetch a joke right now. Try again later!";

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct JokeResponse {
    #[serde(default)]
    pub joke: Option<String>,
}

/// HTTP client for the joke API. Holds no per-call state, so one instance
/// is shared by every invocation.
pub struct JokeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl JokeClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one joke. `Ok(None)` means the API responded successfully
    /// without any joke text (empty body, `null`, missing or blank field).
    pub async fn fetch_joke(&self) -> Result<Option<String>> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HelloMcpError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let parsed: Option<JokeResponse> = serde_json::from_str(&body)?;
        Ok(parsed
            .and_then(|r| r.joke)
            .filter(|joke| !joke.trim().is_empty()))
    }

    /// Tool entry point: always yields a non-empty string.
    pub async fn handle_funny_quote(&self) -> String {
        info!("{} called", JOKE_TOOL_NAME);

        match self.fetch_joke().await {
            Ok(Some(joke)) => joke,
            Ok(None) => {
                warn!("Joke API at {} returned no joke text", self.endpoint);
                NO_JOKE_MESSAGE.to_string()
            }
            Err(e) => {
                error!("Error fetching joke: {}", e);
                FETCH_FAILED_MESSAGE.to_string()
            }
        }
    }
}
