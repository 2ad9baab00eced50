use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::protocol::{CommandOptionsRequest, TurnRequest, TurnResponse};

/// HTTP client for the adventure backend.
///
/// The backend keeps one game per cookie session, so the client carries a
/// cookie jar for as long as it lives.
#[derive(Clone, Debug)]
pub struct GameClient {
    http: reqwest::Client,
    base: String,
}

impl GameClient {
    pub fn new(server_addr: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Setup)?;
        Ok(Self {
            http,
            base: server_addr.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    /// `GET /`, plain text.
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    pub async fn title(&self) -> Result<String> {
        let url = self.url("");
        let resp = self.check(&url, self.http.get(&url).send().await)?;
        resp.text()
            .await
            .map_err(|source| ClientError::Transport { url, source })
    }

    /// `POST /GameResponse` with one turn.
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    pub async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse> {
        let url = self.url("GameResponse");
        let resp = self.check(&url, self.http.post(&url).json(request).send().await)?;
        Self::decode(url, resp).await
    }

    /// `POST /CommandOptions`, the arguments the server currently accepts for
    /// `command`.
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    pub async fn command_options(&self, command: &str) -> Result<Vec<String>> {
        let url = self.url("CommandOptions");
        let body = CommandOptionsRequest { command };
        let resp = self.check(&url, self.http.post(&url).json(&body).send().await)?;
        Self::decode(url, resp).await
    }

    fn check(&self, url: &str, sent: reqwest::Result<Response>) -> Result<Response> {
        let resp = sent.map_err(|source| ClientError::Transport {
            url: url.to_owned(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_owned(),
                status,
            });
        }
        tracing::debug!("{} answered {}", url, status);
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(url: String, resp: Response) -> Result<T> {
        let body = resp
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_not_doubled() {
        let client = GameClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(client.base(), "http://localhost:8080");
        assert_eq!(client.url("GameResponse"), "http://localhost:8080/GameResponse");
        assert_eq!(client.url(""), "http://localhost:8080/");
    }
}
