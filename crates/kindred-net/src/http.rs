//! HTTP implementation of [`RemoteGateway`].
//!
//! A thin shim: one endpoint per method, bearer credential on every call,
//! status codes mapped onto the [`RemoteError`] taxonomy, bodies decoded
//! through the [`crate::normalize`] wire types.  No caching, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::json;
use tracing::debug;

use kindred_shared::types::{Interest, SearchResult, SessionContext, TrendingTopic, UserSummary};

use crate::error::{RemoteError, Result};
use crate::gateway::RemoteGateway;
use crate::normalize::{
    WireInterestList, WireProfile, WireRankings, WireSearchList, WireUserList,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway to the matchmaking service at `session.server_url`.
pub struct HttpGateway {
    http: reqwest::Client,
    session: SessionContext,
}

impl HttpGateway {
    pub fn new(session: SessionContext) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transient(e.to_string()))?;
        Ok(Self { http, session })
    }

    fn token(&self) -> Result<&str> {
        self.session
            .token
            .as_deref()
            .ok_or(RemoteError::MissingCredential)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.session.server_url.trim_end_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let token = self.token()?;
        debug!(path, "GET");
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        check_status(resp)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response> {
        let token = self.token()?;
        debug!(path, "POST");
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(resp)
    }

    async fn delete(&self, path: &str, body: serde_json::Value) -> Result<Response> {
        let token = self.token()?;
        debug!(path, "DELETE");
        let resp = self
            .http
            .delete(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(resp)
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth,
        StatusCode::CONFLICT => RemoteError::Conflict,
        s if s.is_server_error() => RemoteError::Transient(format!("server returned {s}")),
        s => RemoteError::Rejected(s.as_u16()),
    })
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_my_matches(&self) -> Result<Vec<UserSummary>> {
        let list: WireUserList = self.get("/me/matches").await?.json().await?;
        Ok(list.normalize())
    }

    async fn fetch_suggested(&self) -> Result<Vec<UserSummary>> {
        let list: WireUserList = self.get("/me/lv2").await?.json().await?;
        Ok(list.normalize())
    }

    async fn fetch_my_interests(&self) -> Result<Vec<Interest>> {
        let list: WireInterestList = self.get("/me/interest").await?.json().await?;
        Ok(list.normalize())
    }

    async fn fetch_recommended_interests(&self) -> Result<Vec<Interest>> {
        let list: WireInterestList = self.get("/me/recommendations").await?.json().await?;
        Ok(list.normalize())
    }

    async fn create_match(&self, target: &str) -> Result<()> {
        self.post("/me/match", json!({ "target": target })).await?;
        Ok(())
    }

    async fn delete_match(&self, target: &str) -> Result<()> {
        self.delete("/me/match", json!({ "target": target })).await?;
        Ok(())
    }

    async fn like_interest(&self, name: &str) -> Result<()> {
        self.post("/me/interest", json!({ "name": name })).await?;
        Ok(())
    }

    async fn unlike_interest(&self, name: &str) -> Result<()> {
        self.delete("/me/interest", json!({ "name": name })).await?;
        Ok(())
    }

    async fn fetch_other_profile(&self, username: &str) -> Result<UserSummary> {
        let profile: WireProfile = self
            .post("/other", json!({ "username": username }))
            .await?
            .json()
            .await?;
        Ok(profile.into_summary(username))
    }

    async fn fetch_other_interests(&self, username: &str) -> Result<Vec<Interest>> {
        let list: WireInterestList = self
            .post("/other/interest", json!({ "username": username }))
            .await?
            .json()
            .await?;
        Ok(list.normalize())
    }

    async fn fetch_other_matches(&self, username: &str) -> Result<Vec<UserSummary>> {
        let list: WireUserList = self
            .post("/other/matches", json!({ "username": username }))
            .await?
            .json()
            .await?;
        Ok(list.normalize())
    }

    async fn search_users(&self, term: &str) -> Result<Vec<SearchResult>> {
        let list: WireSearchList = self
            .post("/other/search", json!({ "term": term }))
            .await?
            .json()
            .await?;
        Ok(list.normalize())
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingTopic>> {
        let envelope: WireRankings = self.get("/pagerank").await?.json().await?;
        Ok(envelope
            .rankings
            .into_iter()
            .map(|r| TrendingTopic {
                name: r.name,
                score: r.score,
            })
            .collect())
    }
}
