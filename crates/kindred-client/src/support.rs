//! In-memory gateway fixture shared by the crate's tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use kindred_net::{RemoteError, RemoteGateway};
use kindred_shared::types::{Interest, SearchResult, TrendingTopic, UserSummary};

type Result<T> = std::result::Result<T, RemoteError>;

/// Scriptable [`RemoteGateway`]: canned responses, injectable failures,
/// optional per-term search latency, and a call log.
#[derive(Default)]
pub struct FakeGateway {
    matches: Mutex<Vec<UserSummary>>,
    suggested: Mutex<Vec<UserSummary>>,
    my_interests: Mutex<Vec<Interest>>,
    recommended: Mutex<Vec<Interest>>,
    other_profiles: Mutex<HashMap<String, UserSummary>>,
    other_interests: Mutex<HashMap<String, Vec<Interest>>>,
    other_matches: Mutex<HashMap<String, Vec<UserSummary>>>,
    search_results: Mutex<HashMap<String, Vec<SearchResult>>>,
    search_delays: Mutex<HashMap<String, Duration>>,
    trending: Mutex<Vec<TrendingTopic>>,
    transient: Mutex<HashSet<String>>,
    auth: Mutex<HashSet<String>>,
    conflicted: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_matches(&self, users: Vec<UserSummary>) {
        *self.matches.lock().unwrap() = users;
    }

    pub fn set_suggested(&self, users: Vec<UserSummary>) {
        *self.suggested.lock().unwrap() = users;
    }

    pub fn set_my_interests(&self, interests: Vec<Interest>) {
        *self.my_interests.lock().unwrap() = interests;
    }

    pub fn set_recommended(&self, interests: Vec<Interest>) {
        *self.recommended.lock().unwrap() = interests;
    }

    pub fn set_other_profile(&self, username: &str, profile: UserSummary) {
        self.other_profiles
            .lock()
            .unwrap()
            .insert(username.into(), profile);
    }

    pub fn set_other_interests(&self, username: &str, interests: Vec<Interest>) {
        self.other_interests
            .lock()
            .unwrap()
            .insert(username.into(), interests);
    }

    pub fn set_other_matches(&self, username: &str, users: Vec<UserSummary>) {
        self.other_matches
            .lock()
            .unwrap()
            .insert(username.into(), users);
    }

    pub fn set_search_results(&self, term: &str, results: Vec<SearchResult>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(term.into(), results);
    }

    pub fn set_search_delay(&self, term: &str, delay: Duration) {
        self.search_delays.lock().unwrap().insert(term.into(), delay);
    }

    pub fn set_trending(&self, topics: Vec<TrendingTopic>) {
        *self.trending.lock().unwrap() = topics;
    }

    /// Make `op` fail with a transient error.
    pub fn fail_transient(&self, op: &str) {
        self.transient.lock().unwrap().insert(op.into());
    }

    /// Make `op` fail with an auth error.
    pub fn fail_auth(&self, op: &str) {
        self.auth.lock().unwrap().insert(op.into());
    }

    /// Make `op` fail with a conflict.
    pub fn fail_conflict(&self, op: &str) {
        self.conflicted.lock().unwrap().insert(op.into());
    }

    pub fn heal(&self, op: &str) {
        self.transient.lock().unwrap().remove(op);
        self.auth.lock().unwrap().remove(op);
        self.conflicted.lock().unwrap().remove(op);
    }

    /// Calls logged for `op`, formatted `op` or `op:detail`.
    pub fn calls_for(&self, op: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == op || c.starts_with(&format!("{op}:")))
            .cloned()
            .collect()
    }

    fn call(&self, op: &str, detail: Option<&str>) -> Result<()> {
        let entry = match detail {
            Some(d) => format!("{op}:{d}"),
            None => op.to_string(),
        };
        self.calls.lock().unwrap().push(entry);

        if self.transient.lock().unwrap().contains(op) {
            return Err(RemoteError::Transient("injected failure".into()));
        }
        if self.auth.lock().unwrap().contains(op) {
            return Err(RemoteError::Auth);
        }
        if self.conflicted.lock().unwrap().contains(op) {
            return Err(RemoteError::Conflict);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn fetch_my_matches(&self) -> Result<Vec<UserSummary>> {
        self.call("my_matches", None)?;
        Ok(self.matches.lock().unwrap().clone())
    }

    async fn fetch_suggested(&self) -> Result<Vec<UserSummary>> {
        self.call("suggested", None)?;
        Ok(self.suggested.lock().unwrap().clone())
    }

    async fn fetch_my_interests(&self) -> Result<Vec<Interest>> {
        self.call("my_interests", None)?;
        Ok(self.my_interests.lock().unwrap().clone())
    }

    async fn fetch_recommended_interests(&self) -> Result<Vec<Interest>> {
        self.call("recommended", None)?;
        Ok(self.recommended.lock().unwrap().clone())
    }

    async fn create_match(&self, target: &str) -> Result<()> {
        self.call("create_match", Some(target))
    }

    async fn delete_match(&self, target: &str) -> Result<()> {
        self.call("delete_match", Some(target))
    }

    async fn like_interest(&self, name: &str) -> Result<()> {
        self.call("like_interest", Some(name))
    }

    async fn unlike_interest(&self, name: &str) -> Result<()> {
        self.call("unlike_interest", Some(name))
    }

    async fn fetch_other_profile(&self, username: &str) -> Result<UserSummary> {
        self.call("other_profile", Some(username))?;
        Ok(self
            .other_profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_else(|| UserSummary::new(username)))
    }

    async fn fetch_other_interests(&self, username: &str) -> Result<Vec<Interest>> {
        self.call("other_interests", Some(username))?;
        Ok(self
            .other_interests
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_other_matches(&self, username: &str) -> Result<Vec<UserSummary>> {
        self.call("other_matches", Some(username))?;
        Ok(self
            .other_matches
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_users(&self, term: &str) -> Result<Vec<SearchResult>> {
        self.call("search", Some(term))?;
        let delay = self.search_delays.lock().unwrap().get(term).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(term)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingTopic>> {
        self.call("trending", None)?;
        Ok(self.trending.lock().unwrap().clone())
    }
}
