//! The remote service contract.
//!
//! One method per endpoint, returning decoded domain records or a typed
//! [`RemoteError`].  Implementations must not cache or retry; that policy
//! belongs to the engagement layer.

use async_trait::async_trait;

use kindred_shared::types::{Interest, SearchResult, TrendingTopic, UserSummary};

use crate::error::Result;

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Users I share a match edge with.
    async fn fetch_my_matches(&self) -> Result<Vec<UserSummary>>;

    /// Second-degree suggestions (matches of my matches).
    async fn fetch_suggested(&self) -> Result<Vec<UserSummary>>;

    /// My declared interests.
    async fn fetch_my_interests(&self) -> Result<Vec<Interest>>;

    /// Interests the service recommends to me, in service order.
    async fn fetch_recommended_interests(&self) -> Result<Vec<Interest>>;

    /// Create a match edge towards `target`.
    async fn create_match(&self, target: &str) -> Result<()>;

    /// Delete the match edge towards `target`.
    async fn delete_match(&self, target: &str) -> Result<()>;

    /// Add `name` to my interest set.
    async fn like_interest(&self, name: &str) -> Result<()>;

    /// Remove `name` from my interest set.
    async fn unlike_interest(&self, name: &str) -> Result<()>;

    /// Another user's public profile.
    async fn fetch_other_profile(&self, username: &str) -> Result<UserSummary>;

    /// Another user's public interests.
    async fn fetch_other_interests(&self, username: &str) -> Result<Vec<Interest>>;

    /// Another user's matches.  Only meaningful once an edge exists.
    async fn fetch_other_matches(&self, username: &str) -> Result<Vec<UserSummary>>;

    /// Free-text user search.
    async fn search_users(&self, term: &str) -> Result<Vec<SearchResult>>;

    /// Network-wide trending interests, ranked.
    async fn fetch_trending(&self) -> Result<Vec<TrendingTopic>>;
}
