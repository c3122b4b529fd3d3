//! Cached fallback copies of remote state.
//!
//! These entries are written after every successful fetch and read only
//! when a fresh fetch fails.  They are a degraded view, never truth: the
//! remote re-syncs them on the next successful load.

use kindred_shared::types::{Interest, UserSummary};

use crate::database::{Database, NS_CACHE};
use crate::error::Result;

const MATCHES_KEY: &str = "matches";
const INTERESTS_KEY: &str = "interests";

impl Database {
    pub fn cached_matches(&self) -> Result<Option<Vec<UserSummary>>> {
        self.get(NS_CACHE, MATCHES_KEY)
    }

    pub fn store_matches(&self, matches: &[UserSummary]) -> Result<()> {
        self.put(NS_CACHE, MATCHES_KEY, &matches)
    }

    pub fn cached_interests(&self) -> Result<Option<Vec<Interest>>> {
        self.get(NS_CACHE, INTERESTS_KEY)
    }

    pub fn store_interests(&self, interests: &[Interest]) -> Result<()> {
        self.put(NS_CACHE, INTERESTS_KEY, &interests)
    }
}
