//! Wire-shape normalization.
//!
//! The service is loose about shapes: a user may arrive as a bare username
//! string or a full record, and lists may be wrapped in an envelope or sent
//! as a bare array.  Everything is flattened here, at the boundary, into the
//! canonical `kindred-shared` types so the engine never branches on shape.

use serde::Deserialize;

use kindred_shared::constants::DEFAULT_AVATAR_URL;
use kindred_shared::types::{Interest, SearchResult, UserSummary};

/// A user entry as the service actually sends it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireUser {
    Record {
        username: String,
        #[serde(default)]
        avatar: Option<String>,
        #[serde(default)]
        compatibility: Option<f64>,
    },
    Name(String),
}

impl WireUser {
    pub(crate) fn into_summary(self) -> UserSummary {
        match self {
            WireUser::Name(username) => UserSummary::new(username),
            WireUser::Record {
                username,
                avatar,
                compatibility,
            } => UserSummary {
                username,
                avatar_url: avatar.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
                compatibility,
            },
        }
    }
}

/// User lists arrive wrapped in `{ "matches": [...] }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireUserList {
    Wrapped { matches: Vec<WireUser> },
    Bare(Vec<WireUser>),
}

impl WireUserList {
    pub(crate) fn normalize(self) -> Vec<UserSummary> {
        let entries = match self {
            WireUserList::Wrapped { matches } => matches,
            WireUserList::Bare(entries) => entries,
        };
        entries.into_iter().map(WireUser::into_summary).collect()
    }
}

/// An interest entry; the remote calls the category `type`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireInterest {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    category: String,
}

impl From<WireInterest> for Interest {
    fn from(w: WireInterest) -> Self {
        Interest {
            name: w.name,
            description: w.description,
            category: w.category,
        }
    }
}

/// Interest lists arrive under `interests`, `recommendations`, or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireInterestList {
    Owned { interests: Vec<WireInterest> },
    Recommended { recommendations: Vec<WireInterest> },
    Bare(Vec<WireInterest>),
}

impl WireInterestList {
    pub(crate) fn normalize(self) -> Vec<Interest> {
        let entries = match self {
            WireInterestList::Owned { interests } => interests,
            WireInterestList::Recommended { recommendations } => recommendations,
            WireInterestList::Bare(entries) => entries,
        };
        entries.into_iter().map(Interest::from).collect()
    }
}

/// A search row.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchUser {
    username: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    compatibility: Option<f64>,
}

impl From<WireSearchUser> for SearchResult {
    fn from(w: WireSearchUser) -> Self {
        SearchResult {
            username: w.username,
            first_name: w.first_name,
            last_name: w.last_name,
            avatar_url: w.avatar,
            compatibility: w.compatibility,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireSearchList {
    Wrapped { matches: Vec<WireSearchUser> },
    Bare(Vec<WireSearchUser>),
}

impl WireSearchList {
    pub(crate) fn normalize(self) -> Vec<SearchResult> {
        let entries = match self {
            WireSearchList::Wrapped { matches } => matches,
            WireSearchList::Bare(entries) => entries,
        };
        entries.into_iter().map(SearchResult::from).collect()
    }
}

/// `GET /pagerank` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct WireRankings {
    pub(crate) rankings: Vec<WireRanking>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRanking {
    pub(crate) name: String,
    pub(crate) score: f64,
}

/// Another user's profile record.  Only the avatar is guaranteed relevant;
/// the username falls back to the one we asked about.
#[derive(Debug, Deserialize)]
pub(crate) struct WireProfile {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    compatibility: Option<f64>,
}

impl WireProfile {
    pub(crate) fn into_summary(self, requested: &str) -> UserSummary {
        UserSummary {
            username: self.username.unwrap_or_else(|| requested.to_string()),
            avatar_url: self
                .avatar
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            compatibility: self.compatibility,
        }
    }
}
