use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AVATAR_URL;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user as seen from the outside: another member of the network.
///
/// Produced by the gateway in exactly one shape regardless of how the remote
/// encoded it (bare username string or full record).  Never mutated locally,
/// only replaced wholesale on the next fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Unique, stable identity.
    pub username: String,
    /// Always populated; the gateway fills in the default avatar if absent.
    pub avatar_url: String,
    /// Remote-supplied compatibility fraction in [0, 1], if any.
    #[serde(default)]
    pub compatibility: Option<f64>,
}

impl UserSummary {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            compatibility: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Interests
// ---------------------------------------------------------------------------

/// A declared interest.  `name` is the unique key within any interest set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Remote calls this `type` (e.g. "genre", "hobby").
    #[serde(default)]
    pub category: String,
}

impl Interest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Me,
    Peer,
}

/// A single chat message within a thread.
///
/// `id` is unique and strictly increasing in insertion order within its
/// thread; `time` is wall-clock `H:MM` (24-hour, zero-padded minutes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub time: String,
}

/// Denormalized projection of a thread's tail, shown in the recent-chats
/// list.  Kept in sync with the thread on every send.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub peer: String,
    pub avatar_url: String,
    pub last_message_text: String,
    /// Relative marker ("now", "2h", ...), not a timestamp.
    pub last_message_time: String,
}

// ---------------------------------------------------------------------------
// Search & trending
// ---------------------------------------------------------------------------

/// One row of a user search.  Ephemeral: valid only for the debounce window
/// that produced it, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub compatibility: Option<f64>,
}

/// A trending interest with its ranking score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingTopic {
    pub name: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Compatibility
// ---------------------------------------------------------------------------

/// Where a displayed compatibility value came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// The remote supplied a numeric fraction.
    Remote,
    /// Computed locally from the two interest sets.
    Derived,
    /// Randomized display plausibility band; never truth.
    Fallback,
}

/// A [0, 100] compatibility value plus its provenance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompatibilityScore {
    pub value: u8,
    pub source: ScoreSource,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Scoped session context handed to components that talk to the remote.
///
/// The bearer token is owned by an external auth collaborator; this struct
/// only carries it.  A missing token is a precondition failure that callers
/// must surface, never silently ignore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionContext {
    pub server_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl SessionContext {
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: Some(token.into()),
        }
    }

    pub fn anonymous(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: None,
        }
    }
}
