/// Application name
pub const APP_NAME: &str = "Kindred";

/// Number of recommended interests shown at once
pub const DISPLAY_WINDOW_SIZE: usize = 4;

/// Quiet period before a search query is sent, in milliseconds
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Minimum query length that triggers a remote search
pub const MIN_SEARCH_LEN: usize = 2;

/// Fallback compatibility band for established matches (inclusive)
pub const MATCH_BAND: (u8, u8) = (60, 99);

/// Fallback compatibility band for cold suggestions (inclusive)
pub const SUGGESTION_BAND: (u8, u8) = (30, 79);

/// Maximum number of trending topics surfaced to the UI
pub const TRENDING_LIMIT: usize = 10;

/// Avatar used when the remote record carries none
pub const DEFAULT_AVATAR_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/5/59/User-avatar.svg/2048px-User-avatar.svg.png";

/// Relative time marker written to a conversation summary right after a send
pub const JUST_NOW: &str = "now";

/// Seed conversation shown the first time a thread is opened
pub const SEED_PEER_MESSAGE: (&str, &str) = ("Hey! How are you?", "10:30");
pub const SEED_OWN_MESSAGE: (&str, &str) = ("Hi! All good, and you?", "10:32");
