//! Recommendation rotation.
//!
//! Maintains a display window of at most [`DISPLAY_WINDOW_SIZE`] interests
//! over a larger, deduplicated recommendation pool.  The window never shows
//! an interest the user already owns, never shows the same name twice, and
//! never re-offers a name consumed earlier in the same rotation.  Pool order
//! is whatever the remote returned; there is no client-side re-sort.

use std::collections::HashSet;

use kindred_shared::constants::DISPLAY_WINDOW_SIZE;
use kindred_shared::types::Interest;

/// Whether the rotation still has anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorStatus {
    Active,
    /// Nothing left to offer.  Terminal until the next [`refresh`].
    ///
    /// [`refresh`]: RecommendationRotator::refresh
    Exhausted,
}

/// State machine over the display window.  Not persisted across sessions.
#[derive(Debug, Default)]
pub struct RecommendationRotator {
    pool: Vec<Interest>,
    window: Vec<Interest>,
    /// Names consumed since the last initialize/refresh.
    consumed: HashSet<String>,
}

/// Drop later duplicates, keeping remote order.  Name match is exact and
/// case-sensitive.
fn dedupe_by_name(pool: Vec<Interest>) -> Vec<Interest> {
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|i| seen.insert(i.name.clone()))
        .collect()
}

impl RecommendationRotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a rotation: the window becomes the first
    /// [`DISPLAY_WINDOW_SIZE`] pool items not already owned.
    pub fn initialize(&mut self, pool: Vec<Interest>, my_interests: &[Interest]) {
        self.pool = dedupe_by_name(pool);
        self.consumed.clear();

        let owned: HashSet<&str> = my_interests.iter().map(|i| i.name.as_str()).collect();
        self.window = self
            .pool
            .iter()
            .filter(|i| !owned.contains(i.name.as_str()))
            .take(DISPLAY_WINDOW_SIZE)
            .cloned()
            .collect();
    }

    /// Current display window, in pool order.
    pub fn window(&self) -> &[Interest] {
        &self.window
    }

    pub fn status(&self) -> RotatorStatus {
        if self.window.is_empty() {
            RotatorStatus::Exhausted
        } else {
            RotatorStatus::Active
        }
    }

    /// Remove `name` from the window and backfill with the first pool item
    /// that is not owned, not displayed, and not previously consumed.  If no
    /// candidate remains the window just shrinks.
    pub fn consume(&mut self, name: &str, my_interests: &[Interest]) {
        let before = self.window.len();
        self.window.retain(|i| i.name != name);
        if self.window.len() == before {
            return;
        }
        self.consumed.insert(name.to_string());

        let mut used: HashSet<&str> = my_interests.iter().map(|i| i.name.as_str()).collect();
        used.extend(self.window.iter().map(|i| i.name.as_str()));
        used.extend(self.consumed.iter().map(String::as_str));

        if let Some(next) = self.pool.iter().find(|i| !used.contains(i.name.as_str())) {
            self.window.push(next.clone());
        }
    }

    /// Replace the pool and restart the rotation.  Returns the resulting
    /// status so callers can surface the no-recommendations state.
    pub fn refresh(&mut self, new_pool: Vec<Interest>, my_interests: &[Interest]) -> RotatorStatus {
        self.initialize(new_pool, my_interests);
        self.status()
    }

    /// Forget everything (logout).
    pub fn reset(&mut self) {
        self.pool.clear();
        self.window.clear();
        self.consumed.clear();
    }
}
