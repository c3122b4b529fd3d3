//! The engagement cache: orchestrates remote fetches, the durable local
//! store, optimistic mutations, and the derived views.
//!
//! Reads reconcile remote state into the store and degrade per-section to
//! the cached copy when a fetch fails.  Mutations are two-phase: apply to
//! the in-memory snapshot first, confirm against the remote, then either
//! persist the optimistic state as durable or revert it exactly.  The user
//! never observes a state the remote did not commit.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tracing::{info, warn};

use kindred_net::{RemoteError, RemoteGateway};
use kindred_shared::compat::{self, FallbackBand};
use kindred_shared::constants::TRENDING_LIMIT;
use kindred_shared::types::{
    CompatibilityScore, ConversationSummary, Interest, Message, ScoreSource, TrendingTopic,
    UserSummary,
};
use kindred_store::Database;

use crate::error::{EngineError, Result};
use crate::events::{ChangeBus, ChangeEvent};
use crate::rotator::{RecommendationRotator, RotatorStatus};

/// A user plus the compatibility value to display for them.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCard {
    pub user: UserSummary,
    pub score: CompatibilityScore,
}

/// Which part of a load had to fall back to cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Matches,
    Suggestions,
    Interests,
}

/// Result of a full load.  Sections listed in `degraded` are serving the
/// last-known cached copy (or nothing) instead of fresh remote state.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub matches: Vec<MatchCard>,
    pub suggested: Vec<MatchCard>,
    pub interests: Vec<Interest>,
    pub degraded: Vec<Section>,
}

/// Everything needed to render another user's profile.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: UserSummary,
    pub interests: Vec<Interest>,
    pub is_match: bool,
    /// `None` until a match edge exists; their matches are gated.
    pub matches: Option<Vec<UserSummary>>,
    pub score: CompatibilityScore,
    pub common_interests: usize,
}

/// In-memory working copy of the remote-owned collections.
#[derive(Debug, Clone, Default, PartialEq)]
struct Snapshot {
    matches: Vec<UserSummary>,
    my_interests: Vec<Interest>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_auth(err: &RemoteError) -> bool {
    matches!(err, RemoteError::Auth | RemoteError::MissingCredential)
}

fn decorate(users: Vec<UserSummary>, band: FallbackBand) -> Vec<MatchCard> {
    users
        .into_iter()
        .map(|user| {
            let score = compat::display_score(user.compatibility, band);
            MatchCard { user, score }
        })
        .collect()
}

/// Client-side engagement state engine.
pub struct EngagementCache<G> {
    gateway: Arc<G>,
    store: Mutex<Database>,
    snapshot: Mutex<Snapshot>,
    rotator: Mutex<RecommendationRotator>,
    bus: ChangeBus,
}

impl<G: RemoteGateway> EngagementCache<G> {
    pub fn new(gateway: Arc<G>, store: Database) -> Self {
        Self {
            gateway,
            store: Mutex::new(store),
            snapshot: Mutex::new(Snapshot::default()),
            rotator: Mutex::new(RecommendationRotator::new()),
            bus: ChangeBus::new(),
        }
    }

    /// Receiver of change notifications.  Views re-read state on arrival.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChangeEvent> {
        self.bus.subscribe()
    }

    // -- reads ---------------------------------------------------------------

    /// Fetch matches, suggestions, and my interests, reconciling each into
    /// the store.  Sections fail independently: a dead suggestions endpoint
    /// must not blank out freshly loaded matches.  Auth failures are not
    /// degradable and propagate.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let mut degraded = Vec::new();

        let matches = match self.gateway.fetch_my_matches().await {
            Ok(users) => {
                if let Err(e) = lock(&self.store).store_matches(&users) {
                    warn!(error = %e, "failed to persist matches cache");
                }
                users
            }
            Err(err) if is_auth(&err) => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "match fetch failed, serving cached copy");
                degraded.push(Section::Matches);
                lock(&self.store)
                    .cached_matches()
                    .unwrap_or_default()
                    .unwrap_or_default()
            }
        };

        let suggested = match self.gateway.fetch_suggested().await {
            Ok(users) => users,
            Err(err) if is_auth(&err) => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "suggestion fetch failed");
                degraded.push(Section::Suggestions);
                Vec::new()
            }
        };

        let interests = match self.gateway.fetch_my_interests().await {
            Ok(interests) => {
                if let Err(e) = lock(&self.store).store_interests(&interests) {
                    warn!(error = %e, "failed to persist interests cache");
                }
                interests
            }
            Err(err) if is_auth(&err) => return Err(err.into()),
            Err(err) => {
                warn!(error = %err, "interest fetch failed, serving cached copy");
                degraded.push(Section::Interests);
                lock(&self.store)
                    .cached_interests()
                    .unwrap_or_default()
                    .unwrap_or_default()
            }
        };

        {
            let mut snapshot = lock(&self.snapshot);
            snapshot.matches = matches.clone();
            snapshot.my_interests = interests.clone();
        }

        info!(
            matches = matches.len(),
            suggested = suggested.len(),
            interests = interests.len(),
            degraded = degraded.len(),
            "engagement state loaded"
        );

        Ok(LoadOutcome {
            matches: decorate(matches, FallbackBand::Match),
            suggested: decorate(suggested, FallbackBand::Suggestion),
            interests,
            degraded,
        })
    }

    /// Current in-memory match set.
    pub fn my_matches(&self) -> Vec<UserSummary> {
        lock(&self.snapshot).matches.clone()
    }

    /// Current in-memory interest set.
    pub fn my_interests(&self) -> Vec<Interest> {
        lock(&self.snapshot).my_interests.clone()
    }

    // -- mutations (optimistic apply, remote confirm) ------------------------

    /// Create a match edge towards `username`.
    pub async fn connect(&self, username: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(EngineError::Validation("username must not be empty".into()));
        }

        let previous = {
            let mut snapshot = lock(&self.snapshot);
            let previous = snapshot.matches.clone();
            if !snapshot.matches.iter().any(|m| m.username == username) {
                snapshot.matches.push(UserSummary::new(username));
            }
            previous
        };

        match self.gateway.create_match(username).await {
            Ok(()) => {
                self.persist_matches();
                info!(target = username, "match created");
                Ok(())
            }
            Err(err) => {
                lock(&self.snapshot).matches = previous;
                warn!(target = username, error = %err, "match creation failed, reverted");
                Err(err.into())
            }
        }
    }

    /// Delete the match edge towards `username`.
    pub async fn disconnect(&self, username: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(EngineError::Validation("username must not be empty".into()));
        }

        let previous = {
            let mut snapshot = lock(&self.snapshot);
            let previous = snapshot.matches.clone();
            snapshot.matches.retain(|m| m.username != username);
            previous
        };

        match self.gateway.delete_match(username).await {
            Ok(()) => {
                self.persist_matches();
                info!(target = username, "match removed");
                Ok(())
            }
            Err(err) => {
                lock(&self.snapshot).matches = previous;
                warn!(target = username, error = %err, "match removal failed, reverted");
                Err(err.into())
            }
        }
    }

    /// Add an interest to my set.
    pub async fn like_interest(&self, interest: &Interest) -> Result<()> {
        if interest.name.trim().is_empty() {
            return Err(EngineError::Validation("interest name must not be empty".into()));
        }

        let previous = {
            let mut snapshot = lock(&self.snapshot);
            let previous = snapshot.my_interests.clone();
            if !snapshot.my_interests.iter().any(|i| i.name == interest.name) {
                snapshot.my_interests.push(interest.clone());
            }
            previous
        };

        match self.gateway.like_interest(&interest.name).await {
            Ok(()) => {
                self.persist_interests();
                info!(interest = %interest.name, "interest added");
                Ok(())
            }
            Err(err) => {
                lock(&self.snapshot).my_interests = previous;
                warn!(interest = %interest.name, error = %err, "like failed, reverted");
                Err(err.into())
            }
        }
    }

    /// Remove an interest from my set.
    pub async fn unlike_interest(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(EngineError::Validation("interest name must not be empty".into()));
        }

        let previous = {
            let mut snapshot = lock(&self.snapshot);
            let previous = snapshot.my_interests.clone();
            snapshot.my_interests.retain(|i| i.name != name);
            previous
        };

        match self.gateway.unlike_interest(name).await {
            Ok(()) => {
                self.persist_interests();
                info!(interest = name, "interest removed");
                Ok(())
            }
            Err(err) => {
                lock(&self.snapshot).my_interests = previous;
                warn!(interest = name, error = %err, "unlike failed, reverted");
                Err(err.into())
            }
        }
    }

    fn persist_matches(&self) {
        let matches = lock(&self.snapshot).matches.clone();
        if let Err(e) = lock(&self.store).store_matches(&matches) {
            warn!(error = %e, "failed to persist matches cache");
        }
        self.bus.publish(ChangeEvent::MatchesChanged);
    }

    fn persist_interests(&self) {
        let interests = lock(&self.snapshot).my_interests.clone();
        if let Err(e) = lock(&self.store).store_interests(&interests) {
            warn!(error = %e, "failed to persist interests cache");
        }
        self.bus.publish(ChangeEvent::InterestsChanged);
    }

    // -- derived views -------------------------------------------------------

    /// Compatibility with an arbitrary interest set, derived from the
    /// current snapshot.  Never persisted, never fails.
    pub fn compatibility_with(&self, their_interests: &[Interest]) -> CompatibilityScore {
        let snapshot = lock(&self.snapshot);
        CompatibilityScore {
            value: compat::score_from_common_interests(&snapshot.my_interests, their_interests),
            source: ScoreSource::Derived,
        }
    }

    /// Assemble another user's profile.  Their matches stay hidden until a
    /// match edge exists.  The profile record itself degrades to a default
    /// on failure; their interest list is essential and propagates errors.
    pub async fn profile(&self, username: &str) -> Result<ProfileView> {
        let user = match self.gateway.fetch_other_profile(username).await {
            Ok(user) => user,
            Err(err) if is_auth(&err) => return Err(err.into()),
            Err(err) => {
                warn!(username, error = %err, "profile fetch failed, using defaults");
                UserSummary::new(username)
            }
        };

        let their_interests = self.gateway.fetch_other_interests(username).await?;

        let my_matches = match self.gateway.fetch_my_matches().await {
            Ok(users) => {
                lock(&self.snapshot).matches = users.clone();
                if let Err(e) = lock(&self.store).store_matches(&users) {
                    warn!(error = %e, "failed to persist matches cache");
                }
                users
            }
            Err(err) => {
                warn!(error = %err, "match fetch failed, using snapshot");
                lock(&self.snapshot).matches.clone()
            }
        };
        let is_match = my_matches.iter().any(|m| m.username == username);

        let matches = if is_match {
            match self.gateway.fetch_other_matches(username).await {
                Ok(users) => Some(users),
                Err(err) => {
                    warn!(username, error = %err, "their match list failed to load");
                    Some(Vec::new())
                }
            }
        } else {
            None
        };

        let mine = match self.gateway.fetch_my_interests().await {
            Ok(interests) => {
                lock(&self.snapshot).my_interests = interests.clone();
                interests
            }
            Err(err) => {
                warn!(error = %err, "interest fetch failed, using snapshot");
                lock(&self.snapshot).my_interests.clone()
            }
        };

        let my_names: HashSet<&str> = mine.iter().map(|i| i.name.as_str()).collect();
        let common_interests = their_interests
            .iter()
            .filter(|t| my_names.contains(t.name.as_str()))
            .count();

        let score = CompatibilityScore {
            value: compat::score_from_common_interests(&mine, &their_interests),
            source: ScoreSource::Derived,
        };

        Ok(ProfileView {
            user,
            interests: their_interests,
            is_match,
            matches,
            score,
            common_interests,
        })
    }

    /// Top trending interests, capped for display.
    pub async fn trending(&self) -> Result<Vec<TrendingTopic>> {
        let mut topics = self.gateway.fetch_trending().await?;
        topics.truncate(TRENDING_LIMIT);
        Ok(topics)
    }

    // -- recommendation rotation ----------------------------------------------

    /// Fetch the recommendation pool and start a rotation over it.
    /// Returns the initial display window.
    pub async fn load_recommendations(&self) -> Result<Vec<Interest>> {
        let pool = self.gateway.fetch_recommended_interests().await?;
        let mine = lock(&self.snapshot).my_interests.clone();
        let mut rotator = lock(&self.rotator);
        rotator.initialize(pool, &mine);
        Ok(rotator.window().to_vec())
    }

    /// Current display window.
    pub fn recommendation_window(&self) -> Vec<Interest> {
        lock(&self.rotator).window().to_vec()
    }

    /// Like a recommended interest and rotate it out of the window.
    /// Returns the window after rotation.
    pub async fn like_recommended(&self, interest: &Interest) -> Result<Vec<Interest>> {
        self.like_interest(interest).await?;
        let mine = lock(&self.snapshot).my_interests.clone();
        let mut rotator = lock(&self.rotator);
        rotator.consume(&interest.name, &mine);
        Ok(rotator.window().to_vec())
    }

    /// Re-fetch the pool and restart the rotation.  `Exhausted` means the
    /// caller should surface the no-recommendations message.
    pub async fn refresh_recommendations(&self) -> Result<RotatorStatus> {
        let pool = self.gateway.fetch_recommended_interests().await?;
        let mine = lock(&self.snapshot).my_interests.clone();
        Ok(lock(&self.rotator).refresh(pool, &mine))
    }

    // -- chat ------------------------------------------------------------------

    /// The thread with `peer`, seeded on first access.
    pub fn thread(&self, peer: &str) -> Result<Vec<Message>> {
        Ok(lock(&self.store).load_thread(peer)?)
    }

    /// Append a message to `peer`'s thread.  The thread and its
    /// conversation summary are committed together.
    pub fn send_message(&self, peer: &str, avatar_url: &str, text: &str) -> Result<Message> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EngineError::Validation("message text must not be empty".into()));
        }

        let message = lock(&self.store).append_message(peer, avatar_url, trimmed, Local::now())?;

        self.bus.publish(ChangeEvent::ThreadUpdated {
            peer: peer.to_string(),
        });
        self.bus.publish(ChangeEvent::ConversationsChanged);
        Ok(message)
    }

    /// The recent-chats list, seeded on first access.
    pub fn conversations(&self) -> Result<Vec<ConversationSummary>> {
        Ok(lock(&self.store).list_conversations()?)
    }

    /// Re-read the recent-chats list and nudge subscribers.  Called on
    /// window focus to pick up changes made from another view.
    pub fn reload_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let conversations = self.conversations()?;
        self.bus.publish(ChangeEvent::ConversationsChanged);
        Ok(conversations)
    }

    // -- teardown ---------------------------------------------------------------

    /// Wipe all local state (logout).
    pub fn logout(&self) -> Result<()> {
        lock(&self.store).clear_all()?;
        *lock(&self.snapshot) = Snapshot::default();
        lock(&self.rotator).reset();
        self.bus.publish(ChangeEvent::MatchesChanged);
        self.bus.publish(ChangeEvent::InterestsChanged);
        self.bus.publish(ChangeEvent::ConversationsChanged);
        info!("session state cleared");
        Ok(())
    }
}
