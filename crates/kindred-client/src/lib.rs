//! Client-side engagement engine for the Kindred desktop app.
//!
//! [`EngagementCache`] owns the remote gateway, the durable store, and the
//! in-memory working state; [`SearchCoordinator`] runs the debounced user
//! search; [`RecommendationRotator`] drives the interest carousel; and the
//! [`ChangeBus`] fans mutations out to whatever views are open.

pub mod cache;
pub mod error;
pub mod events;
pub mod rotator;
pub mod search;

#[cfg(test)]
mod support;

pub use cache::{EngagementCache, LoadOutcome, MatchCard, ProfileView, Section};
pub use error::{EngineError, Result};
pub use events::{ChangeBus, ChangeEvent};
pub use rotator::{RecommendationRotator, RotatorStatus};
pub use search::{SearchCoordinator, SearchState};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber (respects `RUST_LOG`).
///
/// Call once at startup; embedding hosts that install their own subscriber
/// should skip this.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("kindred_client=debug,kindred_net=debug,kindred_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
