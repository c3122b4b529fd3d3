// Typed access to the remote matchmaking service over HTTP.

pub mod error;
pub mod gateway;
pub mod http;
pub mod normalize;

pub use error::{RemoteError, Result};
pub use gateway::RemoteGateway;
pub use http::HttpGateway;
