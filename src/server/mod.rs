//! HTTP server: routes, handlers and the builder that wires them to a store

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::{build_app, build_routes};
pub use state::AppState;
