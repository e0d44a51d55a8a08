//! Client side of the Citadel: a typed REST client, the comment thread
//! builder and the terminal renderer the `citadel` binary is built on.

pub mod api;
pub mod boards;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod shell;
pub mod thread;
pub mod view;

pub use error::ClientError;

/// The identity of every caller without a session.
pub const ANONYMOUS: &str = "Anonymous";
