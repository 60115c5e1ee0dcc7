//! cardsync - Trello, GitHub and Jenkins kept in step
//!
//! cardsync listens to events from a Trello board and a GitHub repository
//! and turns them into actions on the other side: a new card opens an
//! issue, card edits and comments flow to the issue, and pushes and
//! releases on the primary repository trigger Jenkins jobs.
//!
//! # Architecture
//!
//! - **identity**: Card title codec, the only link between card and issue
//! - **config**: Projects, ignored users and Jenkins jobs (YAML)
//! - **routing**: Project resolution and origin filtering
//! - **bus**: Event bus contract, event/action payloads, in-memory bus
//! - **sync**: Rules engine, action dispatcher and the synchronizer

pub mod bus;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod routing;
pub mod sync;

// Re-exports
pub use error::{CardSyncError, Result};
