//! Configuration system
//!
//! Static configuration loaded once at startup from ~/.config/cardsync/config.yaml:
//! - Tracked projects (Trello code ↔ GitHub repository), in resolution order
//! - Default project for unrouted cards, primary project for Jenkins builds
//! - Our own usernames, used to drop echoes of our writes
//! - Jenkins job identifiers and link templates

mod project;
mod sync_config;
pub mod validation;

pub use project::{GitHubRepo, Project, TrelloBoard};
pub use sync_config::{IgnoredUsers, JenkinsJobs, LinkTemplates, SyncConfig, AVATAR_HASH_PLACEHOLDER};
pub use validation::{validate_config, validate_config_result, ValidationError};
