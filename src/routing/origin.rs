//! Origin filtering
//!
//! Drops events we caused ourselves (our writes to Trello come back as
//! card events) and GitHub events from repositories outside the primary
//! project.

use crate::bus::RepositoryRef;
use crate::config::{GitHubRepo, IgnoredUsers, SyncConfig};

/// Loop and scope guard
#[derive(Debug, Clone)]
pub struct OriginFilter {
    ignored: IgnoredUsers,
    primary_repo: GitHubRepo,
}

impl OriginFilter {
    pub fn new(ignored: IgnoredUsers, primary_repo: GitHubRepo) -> Self {
        Self {
            ignored,
            primary_repo,
        }
    }

    /// Build the filter from configuration and the resolved primary project
    pub fn from_config(config: &SyncConfig, primary_repo: GitHubRepo) -> Self {
        Self::new(config.ignore_user.clone(), primary_repo)
    }

    /// True for our own Trello or GitHub username
    pub fn is_ignored_user(&self, username: &str) -> bool {
        username == self.ignored.github || username == self.ignored.trello
    }

    /// True when the repository is exactly the primary project's repository
    pub fn is_in_scope(&self, repository: &RepositoryRef) -> bool {
        self.primary_repo
            .matches(&repository.name, &repository.owner)
    }
}
