//! Tracked project configuration
//!
//! A project ties one Trello project code to one GitHub repository.

use serde::{Deserialize, Serialize};

/// GitHub repository identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRepo {
    /// Organization or user owning the repository
    pub owner: String,

    /// Repository name
    pub repo: String,
}

impl GitHubRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Exact match on both name and owner
    pub fn matches(&self, name: &str, owner: &str) -> bool {
        self.repo == name && self.owner == owner
    }
}

/// Trello side of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrelloBoard {
    /// Project code used as the card title marker (e.g. "SHOP" in "#SHOP-42")
    pub code: String,
}

/// A tracked project
///
/// Projects are loaded once at startup and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Internal name, referenced by `default_project` / `primary_project`
    pub name: String,

    /// Repository that receives issues for this project
    pub github: GitHubRepo,

    /// Trello project code
    pub trello: TrelloBoard,
}

impl Project {
    /// Create a new project
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            github: GitHubRepo::new(owner, repo),
            trello: TrelloBoard { code: code.into() },
        }
    }

    /// The project code embedded in card titles
    pub fn code(&self) -> &str {
        &self.trello.code
    }
}
