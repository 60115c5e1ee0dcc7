//! Project resolution
//!
//! Maps a card title or a repository identity onto a configured project.
//! Projects are scanned in configuration order; the first match wins and
//! the default project catches everything else.

use crate::config::{Project, SyncConfig};
use crate::identity;
use crate::{CardSyncError, Result};
use tracing::{debug, warn};

/// Read-only project lookup
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    projects: Vec<Project>,
    default_index: usize,
    primary_index: usize,
}

impl ProjectResolver {
    /// Create a resolver over an ordered project list
    ///
    /// # Errors
    /// Returns a config error if the default or primary project is not in the list.
    pub fn new(projects: Vec<Project>, default_project: &str, primary_project: &str) -> Result<Self> {
        let index_of = |name: &str, role: &str| {
            projects
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| {
                    CardSyncError::Config(format!("{} project '{}' is not configured", role, name))
                })
        };

        let default_index = index_of(default_project, "Default")?;
        let primary_index = index_of(primary_project, "Primary")?;

        Ok(Self {
            projects,
            default_index,
            primary_index,
        })
    }

    /// Create a resolver from the loaded configuration
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(
            config.projects.clone(),
            &config.default_project,
            &config.primary_project,
        )
    }

    /// Project for unrouted cards and unknown repositories
    pub fn default_project(&self) -> &Project {
        &self.projects[self.default_index]
    }

    /// Project whose repository drives Jenkins builds
    pub fn primary_project(&self) -> &Project {
        &self.projects[self.primary_index]
    }

    /// All projects in resolution order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// First project with the given Trello code
    pub fn find_by_code(&self, code: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.code() == code)
    }

    /// Project named by the card title's leading `#CODE` marker
    ///
    /// Falls back to the default project when the title has no marker or
    /// the code is not configured. An unknown code is logged; the card is
    /// still routed.
    pub fn resolve_by_title(&self, title: &str) -> &Project {
        let Some(code) = identity::leading_project_code(title) else {
            return self.default_project();
        };

        match self.find_by_code(code) {
            Some(project) => {
                debug!(code = %code, project = %project.name, "Resolved project from card title");
                project
            }
            None => {
                let fallback = self.default_project();
                warn!(
                    code = %code,
                    title = %title,
                    fallback = %fallback.name,
                    "Unknown project code in card title, routing to default project"
                );
                fallback
            }
        }
    }

    /// Project owning the given repository, or the default project
    pub fn resolve_by_repo(&self, repo_name: &str, repo_owner: &str) -> &Project {
        self.projects
            .iter()
            .find(|p| p.github.matches(repo_name, repo_owner))
            .unwrap_or_else(|| self.default_project())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ProjectResolver {
        ProjectResolver::new(
            vec![
                Project::new("shop", "natuelabs", "shop", "SHOP"),
                Project::new("blog", "natuelabs", "blog", "BLOG"),
                Project::new("blog-legacy", "natuelabs", "blog-legacy", "BLOG"),
            ],
            "shop",
            "blog",
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_default_or_primary() {
        let projects = vec![Project::new("shop", "natuelabs", "shop", "SHOP")];

        assert!(ProjectResolver::new(projects.clone(), "blog", "shop").is_err());
        assert!(ProjectResolver::new(projects, "shop", "blog").is_err());
    }

    #[test]
    fn test_default_and_primary() {
        let resolver = resolver();
        assert_eq!(resolver.default_project().name, "shop");
        assert_eq!(resolver.primary_project().name, "blog");
    }

    #[test]
    fn test_resolve_by_title_marker() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_by_title("#BLOG New post").name, "blog");
        assert_eq!(resolver.resolve_by_title("#BLOG-12 New post").name, "blog");
        assert_eq!(resolver.resolve_by_title("#SHOP-3 Cart").name, "shop");
    }

    #[test]
    fn test_resolve_by_title_first_configured_match_wins() {
        assert_eq!(resolver().resolve_by_title("#BLOG x").name, "blog");
    }

    #[test]
    fn test_resolve_by_title_defaults() {
        let resolver = resolver();
        for title in ["Fix login bug", "#42 numeric", "#TYPO-4 unknown", "#blog lowercase"] {
            assert_eq!(resolver.resolve_by_title(title).name, "shop", "{}", title);
        }
    }

    #[test]
    fn test_resolve_by_repo() {
        let resolver = resolver();
        assert_eq!(resolver.resolve_by_repo("blog", "natuelabs").name, "blog");
        assert_eq!(resolver.resolve_by_repo("blog", "elsewhere").name, "shop");
        assert_eq!(resolver.resolve_by_repo("unknown", "natuelabs").name, "shop");
    }

    #[test]
    fn test_from_config() {
        let resolver = ProjectResolver::from_config(&SyncConfig::example()).unwrap();
        assert_eq!(resolver.projects().len(), 2);
        assert_eq!(resolver.find_by_code("BLOG").map(|p| p.name.as_str()), Some("blog"));
        assert!(resolver.find_by_code("NOPE").is_none());
    }
}
