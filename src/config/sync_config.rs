//! cardsync configuration file handling
//!
//! Loads and manages ~/.config/cardsync/config.yaml.

use super::project::Project;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the avatar hash in `LinkTemplates::trello_avatar`
pub const AVATAR_HASH_PLACEHOLDER: &str = "[hash]";

/// Usernames this system writes as; events from them are our own echoes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredUsers {
    /// Our GitHub account
    pub github: String,

    /// Our Trello account
    pub trello: String,
}

/// Jenkins job identifiers triggered from GitHub events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JenkinsJobs {
    /// Job run on every push to the primary repository
    pub refresh_branches: String,

    /// Job run on every release of the primary repository
    pub deploy_staging: String,
}

/// URL templates used when rendering comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplates {
    /// Avatar image URL, `[hash]` is replaced by the member's avatar hash
    #[serde(default = "default_trello_avatar")]
    pub trello_avatar: String,

    /// Prefix of a card deep link, the card id is appended
    #[serde(default = "default_trello_card")]
    pub trello_card: String,
}

fn default_trello_avatar() -> String {
    "https://trello-avatars.s3.amazonaws.com/[hash]/30.png".to_string()
}

fn default_trello_card() -> String {
    "https://trello.com/c/".to_string()
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            trello_avatar: default_trello_avatar(),
            trello_card: default_trello_card(),
        }
    }
}

impl LinkTemplates {
    /// Avatar URL for a member's avatar hash
    pub fn avatar_url(&self, hash: &str) -> String {
        self.trello_avatar.replace(AVATAR_HASH_PLACEHOLDER, hash)
    }

    /// Deep link to a card
    pub fn card_url(&self, card_id: &str) -> String {
        format!("{}{}", self.trello_card, card_id)
    }
}

/// cardsync configuration
///
/// Represents the complete config.yaml: the ordered project list, which
/// project catches unrouted cards, which project owns push/release events,
/// our own usernames and the Jenkins jobs to trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Tracked projects, in resolution order
    pub projects: Vec<Project>,

    /// Project used when a card names no (known) project
    pub default_project: String,

    /// Project whose repository drives Jenkins builds
    pub primary_project: String,

    /// Our own usernames per service
    pub ignore_user: IgnoredUsers,

    /// Jenkins job identifiers
    pub jenkins: JenkinsJobs,

    /// Link templates
    #[serde(default)]
    pub links: LinkTemplates,
}

impl SyncConfig {
    /// Create a configuration with a single project that is both default and primary
    pub fn single_project(project: Project, ignore_user: IgnoredUsers, jenkins: JenkinsJobs) -> Self {
        Self {
            default_project: project.name.clone(),
            primary_project: project.name.clone(),
            projects: vec![project],
            ignore_user,
            jenkins,
            links: LinkTemplates::default(),
        }
    }

    /// Example configuration written by `cardsync init`
    pub fn example() -> Self {
        let mut config = Self::single_project(
            Project::new("shop", "natuelabs", "shop", "SHOP"),
            IgnoredUsers {
                github: "porcupine-bot".to_string(),
                trello: "porcupinebot".to_string(),
            },
            JenkinsJobs {
                refresh_branches: "shop-refresh-branches".to_string(),
                deploy_staging: "shop-deploy-staging".to_string(),
            },
        );
        config.add_project(Project::new("blog", "natuelabs", "blog", "BLOG"));
        config
    }

    /// Load configuration from the default path (~/.config/cardsync/config.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::CardSyncError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading cardsync configuration");

        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;

        tracing::debug!(
            projects = config.projects.len(),
            default_project = %config.default_project,
            primary_project = %config.primary_project,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving cardsync configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/cardsync/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("cardsync");
        path.push("config.yaml");
        path
    }

    /// Get a project by name
    pub fn get_project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Append a project (it resolves after every existing one)
    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Get all project names in resolution order
    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.name.as_str()).collect()
    }
}
