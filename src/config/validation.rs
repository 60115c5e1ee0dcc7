//! Configuration validation
//!
//! Validates cardsync configuration for correctness:
//! - At least one project, no duplicate names or codes
//! - Project codes usable as card title markers
//! - Default and primary projects exist
//! - Usernames, job names and link templates are filled in

use super::project::Project;
use super::sync_config::{SyncConfig, AVATAR_HASH_PLACEHOLDER};
use crate::CardSyncError;
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub context: Option<String>,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: None,
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref ctx) = self.context {
            write!(f, "[{}] {}: {}", ctx, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a cardsync configuration
pub fn validate_config(config: &SyncConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.projects.is_empty() {
        errors.push(ValidationError::new(
            "projects",
            "At least one project must be defined",
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_codes = HashSet::new();
    for project in &config.projects {
        if !seen_names.insert(&project.name) {
            errors.push(ValidationError::new(
                "projects",
                format!("Duplicate project name: {}", project.name),
            ));
        }
        if !seen_codes.insert(project.code()) {
            errors.push(ValidationError::new(
                "projects",
                format!("Duplicate project code: {}", project.code()),
            ));
        }
    }

    for project in &config.projects {
        errors.extend(validate_project(project));
    }

    for (field, name) in [
        ("default_project", &config.default_project),
        ("primary_project", &config.primary_project),
    ] {
        if config.get_project(name).is_none() {
            errors.push(ValidationError::new(
                field,
                format!("Unknown project '{}'", name),
            ));
        }
    }

    for (field, value) in [
        ("ignore_user.github", &config.ignore_user.github),
        ("ignore_user.trello", &config.ignore_user.trello),
        ("jenkins.refresh_branches", &config.jenkins.refresh_branches),
        ("jenkins.deploy_staging", &config.jenkins.deploy_staging),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "Value cannot be empty"));
        }
    }

    if !config.links.trello_avatar.contains(AVATAR_HASH_PLACEHOLDER) {
        errors.push(ValidationError::new(
            "links.trello_avatar",
            format!("Template must contain '{}'", AVATAR_HASH_PLACEHOLDER),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a single project
fn validate_project(project: &Project) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if project.name.is_empty() {
        errors.push(ValidationError::new("name", "Project name cannot be empty"));
    }

    if !is_valid_project_code(project.code()) {
        errors.push(
            ValidationError::new(
                "trello.code",
                format!(
                    "Invalid project code '{}': must be one or more uppercase letters A-Z",
                    project.code()
                ),
            )
            .with_context(&project.name),
        );
    }

    if project.github.owner.is_empty() {
        errors.push(
            ValidationError::new("github.owner", "GitHub owner cannot be empty")
                .with_context(&project.name),
        );
    }

    if project.github.repo.is_empty() {
        errors.push(
            ValidationError::new("github.repo", "GitHub repo cannot be empty")
                .with_context(&project.name),
        );
    }

    errors
}

/// Codes must be matchable by the `#CODE` title marker
fn is_valid_project_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &SyncConfig) -> crate::Result<()> {
    validate_config(config).map_err(CardSyncError::Validation)
}
