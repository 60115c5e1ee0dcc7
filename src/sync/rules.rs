//! Synchronization rules
//!
//! One handler per inbound event kind. Each looks only at the event and the
//! static configuration, and either plans a single outbound action or skips
//! the event with a reason.

use super::chain::IssueCreatedContinuation;
use crate::bus::{
    CardAttachmentEvent, CardCommentEvent, CardEvent, InboundEvent, IssueCommentCreate,
    IssueCreate, IssueState, IssueTarget, IssueUpdate, JobBuild, JobParams, OutboundAction,
    PushEvent, ReleaseEvent, RepositoryRef, TrelloUser,
};
use crate::config::{JenkinsJobs, LinkTemplates, Project, SyncConfig};
use crate::identity::{self, IssueNumber};
use crate::routing::{OriginFilter, ProjectResolver};
use crate::Result;
use std::fmt;

/// Why an event produced no action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The event was caused by our own account
    IgnoredUser(String),

    /// A new card already carries an issue marker
    AlreadyTracked,

    /// The card is not linked to an issue
    Untracked,

    /// Push or release on a repository other than the primary project's
    OutOfScopeRepo { owner: String, name: String },
}

impl SkipReason {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::IgnoredUser(_) => "ignored_user",
            SkipReason::AlreadyTracked => "already_tracked",
            SkipReason::Untracked => "untracked",
            SkipReason::OutOfScopeRepo { .. } => "out_of_scope_repo",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::IgnoredUser(username) => write!(f, "event by ignored user '{}'", username),
            SkipReason::AlreadyTracked => f.write_str("card is already linked to an issue"),
            SkipReason::Untracked => f.write_str("card is not linked to an issue"),
            SkipReason::OutOfScopeRepo { owner, name } => {
                write!(f, "repository {}/{} is not the primary project", owner, name)
            }
        }
    }
}

/// A skipped event: the reason, and the title or repository it concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub reason: SkipReason,
    pub subject: String,
}

impl Skip {
    fn new(reason: SkipReason, subject: impl Into<String>) -> Self {
        Self {
            reason,
            subject: subject.into(),
        }
    }
}

/// An action the rules want emitted, plus what to do once it succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub action: OutboundAction,
    pub continuation: Option<IssueCreatedContinuation>,
}

impl PlannedAction {
    pub fn new(action: OutboundAction) -> Self {
        Self {
            action,
            continuation: None,
        }
    }

    pub fn with_continuation(mut self, continuation: IssueCreatedContinuation) -> Self {
        self.continuation = Some(continuation);
        self
    }
}

/// Outcome of the rules for one event
pub type Decision = std::result::Result<PlannedAction, Skip>;

/// Render the comment author: avatar image link when available, else the name
pub fn author_prefix(user: &TrelloUser, links: &LinkTemplates) -> String {
    match user.avatar_hash.as_deref().filter(|hash| !hash.is_empty()) {
        Some(hash) => format!(
            "![{name}]({url} \"{name}\")",
            name = user.name,
            url = links.avatar_url(hash)
        ),
        None => user.name.clone(),
    }
}

/// Stateless rules over immutable configuration
#[derive(Debug, Clone)]
pub struct RulesEngine {
    resolver: ProjectResolver,
    origin: OriginFilter,
    jobs: JenkinsJobs,
    links: LinkTemplates,
}

impl RulesEngine {
    pub fn new(
        resolver: ProjectResolver,
        origin: OriginFilter,
        jobs: JenkinsJobs,
        links: LinkTemplates,
    ) -> Self {
        Self {
            resolver,
            origin,
            jobs,
            links,
        }
    }

    /// Build the rules from configuration
    ///
    /// # Errors
    /// Returns a config error if the default or primary project is unknown.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let resolver = ProjectResolver::from_config(config)?;
        let origin = OriginFilter::from_config(config, resolver.primary_project().github.clone());

        Ok(Self::new(
            resolver,
            origin,
            config.jenkins.clone(),
            config.links.clone(),
        ))
    }

    pub fn resolver(&self) -> &ProjectResolver {
        &self.resolver
    }

    /// Decide what to do with one inbound event
    pub fn decide(&self, event: &InboundEvent) -> Decision {
        match event {
            InboundEvent::CardCreated(card) => self.card_created(card),
            InboundEvent::CardUpdated(card) => self.card_updated(card),
            InboundEvent::CardCommentCreated(comment) => self.card_comment_created(comment),
            InboundEvent::CardAttachmentCreated(attachment) => {
                self.card_attachment_created(attachment)
            }
            InboundEvent::PushCreated(push) => self.push_created(push),
            InboundEvent::ReleaseCreated(release) => self.release_created(release),
        }
    }

    fn card_created(&self, card: &CardEvent) -> Decision {
        self.check_user(&card.user, &card.title)?;
        if identity::is_tracked(&card.title) {
            return Err(Skip::new(SkipReason::AlreadyTracked, &card.title));
        }

        let project = self.resolver.resolve_by_title(&card.title);
        let action = OutboundAction::IssueCreate(IssueCreate {
            owner: project.github.owner.clone(),
            repo: project.github.repo.clone(),
            title: identity::strip_project_code(&card.title).to_string(),
        });

        Ok(PlannedAction::new(action).with_continuation(IssueCreatedContinuation::new(
            card,
            project,
            &self.links,
        )))
    }

    fn card_updated(&self, card: &CardEvent) -> Decision {
        let (project, id) = self.tracked_issue(&card.user, &card.title)?;

        Ok(PlannedAction::new(OutboundAction::IssueUpdate(IssueUpdate {
            owner: project.github.owner.clone(),
            repo: project.github.repo.clone(),
            id,
            state: IssueState::from_card_closed(card.closed),
            title: identity::strip(&card.title).to_string(),
            body: card.body.clone(),
        })))
    }

    fn card_comment_created(&self, comment: &CardCommentEvent) -> Decision {
        let (project, id) = self.tracked_issue(&comment.user, &comment.card.title)?;
        let body = format!("{} -> {}", author_prefix(&comment.user, &self.links), comment.text);

        Ok(PlannedAction::new(issue_comment(project, id, body)))
    }

    fn card_attachment_created(&self, attachment: &CardAttachmentEvent) -> Decision {
        let (project, id) = self.tracked_issue(&attachment.user, &attachment.card.title)?;
        let body = format!(
            "{} -> [{}]({})",
            author_prefix(&attachment.user, &self.links),
            attachment.name,
            attachment.url
        );

        Ok(PlannedAction::new(issue_comment(project, id, body)))
    }

    fn push_created(&self, push: &PushEvent) -> Decision {
        self.check_repository(&push.repository)?;

        Ok(PlannedAction::new(OutboundAction::JobBuild(JobBuild {
            job: self.jobs.refresh_branches.clone(),
            params: None,
        })))
    }

    fn release_created(&self, release: &ReleaseEvent) -> Decision {
        self.check_repository(&release.repository)?;

        Ok(PlannedAction::new(OutboundAction::JobBuild(JobBuild {
            job: self.jobs.deploy_staging.clone(),
            params: Some(JobParams {
                tag_string: release.tag.clone(),
            }),
        })))
    }

    fn check_user(&self, user: &TrelloUser, title: &str) -> std::result::Result<(), Skip> {
        if self.origin.is_ignored_user(&user.username) {
            return Err(Skip::new(SkipReason::IgnoredUser(user.username.clone()), title));
        }
        Ok(())
    }

    /// Guards shared by every handler acting on an existing issue
    fn tracked_issue(
        &self,
        user: &TrelloUser,
        title: &str,
    ) -> std::result::Result<(&Project, IssueNumber), Skip> {
        self.check_user(user, title)?;
        let id = identity::issue_number(title).ok_or_else(|| Skip::new(SkipReason::Untracked, title))?;

        Ok((self.resolver.resolve_by_title(title), id))
    }

    fn check_repository(&self, repository: &RepositoryRef) -> std::result::Result<(), Skip> {
        if self.origin.is_in_scope(repository) {
            return Ok(());
        }
        Err(Skip::new(
            SkipReason::OutOfScopeRepo {
                owner: repository.owner.clone(),
                name: repository.name.clone(),
            },
            format!("{}/{}", repository.owner, repository.name),
        ))
    }
}

fn issue_comment(project: &Project, id: IssueNumber, body: String) -> OutboundAction {
    OutboundAction::IssueCommentCreate(IssueCommentCreate {
        owner: project.github.owner.clone(),
        repo: project.github.repo.clone(),
        card: IssueTarget { id },
        body,
    })
}
