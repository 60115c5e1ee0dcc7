//! Integration tests for cardsync
//!
//! These tests drive the synchronizer through the in-memory bus, from
//! published webhook events to the actions emitted toward each service.

use cardsync::bus::{
    ActionFailure, ActionKind, ActionOutcome, CardAttachmentEvent, CardCommentEvent, CardEvent,
    CardRef, CardUpdate, DryRunResponder, InMemoryBus, InboundEvent, IssueCreate, IssueState,
    JobBuild, JobParams, OutboundAction, PushEvent, ReleaseEvent, RepositoryRef, TrelloUser,
};
use cardsync::config::SyncConfig;
use cardsync::sync::Synchronizer;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn alice() -> TrelloUser {
    TrelloUser::new("alice", "Alice")
}

/// Bus answering issue creates with issue 42 on the shop repository
fn shop_bus() -> Arc<InMemoryBus> {
    Arc::new(InMemoryBus::with_responder(
        |action: &OutboundAction| -> ActionOutcome {
            match action {
                OutboundAction::IssueCreate(_) => Ok(json!({
                    "id": 42,
                    "url": "https://github.com/natuelabs/shop/issues/42"
                })),
                _ => Ok(json!({})),
            }
        },
    ))
}

async fn run(bus: &Arc<InMemoryBus>, events: Vec<InboundEvent>) -> Vec<OutboundAction> {
    let synchronizer = Synchronizer::start(&SyncConfig::example(), bus.clone()).unwrap();
    for event in events {
        bus.publish(event).await;
    }
    synchronizer.drain().await;
    bus.emitted()
}

mod card_tests {
    use super::*;

    #[tokio::test]
    async fn test_new_card_opens_issue_and_links_back() {
        let bus = shop_bus();
        let card = CardEvent::new("5f1e2d", "Fix login bug", alice());

        let emitted = run(&bus, vec![InboundEvent::CardCreated(card)]).await;

        assert_eq!(emitted.len(), 4);
        assert_eq!(
            emitted[0],
            OutboundAction::IssueCreate(IssueCreate {
                owner: "natuelabs".to_string(),
                repo: "shop".to_string(),
                title: "Fix login bug".to_string(),
            })
        );
        assert!(emitted.contains(&OutboundAction::CardUpdate(CardUpdate {
            id: "5f1e2d".to_string(),
            title: "#SHOP-42 Fix login bug".to_string(),
        })));

        let comments: Vec<String> = emitted
            .iter()
            .filter_map(|action| match action {
                OutboundAction::IssueCommentCreate(c) => Some(c.body.clone()),
                OutboundAction::CardCommentCreate(c) => Some(c.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(comments.len(), 2);
        assert!(comments.contains(&"Trello: https://trello.com/c/5f1e2d".to_string()));
        assert!(comments.contains(&"GitHub: https://github.com/natuelabs/shop/issues/42".to_string()));
    }

    #[tokio::test]
    async fn test_tracked_new_card_emits_nothing() {
        let bus = shop_bus();
        let card = CardEvent::new("5f1e2d", "#SHOP-42 Fix login bug", alice());

        assert!(run(&bus, vec![InboundEvent::CardCreated(card)]).await.is_empty());
    }

    #[tokio::test]
    async fn test_archived_card_closes_issue() {
        let bus = shop_bus();
        let card = CardEvent::new("5f1e2d", "#SHOP-42 Fix login bug", alice()).with_closed(true);

        let emitted = run(&bus, vec![InboundEvent::CardUpdated(card)]).await;

        let [OutboundAction::IssueUpdate(update)] = emitted.as_slice() else {
            panic!("expected a single issue update, got {:?}", emitted);
        };
        assert_eq!(update.id.as_str(), "42");
        assert_eq!(update.state, IssueState::Closed);
        assert_eq!(update.title, "Fix login bug");
        assert_eq!(
            serde_json::to_value(&emitted[0]).unwrap()["payload"]["state"],
            "closed"
        );
    }

    #[tokio::test]
    async fn test_our_own_title_rewrite_does_not_loop() {
        let bus = shop_bus();
        let bot = TrelloUser::new("porcupinebot", "Porcupine");
        let events = vec![
            InboundEvent::CardUpdated(CardEvent::new("5f1e2d", "#SHOP-42 Fix login bug", bot.clone())),
            InboundEvent::CardCommentCreated(CardCommentEvent {
                card: CardRef::new("5f1e2d", "#SHOP-42 Fix login bug"),
                user: bot.clone(),
                text: "GitHub: https://github.com/natuelabs/shop/issues/42".to_string(),
            }),
            InboundEvent::CardAttachmentCreated(CardAttachmentEvent {
                card: CardRef::new("5f1e2d", "#SHOP-42 Fix login bug"),
                user: bot,
                name: "build.log".to_string(),
                url: "https://trello.com/a/build.log".to_string(),
            }),
        ];

        assert!(run(&bus, events).await.is_empty());
    }

    #[tokio::test]
    async fn test_comment_and_attachment_reach_issue() {
        let bus = shop_bus();
        let card = CardRef::new("5f1e2d", "#BLOG-9 New post layout");
        let events = vec![
            InboundEvent::CardCommentCreated(CardCommentEvent {
                card: card.clone(),
                user: alice(),
                text: "Looks good".to_string(),
            }),
            InboundEvent::CardAttachmentCreated(CardAttachmentEvent {
                card,
                user: alice(),
                name: "mockup.png".to_string(),
                url: "https://trello.com/a/mockup.png".to_string(),
            }),
        ];

        let emitted = run(&bus, events).await;

        assert_eq!(emitted.len(), 2);
        for action in &emitted {
            let OutboundAction::IssueCommentCreate(comment) = action else {
                panic!("expected issue comment, got {:?}", action);
            };
            assert_eq!(comment.repo, "blog");
            assert_eq!(comment.card.id.as_str(), "9");
            assert!(comment.body.starts_with("Alice -> "));
        }
    }

    #[tokio::test]
    async fn test_failed_create_leaves_card_alone() {
        let bus = Arc::new(InMemoryBus::with_responder(
            |_: &OutboundAction| -> ActionOutcome { Err(ActionFailure::new("Bad credentials")) },
        ));
        let card = CardEvent::new("5f1e2d", "Fix login bug", alice());

        let emitted = run(&bus, vec![InboundEvent::CardCreated(card)]).await;

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].kind(), ActionKind::IssueCreate);
    }
}

mod jenkins_tests {
    use super::*;

    #[tokio::test]
    async fn test_push_and_release_on_primary_repo() {
        let bus = shop_bus();
        let shop = RepositoryRef::new("shop", "natuelabs");
        let events = vec![
            InboundEvent::PushCreated(PushEvent {
                repository: shop.clone(),
            }),
            InboundEvent::ReleaseCreated(ReleaseEvent {
                repository: shop,
                tag: "v1.2.0".to_string(),
            }),
        ];

        let emitted = run(&bus, events).await;

        assert_eq!(emitted.len(), 2);
        assert!(emitted.contains(&OutboundAction::JobBuild(JobBuild {
            job: "shop-refresh-branches".to_string(),
            params: None,
        })));
        assert!(emitted.contains(&OutboundAction::JobBuild(JobBuild {
            job: "shop-deploy-staging".to_string(),
            params: Some(JobParams {
                tag_string: "v1.2.0".to_string(),
            }),
        })));
    }

    #[tokio::test]
    async fn test_push_on_other_repo_is_ignored() {
        let bus = shop_bus();
        let events = vec![
            InboundEvent::PushCreated(PushEvent {
                repository: RepositoryRef::new("blog", "natuelabs"),
            }),
            InboundEvent::ReleaseCreated(ReleaseEvent {
                repository: RepositoryRef::new("shop", "a-fork"),
                tag: "v9.9.9".to_string(),
            }),
        ];

        assert!(run(&bus, events).await.is_empty());
    }
}

mod replay_tests {
    use super::*;

    #[tokio::test]
    async fn test_wire_events_with_dry_run_responder() {
        let bus = Arc::new(InMemoryBus::with_responder(DryRunResponder::new(100)));
        let lines = [
            r##"{"event":"trello.card.created","data":{"id":"a1","title":"#BLOG New post layout","user":{"username":"alice","name":"Alice"}}}"##,
            r#"{"event":"github.push.created","data":{"repository":{"name":"shop","owner":"natuelabs"}}}"#,
        ];
        let events = lines
            .iter()
            .map(|line| serde_json::from_str::<InboundEvent>(line).unwrap())
            .collect();

        let emitted = run(&bus, events).await;

        assert_eq!(emitted.len(), 5);
        assert!(emitted.contains(&OutboundAction::CardUpdate(CardUpdate {
            id: "a1".to_string(),
            title: "#BLOG-100 New post layout".to_string(),
        })));
        let wire = serde_json::to_value(&emitted[0]).unwrap();
        assert!(wire["action"] == "github.issue.create" || wire["action"] == "jenkins.job.build");
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("cardsync").join("config.yaml");

        let config = SyncConfig::example();
        config.save(&config_path).unwrap();

        let loaded = SyncConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.project_names(), vec!["shop", "blog"]);
    }

    #[tokio::test]
    async fn test_synchronizer_rejects_invalid_config() {
        let mut config = SyncConfig::example();
        config.projects[1].trello.code = "shop".to_string();

        let result = Synchronizer::start(&config, Arc::new(InMemoryBus::new()));
        let err = result.err().expect("lowercase code must be rejected");
        assert!(err.to_string().contains("validation failed"));
    }
}
