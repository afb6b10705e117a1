//! End-to-end turns through the assembled pipeline against the in-memory
//! store, with a scripted completion client standing in for the endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use unihelp_chat::{ChatPipeline, ValidationPolicy};
use unihelp_config::ChatConfig;
use unihelp_core::completion::CompletionClient;
use unihelp_core::DocumentStore;
use unihelp_core::error::CompletionError;
use unihelp_core::evaluation::{NewEvaluation, SearchFilters};
use unihelp_core::message::{Feedback, MessageKind};
use unihelp_core::validation::{ValidationClaim, ValidationVerdict};
use unihelp_store::in_memory::InMemoryStore;

struct ScriptedClient {
    script: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(mut responses: Vec<String>) -> Self {
        responses.reverse();
        Self {
            script: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| CompletionError::Upstream("script exhausted".into()))
    }
}

/// Blocks each completion until released, to hold the loading gate open.
struct GatedClient {
    gate: Arc<Notify>,
}

#[async_trait]
impl CompletionClient for GatedClient {
    fn name(&self) -> &str {
        "gated"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.gate.notified().await;
        Ok("finally, an answer".into())
    }
}

struct NeverPolicy;

impl ValidationPolicy for NeverPolicy {
    fn should_inject(&self) -> bool {
        false
    }

    fn pick<'a>(&self, _claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim> {
        None
    }
}

struct AlwaysPolicy;

impl ValidationPolicy for AlwaysPolicy {
    fn should_inject(&self) -> bool {
        true
    }

    fn pick<'a>(&self, claims: &'a [ValidationClaim]) -> Option<&'a ValidationClaim> {
        claims.first()
    }
}

fn evaluation(subject: &str, instructor: &str, text: &str) -> NewEvaluation {
    NewEvaluation {
        subject: subject.into(),
        instructor: instructor.into(),
        term: "2024.2".into(),
        clarity_rating: 4,
        alignment_rating: 4,
        free_text: text.into(),
        submitter_id: None,
    }
}

#[tokio::test]
async fn cited_answer_carries_the_stored_record_id() {
    let store = Arc::new(InMemoryStore::new());
    let record_id = store
        .submit_evaluation(evaluation(
            "Calculus 1",
            "Ana Paula",
            "allows one page of notes",
        ))
        .await
        .unwrap();

    let client = Arc::new(ScriptedClient::new(vec![format!(
        "Yes, other students say the exam allows one page of notes.[ID:{record_id}]"
    )]));
    let pipeline = ChatPipeline::from_parts(
        store,
        client.clone(),
        Box::new(NeverPolicy),
        &ChatConfig::default(),
        None,
    );
    pipeline
        .session()
        .set_filters(SearchFilters {
            subject: Some("Calculus 1".into()),
            ..Default::default()
        })
        .await;

    let before = pipeline.session().messages().await.len();
    assert!(pipeline.send("Can I bring notes to the Calculus 1 exam?").await);

    let messages = pipeline.session().messages().await;
    assert_eq!(messages.len(), before + 2);

    let answer = messages.last().unwrap();
    assert_eq!(
        answer.text,
        "Yes, other students say the exam allows one page of notes."
    );
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].record_id, record_id);
    assert_eq!(answer.sources[0].label, "Source #1");

    // The record and the active filter both made it into the prompt.
    let prompt = client.prompts().pop().unwrap();
    assert!(prompt.contains(&format!("[ID:{record_id}]")));
    assert!(prompt.contains("subject Calculus 1"));
    assert!(prompt.ends_with("UniHelp:"));
}

#[tokio::test]
async fn submission_while_loading_is_dropped_silently() {
    let gate = Arc::new(Notify::new());
    let pipeline = Arc::new(ChatPipeline::from_parts(
        Arc::new(InMemoryStore::new()),
        Arc::new(GatedClient { gate: gate.clone() }),
        Box::new(NeverPolicy),
        &ChatConfig::default(),
        None,
    ));

    let first = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.send("first question").await })
    };

    // Wait for the first turn to claim the gate.
    while !pipeline.session().is_loading().await {
        tokio::task::yield_now().await;
    }

    assert!(!pipeline.send("impatient second question").await);

    gate.notify_one();
    assert!(first.await.unwrap());

    let messages = pipeline.session().messages().await;
    // greeting + first question + its answer, nothing from the second
    assert_eq!(messages.len(), 3);
    assert!(messages.iter().all(|m| m.text != "impatient second question"));
    assert!(!pipeline.session().is_loading().await);
}

#[tokio::test]
async fn feedback_toggles_a_single_answer() {
    let pipeline = ChatPipeline::from_parts(
        Arc::new(InMemoryStore::new()),
        Arc::new(ScriptedClient::new(vec!["answer one".into(), "answer two".into()])),
        Box::new(NeverPolicy),
        &ChatConfig::default(),
        None,
    );

    assert!(pipeline.send("q1").await);
    assert!(pipeline.send("q2").await);

    // messages: [greeting, q1, answer one, q2, answer two]
    pipeline.session().record_feedback(2, Feedback::Helpful).await;
    pipeline.session().record_feedback(2, Feedback::NotHelpful).await;

    let messages = pipeline.session().messages().await;
    assert_eq!(messages[2].feedback, Some(Feedback::NotHelpful));
    let flagged: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, m)| m.feedback.is_some())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(flagged, vec![2]);
}

#[tokio::test(start_paused = true)]
async fn validation_verdict_is_acknowledged_and_persisted() {
    let store = Arc::new(InMemoryStore::new());
    let pipeline = ChatPipeline::from_parts(
        store.clone(),
        Arc::new(ScriptedClient::new(vec!["an answer".into()])),
        Box::new(AlwaysPolicy),
        &ChatConfig::default(),
        None,
    );

    assert!(pipeline.send("a question").await);
    tokio::time::sleep(Duration::from_millis(2000)).await;
    tokio::task::yield_now().await;

    let messages = pipeline.session().messages().await;
    let prompt = messages.last().unwrap();
    assert_eq!(prompt.kind, MessageKind::ValidationPrompt);
    let claim_id = prompt.validation_id.unwrap();

    pipeline
        .session()
        .record_validation_response(claim_id, ValidationVerdict::True)
        .await;

    let messages = pipeline.session().messages().await;
    assert!(messages.last().unwrap().text.contains("Thanks"));

    // The response write is fire-and-forget; let it land.
    for _ in 0..50 {
        if store.validation_count().await == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
    }
    panic!("verdict never persisted");
}

#[tokio::test]
async fn reset_starts_over_with_the_greeting() {
    let pipeline = ChatPipeline::from_parts(
        Arc::new(InMemoryStore::new()),
        Arc::new(ScriptedClient::new(vec!["an answer".into()])),
        Box::new(NeverPolicy),
        &ChatConfig::default(),
        None,
    );

    assert!(pipeline.send("a question").await);
    assert_eq!(pipeline.session().messages().await.len(), 3);

    let old_id = pipeline.session().session_id().await;
    pipeline.session().reset_session(None).await;

    assert_eq!(pipeline.session().messages().await.len(), 1);
    assert_ne!(pipeline.session().session_id().await, old_id);
}
