//! The async path: external extractors, fallbacks and batch refinement.

use async_trait::async_trait;
use prompt_refinery::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Reports a storefront for any image and counts how often it was asked.
struct StorefrontVision {
    calls: AtomicUsize,
}

#[async_trait]
impl Extractor for StorefrontVision {
    fn name(&self) -> &str {
        "storefront-vision"
    }

    async fn extract(&self, references: &[String]) -> Result<PartialSignal, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PartialSignal {
            intent: Some(Intent::new("Online bakery storefront", "e-commerce").for_users("customers")),
            functional: vec!["Browse products".to_string(); references.len()],
            constraints: Vec::new(),
            outputs: vec!["Product grid".to_string()],
        })
    }
}

struct Offline;

#[async_trait]
impl Extractor for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    async fn extract(&self, _references: &[String]) -> Result<PartialSignal, ExtractError> {
        Err(ExtractError::Backend("connection refused".to_string()))
    }
}

struct Stalled;

#[async_trait]
impl Extractor for Stalled {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn extract(&self, _references: &[String]) -> Result<PartialSignal, ExtractError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(PartialSignal::default())
    }
}

/// Finds nothing at all.
struct Blind;

#[async_trait]
impl Extractor for Blind {
    fn name(&self) -> &str {
        "blind"
    }

    async fn extract(&self, _references: &[String]) -> Result<PartialSignal, ExtractError> {
        Ok(PartialSignal::default())
    }
}

#[tokio::test]
async fn test_without_collaborators_matches_sync_process() {
    let system = RefinementSystem::new();
    let input = RawInput::new().text("tracking app").image("a.png").document("b.pdf");

    let mut from_async = system.process_with(input.clone(), &Collaborators::new()).await;
    let from_sync = system.process(input);
    from_async.meta.prompt_id = from_sync.meta.prompt_id;

    assert_eq!(from_async, from_sync);
}

#[tokio::test]
async fn test_vision_extractor_drives_image_only_intent() {
    let vision = Arc::new(StorefrontVision {
        calls: AtomicUsize::new(0),
    });
    let collaborators = Collaborators::new().with_vision(vision.clone());

    let prompt = RefinementSystem::new()
        .process_with(RawInput::new().images(["home.png", "cart.png"]), &collaborators)
        .await;

    assert_eq!(vision.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prompt.intent.domain.as_deref(), Some("e-commerce"));
    assert_eq!(prompt.intent.target_users.as_deref(), Some("customers"));
    // Two identical fragments collapse into one requirement.
    assert_eq!(prompt.functional_requirements.len(), 1);
    assert_eq!(prompt.meta.confidence_score, 1.0);
}

#[tokio::test]
async fn test_text_intent_still_wins_over_extractor() {
    let collaborators = Collaborators::new().with_vision(Arc::new(StorefrontVision {
        calls: AtomicUsize::new(0),
    }));

    let prompt = RefinementSystem::new()
        .process_with(
            RawInput::new().text("Design a bakery website").image("bakery_ui.png"),
            &collaborators,
        )
        .await;

    assert_eq!(prompt.intent.summary.as_deref(), Some("Design a bakery website"));
    assert!(prompt.expected_outputs.contains("Product grid"));
}

#[tokio::test]
async fn test_failing_extractor_falls_back_to_placeholder() {
    let collaborators = Collaborators::new().with_documents(Arc::new(Offline));

    let prompt = RefinementSystem::new()
        .process_with(RawInput::new().document("spec.pdf"), &collaborators)
        .await;

    assert_eq!(prompt.intent.domain.as_deref(), Some("technical system"));
    assert!(prompt.technical_constraints.contains("Follow documented specifications"));
}

#[tokio::test]
async fn test_stalled_extractor_times_out() {
    let collaborators = Collaborators::new()
        .with_vision(Arc::new(Stalled))
        .with_timeout(Duration::from_millis(20));

    let prompt = RefinementSystem::new()
        .process_with(RawInput::new().image("slow.png"), &collaborators)
        .await;

    assert_eq!(prompt.intent.domain.as_deref(), Some("design"));
}

#[tokio::test]
async fn test_empty_extraction_leads_to_rejection() {
    let collaborators = Collaborators::new().with_vision(Arc::new(Blind));

    let prompt = RefinementSystem::new()
        .process_with(RawInput::new().image("noise.png"), &collaborators)
        .await;

    assert!(!prompt.is_accepted());
    assert_eq!(prompt.meta.confidence_score, 0.2);
    assert_eq!(prompt.inputs_provided.images, 1);
    assert!(prompt.needs_clarification());
}

#[tokio::test]
async fn test_batch_keeps_input_order() {
    let inputs = vec![
        RawInput::new().document("a.pdf"),
        RawInput::new(),
        RawInput::new().text("A reporting tool with a dashboard"),
    ];

    let prompts = RefinementSystem::new()
        .process_all_with(inputs, &Collaborators::new())
        .await;

    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[0].intent.domain.as_deref(), Some("technical system"));
    assert!(!prompts[1].is_accepted());
    assert_eq!(prompts[2].intent.domain.as_deref(), Some("software"));

    let ids: std::collections::HashSet<_> = prompts.iter().map(|p| p.meta.prompt_id).collect();
    assert_eq!(ids.len(), 3);
}
