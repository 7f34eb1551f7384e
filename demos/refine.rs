//! Runs the refinement pipeline over a handful of typical inputs.
//!
//! This example demonstrates:
//! - Text-only, mixed and reference-only inputs
//! - The rejection path when nothing usable is provided
//! - Tracing each stage with `MemoryTelemetry`
//! - Extending the text rule table

use prompt_refinery::prelude::*;

// ============================================================================
// Scenarios
// ============================================================================

fn scenarios() -> Vec<(&'static str, RawInput)> {
    vec![
        (
            "Text only",
            RawInput::new().text("Build a mobile app to track expenses and generate monthly reports"),
        ),
        (
            "Text and image",
            RawInput::new()
                .text("Design a bakery website")
                .image("bakery_ui.png"),
        ),
        ("Document only", RawInput::new().document("specification.pdf")),
        ("Image only", RawInput::new().image("dashboard.png")),
        ("Nothing", RawInput::new()),
    ]
}

fn show(title: &str, prompt: &RefinedPrompt) -> Result<(), serde_json::Error> {
    println!("\n--- {} ---", title);
    println!(
        "accepted: {}, confidence: {:.2}",
        prompt.is_accepted(),
        prompt.meta.confidence_score
    );
    if prompt.needs_clarification() {
        for question in &prompt.open_questions {
            println!("  ? {}", question);
        }
    }
    println!("{}", prompt.to_json_pretty()?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<(), serde_json::Error> {
    println!("=== Prompt Refinery Example ===");

    let system = RefinementSystem::new();
    for (title, input) in scenarios() {
        let prompt = system.process(input);
        show(title, &prompt)?;
    }

    // --- Tracing: one entry per stage that ran ---
    println!("\n\n--- Traced run ---");
    let telemetry = MemoryTelemetry::new();
    system.process_traced(
        RawInput::new().text("A platform with a dashboard").document("notes.txt"),
        &telemetry,
    );
    for trace in telemetry.get_traces() {
        println!(
            "  {:<16} -> {}",
            trace.stage,
            trace.action.as_deref().unwrap_or("(end)")
        );
    }

    // --- Custom rules ---
    let parser = TextParser::new().push_rule(TextRule::new(
        ["offline"],
        RuleEffect::Constraint("Works without a network connection".to_string()),
    ));
    let prompt = RefinementSystem::new()
        .with_text_parser(parser)
        .process(RawInput::new().text("An offline notes app"));
    show("Custom rule", &prompt)?;

    println!("\n=== Done ===");
    Ok(())
}
