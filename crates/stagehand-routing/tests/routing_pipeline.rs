//! End-to-end tests for the registry, router, and director pipeline.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use stagehand_core::{AgentDescriptor, ContextLimits, Registry, TaskMetadata};
use stagehand_registry::{RegistryBuilder, StaticRegistry};
use stagehand_routing::{AgentDirector, AgentRouter, ContextStrategy, Decision, Reasoning, TaskKind};
use std::fs;
use tempfile::TempDir;

fn write_agent(dir: &TempDir, file: &str, content: &str) {
    fs::write(dir.path().join(file), content).expect("write agent doc");
}

fn router_over(registry: Registry) -> AgentRouter {
    AgentRouter::new(Box::new(StaticRegistry::new(registry)))
}

fn event_parser() -> AgentDescriptor {
    AgentDescriptor::new("EventParser")
        .with_domains(vec!["eventTypes".to_owned()])
        .with_capabilities(vec!["structure-validation".to_owned()])
        .with_expertise("eventTypes", 90)
        .with_context_limits(ContextLimits {
            optimal: 6000,
            maximum: 12000,
        })
}

#[test]
fn test_inferred_task_routes_to_declared_specialist() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    let router = router_over(registry);

    let mut metadata = router.infer_task_metadata("Analyze eventTypes structure for validation errors");
    metadata.task_id = "2.1".to_owned();
    assert_eq!(metadata.domain.as_deref(), Some("eventTypes"));
    assert_eq!(metadata.capability.as_deref(), Some("structure-validation"));

    let decision = router.route_task(&metadata);
    assert_eq!(decision.agent, "EventParser");
    assert_eq!(decision.reasoning, Reasoning::DomainCapabilityMatch);
    assert!((decision.confidence - 0.94).abs() < 1e-9);
}

#[test]
fn test_empty_registry_routes_to_fallback_with_caution() {
    let mut director = AgentDirector::new(router_over(Registry::new()));
    let direction = director.evaluate_and_direct("analyze anything at all", "9.9");

    // Fallback confidence 0.3 sits exactly on the caution threshold.
    assert_eq!(direction.decision, Decision::ExecuteWithCaution);
    assert_eq!(direction.agent.as_deref(), Some("EventParser"));
    assert!((direction.confidence - 0.3).abs() < f64::EPSILON);
}

#[test]
fn test_oversized_request_is_trimmed_to_maximum() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    let router = router_over(registry);

    let metadata = TaskMetadata::new("3.1")
        .with_domain("eventTypes")
        .with_capability("structure-validation")
        .with_context_size(15000);
    let decision = router.route_task(&metadata);

    let optimization = decision.context_optimization;
    assert_eq!(optimization.recommended, 12000);
    assert_eq!(optimization.strategy, ContextStrategy::TrimToMaximum);
    assert_eq!(optimization.trim_amount, Some(3000));
}

#[test]
fn test_task_id_prefix_classifies_history_entries() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    let mut director = AgentDirector::new(router_over(registry));

    director.evaluate_and_direct("validate eventTypes structure", "adhoc-1700000000000");
    director.evaluate_and_direct("validate eventTypes structure", "2.1");

    let history = director.history();
    assert_eq!(history[0].kind, TaskKind::Adhoc);
    assert_eq!(history[1].kind, TaskKind::Planned);
}

#[test]
fn test_capability_weight_dominates_raw_expertise() {
    let mut registry = Registry::new();
    registry.push(
        AgentDescriptor::new("CapableA")
            .with_domains(vec!["react".to_owned()])
            .with_capabilities(vec!["pattern-analysis".to_owned()])
            .with_expertise("react", 70),
    );
    registry.push(
        AgentDescriptor::new("ExpertB")
            .with_domains(vec!["react".to_owned()])
            .with_expertise("react", 90),
    );
    let router = router_over(registry);

    // Score(A) = 0.4*70 + 0.3*50 = 43 beats Score(B) = 0.4*90 = 36, so the
    // capability holder wins despite lower raw expertise.
    let decision = router.route_task(
        &TaskMetadata::new("5.1")
            .with_domain("react")
            .with_capability("pattern-analysis"),
    );
    assert_eq!(decision.agent, "CapableA");
    assert_eq!(decision.reasoning, Reasoning::DomainCapabilityMatch);
}

#[test]
fn test_routing_is_pure_over_fixed_inputs() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    let router = router_over(registry);

    let metadata = TaskMetadata::new("1.1")
        .with_domain("eventTypes")
        .with_capability("structure-validation")
        .with_context_size(8000);

    let first = router.route_task(&metadata);
    for _ in 0..5 {
        let again = router.route_task(&metadata);
        assert_eq!(again.agent, first.agent);
        assert_eq!(again.reasoning, first.reasoning);
        assert!((again.confidence - first.confidence).abs() < f64::EPSILON);
    }
}

#[test]
fn test_decision_partition_follows_thresholds() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    registry.push(
        AgentDescriptor::new("WeakAnalyzer")
            .with_domains(vec!["react".to_owned()])
            .with_expertise("react", 60),
    );
    let mut director = AgentDirector::new(router_over(registry));

    // 0.94 >= 0.6
    let execute = director.evaluate_and_direct("validate eventTypes structure", "7.1");
    assert_eq!(execute.decision, Decision::Execute);
    assert!(execute.confidence >= 0.6);

    // Domain-only react match: 60/100 * 0.6 = 0.36, inside [0.3, 0.6).
    let caution = director.evaluate_and_direct("work on react", "7.2");
    assert_eq!(caution.decision, Decision::ExecuteWithCaution);
    assert!(caution.confidence >= 0.3 && caution.confidence < 0.6);

    assert_eq!(director.history().len(), 2);
}

#[test]
fn test_registry_built_from_directory_feeds_routing() {
    let dir = TempDir::new().expect("temp dir");
    write_agent(
        &dir,
        "EventParser.md",
        "---\nname: EventParser\ndomains: eventTypes\ncapabilities: structure-validation\ncontextLimits: 6000,12000\n---\nDetailed comprehensive eventTypes validation with workflow coverage.\n",
    );
    write_agent(&dir, "broken.md", "---\ndomains: sql\n---\nNo name field here.\n");

    let builder = RegistryBuilder::new(dir.path());
    let router = AgentRouter::new(Box::new(builder));

    let registry = router.registry();
    assert_eq!(registry.len(), 1);

    let mut metadata = router.infer_task_metadata("validate eventTypes structure");
    metadata.task_id = "8.1".to_owned();
    let decision = router.route_task(&metadata);
    assert_eq!(decision.agent, "EventParser");
    assert_eq!(decision.reasoning, Reasoning::DomainCapabilityMatch);
}

#[test]
fn test_fallback_options_end_with_generalist() {
    let mut registry = Registry::new();
    registry.push(event_parser());
    let router = router_over(registry);

    let with_domain = router.route_task(
        &TaskMetadata::new("9.1")
            .with_domain("eventTypes")
            .with_capability("structure-validation"),
    );
    assert!(with_domain.fallback_options.len() <= 3);
    assert_eq!(
        with_domain
            .fallback_options
            .last()
            .expect("options present")
            .agent,
        "EventParser"
    );

    let without_domain = router.route_task(&TaskMetadata::new("9.2"));
    assert_eq!(without_domain.fallback_options.len(), 1);
    assert_eq!(without_domain.fallback_options[0].agent, "EventParser");
}
