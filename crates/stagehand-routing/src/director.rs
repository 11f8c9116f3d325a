use chrono::Utc;
use serde::{Deserialize, Serialize};
use stagehand_core::{DirectorConfig, TaskMetadata, ThresholdConfig};
use std::collections::BTreeMap;
use tracing::info;

use crate::router::AgentRouter;
use crate::types::{
    Decision, Direction, GapAnalysis, RoutingDecision, TaskHistoryEntry, TaskKind,
};

/// Agent-usage multiple above which an agent counts as overused.
const OVERUSE_FACTOR: f64 = 2.0;
/// Agent-usage multiple below which an agent counts as underused.
const UNDERUSE_FACTOR: f64 = 0.5;
/// Share of low-confidence routings that signals a capability gap.
const GAP_SHARE: f64 = 0.2;

/// Aggregated view over the director's task history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingPatterns {
    /// Number of tasks directed so far.
    pub total_tasks: usize,
    /// Mean routing confidence, 0.0 when no tasks were directed.
    pub average_confidence: f64,
    /// Tasks routed per agent.
    pub agent_usage: BTreeMap<String, usize>,
    /// Tasks per inferred domain; tasks without a domain land under
    /// `unknown`.
    pub domain_distribution: BTreeMap<String, usize>,
    /// Tasks entered from plans.
    pub planned_tasks: usize,
    /// Ad-hoc tasks.
    pub adhoc_tasks: usize,
    /// Tasks whose routing confidence fell below the execute threshold.
    pub low_confidence_tasks: usize,
}

/// Category of a system-improvement recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationKind {
    /// One agent absorbs a disproportionate share of tasks.
    OverusedAgent,
    /// An agent receives far fewer tasks than its peers.
    UnderusedAgent,
    /// Too many routings end up below the execute threshold.
    CapabilityGap,
}

/// One system-improvement recommendation derived from routing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommendation category.
    pub kind: RecommendationKind,
    /// Agent the recommendation concerns, absent for
    /// [`RecommendationKind::CapabilityGap`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Human-readable suggestion.
    pub suggestion: String,
}

/// Orchestrates task evaluation: infers metadata, routes, and turns
/// routing confidence into an actionable directive.
///
/// Every directed task is appended to an in-memory history which feeds
/// the pattern analysis and recommendation methods.
pub struct AgentDirector {
    router: AgentRouter,
    thresholds: ThresholdConfig,
    history: Vec<TaskHistoryEntry>,
}

impl AgentDirector {
    /// Creates a director over the given router with default thresholds.
    #[must_use]
    pub fn new(router: AgentRouter) -> Self {
        Self {
            router,
            thresholds: ThresholdConfig::default(),
            history: Vec::new(),
        }
    }

    /// Creates a fully configured director.
    #[must_use]
    pub fn from_config(config: &DirectorConfig) -> Self {
        Self {
            router: AgentRouter::from_config(config),
            thresholds: config.thresholds.clone(),
            history: Vec::new(),
        }
    }

    /// Overrides the decision thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Evaluates a task and produces a directive.
    ///
    /// Infers metadata from the description, routes, maps confidence to a
    /// decision, and appends a history entry. The history append happens
    /// for every call, including `SUGGEST_NEW_AGENT` outcomes.
    pub fn evaluate_and_direct(&mut self, description: &str, task_id: &str) -> Direction {
        info!("🎯 Evaluating task {task_id}");

        let mut metadata = self.router.infer_task_metadata(description);
        metadata.task_id = task_id.to_owned();

        info!(
            "📊 Inferred domain: {} | capability: {}",
            metadata.domain.as_deref().unwrap_or("unknown"),
            metadata.capability.as_deref().unwrap_or("unknown")
        );

        let routing = self.router.route_task(&metadata);
        let direction = self.create_direction(&metadata, &routing);
        self.track_decision(task_id, &metadata, &routing, direction.decision);

        direction
    }

    /// The append-only history of directed tasks.
    #[must_use]
    pub fn history(&self) -> &[TaskHistoryEntry] {
        &self.history
    }

    /// Maps routing confidence to a decision via the configured
    /// thresholds.
    fn create_direction(&self, metadata: &TaskMetadata, routing: &RoutingDecision) -> Direction {
        if routing.confidence >= self.thresholds.execute {
            return Direction {
                decision: Decision::Execute,
                agent: Some(routing.agent.clone()),
                model: Some(routing.model.clone()),
                confidence: routing.confidence,
                reasoning: Some(routing.reasoning),
                context_optimization: Some(routing.context_optimization),
                fallback_options: Vec::new(),
                gap_analysis: None,
                instructions: format!(
                    "Invoke {} for this task. Context optimized to {} tokens.",
                    routing.agent, routing.context_optimization.recommended
                ),
            };
        }

        if routing.confidence >= self.thresholds.caution {
            let fallback_names = routing
                .fallback_options
                .iter()
                .map(|option| option.agent.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Direction {
                decision: Decision::ExecuteWithCaution,
                agent: Some(routing.agent.clone()),
                model: Some(routing.model.clone()),
                confidence: routing.confidence,
                reasoning: Some(routing.reasoning),
                context_optimization: Some(routing.context_optimization),
                fallback_options: routing.fallback_options.clone(),
                gap_analysis: None,
                instructions: format!(
                    "Low confidence routing. Invoke {} but monitor closely. Fallback options: {fallback_names}",
                    routing.agent
                ),
            };
        }

        Direction {
            decision: Decision::SuggestNewAgent,
            agent: None,
            model: None,
            confidence: routing.confidence,
            reasoning: None,
            context_optimization: None,
            fallback_options: Vec::new(),
            gap_analysis: Some(analyze_capability_gap(metadata)),
            instructions: format!(
                "No suitable agent found. Consider creating a new agent specialized in {} with capability {}.",
                metadata.domain.as_deref().unwrap_or("general"),
                metadata.capability.as_deref().unwrap_or("unknown")
            ),
        }
    }

    /// Appends a history entry for a directed task.
    fn track_decision(
        &mut self,
        task_id: &str,
        metadata: &TaskMetadata,
        routing: &RoutingDecision,
        decision: Decision,
    ) {
        let kind = if task_id.starts_with("adhoc-") {
            TaskKind::Adhoc
        } else {
            TaskKind::Planned
        };

        self.history.push(TaskHistoryEntry {
            task_id: task_id.to_owned(),
            timestamp: Utc::now(),
            domain: metadata.domain.clone(),
            capability: metadata.capability.clone(),
            selected_agent: routing.agent.clone(),
            confidence: routing.confidence,
            decision,
            reasoning: routing.reasoning,
            kind,
        });
    }

    /// Read-only aggregation over the task history.
    #[must_use]
    pub fn analyze_routing_patterns(&self) -> RoutingPatterns {
        let total = self.history.len();
        let average_confidence = if total == 0 {
            0.0
        } else {
            let sum: f64 = self.history.iter().map(|entry| entry.confidence).sum();
            sum / total as f64
        };

        let mut agent_usage = BTreeMap::new();
        let mut domain_distribution = BTreeMap::new();
        let mut planned_tasks = 0;
        let mut adhoc_tasks = 0;

        for entry in &self.history {
            *agent_usage.entry(entry.selected_agent.clone()).or_insert(0) += 1;
            let domain = entry.domain.clone().unwrap_or_else(|| "unknown".to_owned());
            *domain_distribution.entry(domain).or_insert(0) += 1;
            match entry.kind {
                TaskKind::Planned => planned_tasks += 1,
                TaskKind::Adhoc => adhoc_tasks += 1,
            }
        }

        let low_confidence_tasks = self
            .history
            .iter()
            .filter(|entry| entry.confidence < self.thresholds.execute)
            .count();

        RoutingPatterns {
            total_tasks: total,
            average_confidence,
            agent_usage,
            domain_distribution,
            planned_tasks,
            adhoc_tasks,
            low_confidence_tasks,
        }
    }

    /// Derives system-improvement recommendations from the history.
    ///
    /// Flags agents used more than twice the per-agent average, agents
    /// used less than half of it, and a capability gap when more than 20%
    /// of routings fell below the execute threshold.
    #[must_use]
    pub fn generate_recommendations(&self) -> Vec<Recommendation> {
        let patterns = self.analyze_routing_patterns();
        let mut recommendations = Vec::new();

        if patterns.agent_usage.is_empty() {
            return recommendations;
        }

        let average_usage = patterns.total_tasks as f64 / patterns.agent_usage.len() as f64;

        for (agent, &usage) in &patterns.agent_usage {
            let usage_f = usage as f64;
            if usage_f > average_usage * OVERUSE_FACTOR {
                recommendations.push(Recommendation {
                    kind: RecommendationKind::OverusedAgent,
                    agent: Some(agent.clone()),
                    suggestion: format!(
                        "Consider creating specialized sub-agents to reduce load on {agent}"
                    ),
                });
            }
            if usage_f < average_usage * UNDERUSE_FACTOR && usage > 0 {
                recommendations.push(Recommendation {
                    kind: RecommendationKind::UnderusedAgent,
                    agent: Some(agent.clone()),
                    suggestion: format!(
                        "Agent {agent} is underutilized. Review expertise domains."
                    ),
                });
            }
        }

        if patterns.low_confidence_tasks as f64 > patterns.total_tasks as f64 * GAP_SHARE {
            recommendations.push(Recommendation {
                kind: RecommendationKind::CapabilityGap,
                agent: None,
                suggestion:
                    "High number of low-confidence routings suggests missing agent specializations"
                        .to_owned(),
            });
        }

        recommendations
    }
}

/// Suggests a new agent for a task the registry cannot cover.
///
/// Two well-known gaps map to fully specified agents; anything else gets
/// a generic `{domain}Specialist` suggestion scoped to whatever was
/// inferred.
fn analyze_capability_gap(metadata: &TaskMetadata) -> GapAnalysis {
    let domain = metadata.domain.as_deref();
    let capability = metadata.capability.as_deref();

    if domain == Some("eventTypes") && capability == Some("layout-parsing") {
        return GapAnalysis {
            suggested_agent: "LayoutParser".to_owned(),
            domains: vec!["eventTypes".to_owned(), "layout".to_owned()],
            capabilities: vec![
                "layout-parsing".to_owned(),
                "component-positioning".to_owned(),
                "grid-validation".to_owned(),
            ],
            reasoning: "Current agents lack specialized layout parsing capabilities".to_owned(),
        };
    }

    if domain == Some("eventTypes") && capability == Some("query-parsing") {
        return GapAnalysis {
            suggested_agent: "QueryParser".to_owned(),
            domains: vec!["eventTypes".to_owned(), "query".to_owned()],
            capabilities: vec![
                "query-parsing".to_owned(),
                "sql-analysis".to_owned(),
                "data-flow".to_owned(),
            ],
            reasoning: "Current agents lack specialized query parsing capabilities".to_owned(),
        };
    }

    let domain_label = domain.unwrap_or("general");
    GapAnalysis {
        suggested_agent: format!("{domain_label}Specialist"),
        domains: domain.map(ToOwned::to_owned).into_iter().collect(),
        capabilities: capability.map(ToOwned::to_owned).into_iter().collect(),
        reasoning: format!(
            "Gap identified in {domain_label} domain for {} capability",
            capability.unwrap_or("unknown")
        ),
    }
}
