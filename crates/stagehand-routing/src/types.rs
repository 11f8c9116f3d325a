use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why the router selected an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reasoning {
    /// Agent matched both the task domain and capability.
    DomainCapabilityMatch,
    /// Agent matched the task domain only.
    DomainMatch,
    /// No usable match; the generalist fallback was selected.
    Fallback,
}

impl Display for Reasoning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::DomainCapabilityMatch => write!(f, "domain-capability-match"),
            Self::DomainMatch => write!(f, "domain-match"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// How the recommended context size was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStrategy {
    /// No size was requested; the agent's optimal size is recommended.
    Default,
    /// The requested size fits within the agent's optimal budget.
    AsRequested,
    /// The requested size fits between optimal and maximum.
    WithinLimits,
    /// The request exceeded the maximum and was trimmed down to it.
    TrimToMaximum,
}

impl Display for ContextStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Default => write!(f, "default"),
            Self::AsRequested => write!(f, "as-requested"),
            Self::WithinLimits => write!(f, "within-limits"),
            Self::TrimToMaximum => write!(f, "trim-to-maximum"),
        }
    }
}

/// Context-size recommendation for the selected agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextOptimization {
    /// Recommended context size in tokens.
    pub recommended: usize,
    /// Strategy used to arrive at the recommendation.
    pub strategy: ContextStrategy,
    /// Tokens trimmed off the request, present only for
    /// [`ContextStrategy::TrimToMaximum`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_amount: Option<usize>,
}

/// Why an agent appears in the fallback list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    /// Agent shares the task's domain.
    DomainFallback,
    /// The configured generalist agent, always appended.
    GeneralFallback,
}

/// One ranked fallback option attached to a routing decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackOption {
    /// Agent name.
    pub agent: String,
    /// Why this agent is offered.
    pub reason: FallbackReason,
    /// Confidence attached to the option.
    pub confidence: f64,
}

/// Output of one routing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Selected agent name.
    pub agent: String,
    /// Model backend of the selected agent.
    pub model: String,
    /// Why the agent was selected.
    pub reasoning: Reasoning,
    /// Routing confidence in `[0, 1]`.
    pub confidence: f64,
    /// Context-size recommendation.
    pub context_optimization: ContextOptimization,
    /// Ranked fallback options, at most three.
    pub fallback_options: Vec<FallbackOption>,
}

/// Actionable decision derived from routing confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Confidence is high enough to invoke the agent directly.
    Execute,
    /// Confidence is marginal; invoke the agent but monitor closely.
    ExecuteWithCaution,
    /// Confidence is too low; suggest creating a new specialized agent.
    SuggestNewAgent,
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Execute => write!(f, "EXECUTE"),
            Self::ExecuteWithCaution => write!(f, "EXECUTE_WITH_CAUTION"),
            Self::SuggestNewAgent => write!(f, "SUGGEST_NEW_AGENT"),
        }
    }
}

/// Suggestion for a new agent covering an identified capability gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Proposed agent name.
    pub suggested_agent: String,
    /// Domains the proposed agent should cover.
    pub domains: Vec<String>,
    /// Capabilities the proposed agent should have.
    pub capabilities: Vec<String>,
    /// Why the gap exists.
    pub reasoning: String,
}

/// Final directive produced by the director for one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Direction {
    /// The actionable decision.
    pub decision: Decision,
    /// Selected agent, absent for [`Decision::SuggestNewAgent`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Model of the selected agent, absent for
    /// [`Decision::SuggestNewAgent`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Routing confidence in `[0, 1]`.
    pub confidence: f64,
    /// Routing reasoning, when an agent was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    /// Context recommendation, when an agent was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_optimization: Option<ContextOptimization>,
    /// Fallback options, populated for
    /// [`Decision::ExecuteWithCaution`].
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fallback_options: Vec<FallbackOption>,
    /// Gap analysis, populated for [`Decision::SuggestNewAgent`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_analysis: Option<GapAnalysis>,
    /// Human-readable instructions for acting on the decision.
    pub instructions: String,
}

/// How a task entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Ad-hoc request with a synthesized `adhoc-` id.
    Adhoc,
    /// Task referenced from a plan document.
    Planned,
}

/// One append-only history record per directed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    /// Caller-supplied task identifier.
    pub task_id: String,
    /// When the direction was produced.
    pub timestamp: DateTime<Utc>,
    /// Inferred task domain, if any.
    pub domain: Option<String>,
    /// Inferred task capability, if any.
    pub capability: Option<String>,
    /// Agent the router selected.
    pub selected_agent: String,
    /// Routing confidence.
    pub confidence: f64,
    /// Decision the director produced.
    pub decision: Decision,
    /// Routing reasoning.
    pub reasoning: Reasoning,
    /// Whether the task was ad-hoc or planned.
    pub kind: TaskKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn test_reasoning_wire_names() {
        assert_eq!(
            to_value(Reasoning::DomainCapabilityMatch).expect("serialize"),
            json!("domain-capability-match")
        );
        assert_eq!(
            to_value(Reasoning::Fallback).expect("serialize"),
            json!("fallback")
        );
        assert_eq!(Reasoning::DomainMatch.to_string(), "domain-match");
    }

    #[test]
    fn test_context_strategy_wire_names() {
        assert_eq!(
            to_value(ContextStrategy::TrimToMaximum).expect("serialize"),
            json!("trim-to-maximum")
        );
        assert_eq!(ContextStrategy::AsRequested.to_string(), "as-requested");
    }

    #[test]
    fn test_decision_wire_names() {
        assert_eq!(
            to_value(Decision::ExecuteWithCaution).expect("serialize"),
            json!("EXECUTE_WITH_CAUTION")
        );
        assert_eq!(Decision::SuggestNewAgent.to_string(), "SUGGEST_NEW_AGENT");
    }

    #[test]
    fn test_trim_amount_omitted_when_absent() {
        let optimization = ContextOptimization {
            recommended: 6000,
            strategy: ContextStrategy::Default,
            trim_amount: None,
        };
        let value = to_value(optimization).expect("serialize");
        assert!(value.get("trim_amount").is_none());
    }
}
