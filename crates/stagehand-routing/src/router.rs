use stagehand_core::{AgentDescriptor, DirectorConfig, Registry, TaskMetadata};
use stagehand_registry::{RegistryBuilder, RegistrySource};
use tracing::info;

use crate::inference::TaskInference;
use crate::types::{
    ContextOptimization, ContextStrategy, FallbackOption, FallbackReason, Reasoning,
    RoutingDecision,
};

/// Confidence attached to fallback routing and to the generalist fallback
/// option.
const FALLBACK_CONFIDENCE: f64 = 0.3;
/// Context size assumed for scoring when the task did not request one.
const SCORING_DEFAULT_CONTEXT: usize = 5000;
/// Factor applied to domain-fallback option confidence.
const DOMAIN_FALLBACK_FACTOR: f64 = 0.8;
/// Maximum number of fallback options attached to a decision.
const MAX_FALLBACK_OPTIONS: usize = 3;

/// Routes tasks to the best agent based on domain expertise.
///
/// Consults its registry source for a fresh agent set on every routing
/// call; routing itself is a pure function of the registry and the task
/// metadata.
pub struct AgentRouter {
    source: Box<dyn RegistrySource>,
    fallback_agent: String,
    default_model: String,
    inference: TaskInference,
}

impl AgentRouter {
    /// Creates a router over the given registry source with default
    /// fallback settings.
    #[must_use]
    pub fn new(source: Box<dyn RegistrySource>) -> Self {
        let defaults = DirectorConfig::default();
        Self {
            source,
            fallback_agent: defaults.routing.fallback_agent,
            default_model: defaults.routing.default_model,
            inference: TaskInference::default(),
        }
    }

    /// Creates a router that builds registries from the configured agents
    /// directory.
    #[must_use]
    pub fn from_config(config: &DirectorConfig) -> Self {
        let builder = RegistryBuilder::new(config.registry.agents_dir.clone())
            .with_default_model(config.routing.default_model.clone());
        Self {
            source: Box::new(builder),
            fallback_agent: config.routing.fallback_agent.clone(),
            default_model: config.routing.default_model.clone(),
            inference: TaskInference::default(),
        }
    }

    /// Sets the generalist fallback agent name.
    #[must_use]
    pub fn with_fallback_agent<T: Into<String>>(mut self, name: T) -> Self {
        self.fallback_agent = name.into();
        self
    }

    /// Substitutes the task inference tables.
    #[must_use]
    pub fn with_inference(mut self, inference: TaskInference) -> Self {
        self.inference = inference;
        self
    }

    /// Builds and returns the current registry.
    #[must_use]
    pub fn registry(&self) -> Registry {
        self.source.build()
    }

    /// Infers task metadata from a free-text description.
    #[must_use]
    pub fn infer_task_metadata(&self, text: &str) -> TaskMetadata {
        self.inference.infer(text)
    }

    /// Routes a task to the best agent.
    ///
    /// Three branches in order: domain + capability intersection ranked by
    /// the weighted suitability score; domain-only ranked by raw expertise;
    /// otherwise the configured generalist at fixed confidence 0.3. For a
    /// fixed registry and metadata the result is fully deterministic.
    #[must_use]
    pub fn route_task(&self, metadata: &TaskMetadata) -> RoutingDecision {
        let registry = self.source.build();

        let mut reasoning = Reasoning::Fallback;
        let mut confidence = FALLBACK_CONFIDENCE;
        let mut selected: Option<AgentDescriptor> = None;

        if let (Some(domain), Some(capability)) = (&metadata.domain, &metadata.capability) {
            let candidates = find_candidates(&registry, domain, capability);
            if let Some(best) = select_best(&candidates, metadata) {
                reasoning = Reasoning::DomainCapabilityMatch;
                confidence = calculate_confidence(best, metadata);
                selected = Some(best.clone());
            }
        } else if let Some(domain) = &metadata.domain {
            if let Some(best) = best_for_domain(&registry, domain) {
                reasoning = Reasoning::DomainMatch;
                confidence = calculate_confidence(best, metadata);
                selected = Some(best.clone());
            }
        }

        let selected = selected.unwrap_or_else(|| self.fallback_descriptor(&registry));

        let decision = RoutingDecision {
            agent: selected.name.clone(),
            model: selected.model.clone(),
            reasoning,
            confidence,
            context_optimization: optimize_context(&selected, metadata.context_size),
            fallback_options: self.fallback_options(
                &registry,
                metadata.domain.as_deref(),
                metadata.capability.as_deref(),
            ),
        };

        info!(
            "🎯 Routing decision: {} | Reasoning: {} | Confidence: {:.2}",
            decision.agent, decision.reasoning, decision.confidence
        );

        decision
    }

    /// Descriptor for the generalist fallback agent.
    ///
    /// When the generalist is missing from the registry (including the
    /// empty-registry case) a synthetic descriptor with the default model
    /// and default limits stands in, so routing still degrades gracefully.
    fn fallback_descriptor(&self, registry: &Registry) -> AgentDescriptor {
        registry.get(&self.fallback_agent).cloned().unwrap_or_else(|| {
            let mut descriptor = AgentDescriptor::new(self.fallback_agent.clone());
            descriptor.model = self.default_model.clone();
            descriptor
        })
    }

    /// Ranked fallback options: up to two registry-order domain matches at
    /// 0.8x confidence, always terminated by the generalist at 0.3, never
    /// more than three entries.
    fn fallback_options(
        &self,
        registry: &Registry,
        domain: Option<&str>,
        capability: Option<&str>,
    ) -> Vec<FallbackOption> {
        let mut options = Vec::new();

        if let Some(domain) = domain {
            let metadata = TaskMetadata {
                domain: Some(domain.to_owned()),
                capability: capability.map(ToOwned::to_owned),
                ..TaskMetadata::default()
            };
            for agent in registry.by_domain(domain).into_iter().take(2) {
                options.push(FallbackOption {
                    agent: agent.name.clone(),
                    reason: FallbackReason::DomainFallback,
                    confidence: calculate_confidence(agent, &metadata) * DOMAIN_FALLBACK_FACTOR,
                });
            }
        }

        options.push(FallbackOption {
            agent: self.fallback_agent.clone(),
            reason: FallbackReason::GeneralFallback,
            confidence: FALLBACK_CONFIDENCE,
        });

        options.truncate(MAX_FALLBACK_OPTIONS);
        options
    }
}

/// Agents declaring both the domain and the capability, in registry order.
fn find_candidates<'registry>(
    registry: &'registry Registry,
    domain: &str,
    capability: &str,
) -> Vec<&'registry AgentDescriptor> {
    registry
        .by_domain(domain)
        .into_iter()
        .filter(|agent| agent.has_capability(capability))
        .collect()
}

/// Highest-scoring candidate under the weighted suitability score; ties
/// keep the earlier-seen candidate.
fn select_best<'candidates>(
    candidates: &[&'candidates AgentDescriptor],
    metadata: &TaskMetadata,
) -> Option<&'candidates AgentDescriptor> {
    let mut iter = candidates.iter();
    let mut best = *iter.next()?;
    let mut best_score = score_agent(best, metadata);

    for agent in iter {
        let score = score_agent(agent, metadata);
        if score > best_score {
            best_score = score;
            best = agent;
        }
    }

    Some(best)
}

/// Agent with the highest expertise in the domain; ties keep the
/// earlier-seen agent.
fn best_for_domain<'registry>(
    registry: &'registry Registry,
    domain: &str,
) -> Option<&'registry AgentDescriptor> {
    let candidates = registry.by_domain(domain);
    let mut iter = candidates.into_iter();
    let mut best = iter.next()?;

    for agent in iter {
        if agent.expertise_in(domain) > best.expertise_in(domain) {
            best = agent;
        }
    }

    Some(best)
}

/// Weighted suitability score used to rank multiple domain+capability
/// candidates.
///
/// `0.4 * expertise + 0.3 * capability(50) + 0.2 * contextEfficiency +
/// 0.1 * availability(10)`. This ranking formula is independent of
/// [`calculate_confidence`] and the two can disagree; that divergence is
/// intentional and kept from the original design.
fn score_agent(agent: &AgentDescriptor, metadata: &TaskMetadata) -> f64 {
    let context_size = metadata.context_size.unwrap_or(SCORING_DEFAULT_CONTEXT);

    let domain_score = metadata
        .domain
        .as_deref()
        .map_or(0.0, |domain| f64::from(agent.expertise_in(domain)));

    let capability_score = metadata
        .capability
        .as_deref()
        .is_some_and(|capability| agent.has_capability(capability));
    let capability_score = if capability_score { 50.0 } else { 0.0 };

    let availability_score = if agent.availability.is_active() {
        10.0
    } else {
        0.0
    };

    domain_score * 0.4
        + capability_score * 0.3
        + context_efficiency(agent, context_size) * 0.2
        + availability_score * 0.1
}

/// Context efficiency: 100 within optimal, 70 within maximum, 30 beyond
/// (might still work with trimming).
fn context_efficiency(agent: &AgentDescriptor, required: usize) -> f64 {
    if required <= agent.context_limits.optimal {
        100.0
    } else if required <= agent.context_limits.maximum {
        70.0
    } else {
        30.0
    }
}

/// Confidence reported for the chosen agent.
///
/// `expertise/100 * 0.6` when the agent covers the task domain, plus `0.4`
/// when it covers the capability, clamped to 1.0. Deliberately not derived
/// from [`score_agent`]: the ranking score and the reported confidence are
/// two independently tunable formulas.
fn calculate_confidence(agent: &AgentDescriptor, metadata: &TaskMetadata) -> f64 {
    let mut confidence = 0.0;

    if let Some(domain) = metadata.domain.as_deref() {
        if agent.has_domain(domain) {
            confidence += f64::from(agent.expertise_in(domain)) / 100.0 * 0.6;
        }
    }

    if let Some(capability) = metadata.capability.as_deref() {
        if agent.has_capability(capability) {
            confidence += 0.4;
        }
    }

    confidence.min(1.0)
}

/// Context-size recommendation for the selected agent.
fn optimize_context(agent: &AgentDescriptor, requested: Option<usize>) -> ContextOptimization {
    let optimal = agent.context_limits.optimal;
    let maximum = agent.context_limits.maximum;

    let Some(requested) = requested else {
        return ContextOptimization {
            recommended: optimal,
            strategy: ContextStrategy::Default,
            trim_amount: None,
        };
    };

    if requested <= optimal {
        ContextOptimization {
            recommended: requested,
            strategy: ContextStrategy::AsRequested,
            trim_amount: None,
        }
    } else if requested <= maximum {
        ContextOptimization {
            recommended: requested.min(maximum),
            strategy: ContextStrategy::WithinLimits,
            trim_amount: None,
        }
    } else {
        ContextOptimization {
            recommended: maximum,
            strategy: ContextStrategy::TrimToMaximum,
            trim_amount: Some(requested - maximum),
        }
    }
}
