use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model identifier assigned to agents that do not declare one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Whether an agent is currently available for routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Agent can be selected by the router.
    #[default]
    Active,
    /// Agent is registered but should not be selected.
    Inactive,
}

impl Availability {
    /// Parses a frontmatter field value.
    ///
    /// Anything other than the literal `active` counts as inactive, so an
    /// unrecognized value never scores availability points.
    #[must_use]
    pub fn from_field(value: &str) -> Self {
        if value == "active" {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Returns true if the agent can be selected.
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Token-budget guidance for invoking an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimits {
    /// Preferred context size in tokens.
    pub optimal: usize,
    /// Hard ceiling in tokens; requests above this are trimmed.
    pub maximum: usize,
}

impl Default for ContextLimits {
    /// Router-side fallback limits, used when an agent descriptor had to be
    /// synthesized (e.g. the generalist fallback is missing from the
    /// registry).
    fn default() -> Self {
        Self {
            optimal: 5000,
            maximum: 10000,
        }
    }
}

/// Capability metadata for one agent, built fresh on every registry build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique agent name, derived from the source document filename.
    pub name: String,
    /// Domain tags the agent is considered expert in.
    pub domains: Vec<String>,
    /// Capability tags the agent can perform.
    pub capabilities: Vec<String>,
    /// Per-domain expertise scores in `0..=95`; keys are a subset of
    /// `domains`.
    pub expertise: BTreeMap<String, u8>,
    /// Token-budget guidance for this agent.
    pub context_limits: ContextLimits,
    /// Identifier of the underlying model backend.
    pub model: String,
    /// Whether the agent is available for routing.
    pub availability: Availability,
    /// Presentation-only description.
    pub description: String,
    /// Presentation-only color tag.
    pub color: String,
}

impl AgentDescriptor {
    /// Creates a descriptor with default metadata for the given name.
    #[must_use]
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
            capabilities: Vec::new(),
            expertise: BTreeMap::new(),
            context_limits: ContextLimits::default(),
            model: DEFAULT_MODEL.to_owned(),
            availability: Availability::Active,
            description: "Auto-extracted agent".to_owned(),
            color: "gray".to_owned(),
        }
    }

    /// Sets the domain tags.
    #[must_use]
    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = domains;
        self
    }

    /// Sets the capability tags.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets one expertise score.
    #[must_use]
    pub fn with_expertise<T: Into<String>>(mut self, domain: T, score: u8) -> Self {
        self.expertise.insert(domain.into(), score);
        self
    }

    /// Sets the context limits.
    #[must_use]
    pub fn with_context_limits(mut self, limits: ContextLimits) -> Self {
        self.context_limits = limits;
        self
    }

    /// Sets the availability.
    #[must_use]
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Returns true if the agent declares the given domain.
    #[must_use]
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|tag| tag == domain)
    }

    /// Returns true if the agent declares the given capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|tag| tag == capability)
    }

    /// Expertise score for a domain, or 0 when the domain is unknown.
    #[must_use]
    pub fn expertise_in(&self, domain: &str) -> u8 {
        self.expertise.get(domain).copied().unwrap_or(0)
    }
}

/// Insertion-ordered collection of agent descriptors.
///
/// Iteration order is part of the routing contract: fallback options and
/// tie-breaking both depend on encounter order, so this is a vector with
/// linear name lookup rather than a map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    agents: Vec<AgentDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor, preserving encounter order.
    pub fn push(&mut self, descriptor: AgentDescriptor) {
        self.agents.push(descriptor);
    }

    /// Looks up an agent by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    /// Iterates descriptors in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    /// Number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns true if no agents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents declaring the given domain, in encounter order.
    #[must_use]
    pub fn by_domain(&self, domain: &str) -> Vec<&AgentDescriptor> {
        self.agents
            .iter()
            .filter(|agent| agent.has_domain(domain))
            .collect()
    }

    /// Agents declaring the given capability, in encounter order.
    #[must_use]
    pub fn by_capability(&self, capability: &str) -> Vec<&AgentDescriptor> {
        self.agents
            .iter()
            .filter(|agent| agent.has_capability(capability))
            .collect()
    }
}

/// Ephemeral per-task metadata fed into the router.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// Caller-supplied task identifier, used only for history bookkeeping.
    pub task_id: String,
    /// Best-matching domain tag, if any keyword scored.
    pub domain: Option<String>,
    /// Best-matching capability tag, if any keyword scored.
    pub capability: Option<String>,
    /// Estimated token budget for the task.
    pub context_size: Option<usize>,
    /// Inference confidence (0.7 when both tags were inferred, else 0.4).
    /// Informational only; routing does not consume it.
    pub confidence: f64,
}

impl TaskMetadata {
    /// Creates empty metadata for the given task id.
    #[must_use]
    pub fn new<T: Into<String>>(task_id: T) -> Self {
        Self {
            task_id: task_id.into(),
            ..Self::default()
        }
    }

    /// Sets the domain tag.
    #[must_use]
    pub fn with_domain<T: Into<String>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the capability tag.
    #[must_use]
    pub fn with_capability<T: Into<String>>(mut self, capability: T) -> Self {
        self.capability = Some(capability.into());
        self
    }

    /// Sets the estimated context size.
    #[must_use]
    pub fn with_context_size(mut self, context_size: usize) -> Self {
        self.context_size = Some(context_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_from_field() {
        assert_eq!(Availability::from_field("active"), Availability::Active);
        assert_eq!(Availability::from_field("inactive"), Availability::Inactive);
        // Unknown values never score availability points.
        assert_eq!(Availability::from_field("Active"), Availability::Inactive);
        assert_eq!(Availability::from_field("busy"), Availability::Inactive);
    }

    #[test]
    fn test_descriptor_defaults() {
        let agent = AgentDescriptor::new("EventParser");
        assert_eq!(agent.model, DEFAULT_MODEL);
        assert!(agent.availability.is_active());
        assert_eq!(agent.context_limits.optimal, 5000);
        assert_eq!(agent.context_limits.maximum, 10000);
        assert_eq!(agent.expertise_in("eventTypes"), 0);
    }

    #[test]
    fn test_descriptor_membership() {
        let agent = AgentDescriptor::new("SchemaParser")
            .with_domains(vec!["sql".to_owned()])
            .with_capabilities(vec!["structure-validation".to_owned()])
            .with_expertise("sql", 85);

        assert!(agent.has_domain("sql"));
        assert!(!agent.has_domain("react"));
        assert!(agent.has_capability("structure-validation"));
        assert_eq!(agent.expertise_in("sql"), 85);
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = Registry::new();
        registry.push(AgentDescriptor::new("First").with_domains(vec!["react".to_owned()]));
        registry.push(AgentDescriptor::new("Second").with_domains(vec!["react".to_owned()]));
        registry.push(AgentDescriptor::new("Third").with_domains(vec!["sql".to_owned()]));

        let names: Vec<_> = registry.iter().map(|agent| agent.name.clone()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);

        let react_agents = registry.by_domain("react");
        assert_eq!(react_agents.len(), 2);
        assert_eq!(react_agents[0].name, "First");
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.push(AgentDescriptor::new("UXAnalyzer"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("UXAnalyzer").is_some());
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn test_task_metadata_builders() {
        let metadata = TaskMetadata::new("2.1")
            .with_domain("eventTypes")
            .with_capability("structure-validation")
            .with_context_size(8000);

        assert_eq!(metadata.task_id, "2.1");
        assert_eq!(metadata.domain.as_deref(), Some("eventTypes"));
        assert_eq!(metadata.capability.as_deref(), Some("structure-validation"));
        assert_eq!(metadata.context_size, Some(8000));
    }
}
