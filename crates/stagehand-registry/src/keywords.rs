//! Keyword tables as explicit, ordered configuration data.
//!
//! Tie-breaking between tags with equal match counts resolves by entry
//! order, so these tables are ordered vectors rather than maps. Tests can
//! substitute fixture tables through the builder and router seams.

/// Ordered mapping from a tag to the keywords that trigger it.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `(tag, keywords)` entry, preserving order.
    #[must_use]
    pub fn with_entry(mut self, tag: &str, keywords: &[&str]) -> Self {
        self.entries.push((
            tag.to_owned(),
            keywords.iter().map(|keyword| (*keyword).to_owned()).collect(),
        ));
        self
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every tag with at least one keyword appearing in the text.
    ///
    /// Set semantics: multiple tags can match simultaneously. Used for
    /// registry-side inference where an agent may cover several domains.
    #[must_use]
    pub fn matching_tags(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.entries
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// The single tag with the strictly highest keyword match count.
    ///
    /// Ties keep the earlier table entry; a zero count yields `None`. Used
    /// for task-side inference where one best tag is wanted.
    #[must_use]
    pub fn best_match(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        let mut best: Option<&str> = None;
        let mut max_matches = 0;

        for (tag, keywords) in &self.entries {
            let matches = keywords
                .iter()
                .filter(|keyword| lowered.contains(keyword.as_str()))
                .count();
            if matches > max_matches {
                max_matches = matches;
                best = Some(tag);
            }
        }

        best.map(ToOwned::to_owned)
    }

    /// Domain inference table for agent document bodies.
    #[must_use]
    pub fn registry_domains() -> Self {
        Self::new()
            .with_entry("eventTypes", &["eventtypes", "event types", "workflow"])
            .with_entry("react", &["react", "component", "jsx", "ui"])
            .with_entry("sql", &["sql", "schema", "database"])
            .with_entry("workflows", &["workflow", "trigger", "integration"])
            .with_entry("ui", &["layout", "design", "accessibility"])
            .with_entry("codeAnalysis", &["dead code", "dependencies", "analysis"])
            .with_entry("infrastructure", &["infrastructure", "routing", "app startup"])
            .with_entry("routing", &["routing", "routes", "navigation"])
    }

    /// Capability inference table for agent document bodies.
    #[must_use]
    pub fn registry_capabilities() -> Self {
        Self::new()
            .with_entry("structure-validation", &["imports", "dependencies", "structure"])
            .with_entry("routing-configuration", &["routing", "routes", "navigation"])
            .with_entry(
                "component-analysis",
                &["components", "lazy loading", "error boundaries"],
            )
            .with_entry("environment-validation", &["environment", "variables", "config"])
            .with_entry("pattern-analysis", &["conventions", "patterns", "best practices"])
            .with_entry("imports-and-dependencies", &["imports", "dependencies", "modules"])
            .with_entry("app-startup", &["app entry point", "startup", "providers"])
            .with_entry("error-boundaries", &["error boundaries", "fallbacks"])
            .with_entry("infrastructure-analysis", &["infrastructure", "foundational"])
    }

    /// Domain inference table for free-text task descriptions.
    ///
    /// Deliberately distinct from [`Self::registry_domains`]: task text uses
    /// a wider vocabulary than agent documents.
    #[must_use]
    pub fn task_domains() -> Self {
        Self::new()
            .with_entry(
                "eventTypes",
                &["eventtypes", "event types", "component analysis", "workflow orchestration"],
            )
            .with_entry("react", &["react", "component", "jsx", "ui", "frontend"])
            .with_entry("workflows", &["workflow", "trigger", "integration", "process"])
            .with_entry("sql", &["sql", "schema", "database", "table"])
            .with_entry("ui", &["layout", "design", "accessibility", "ux"])
            .with_entry("codeAnalysis", &["dead code", "dependencies", "cleanup", "refactor"])
            .with_entry(
                "infrastructure",
                &[
                    "infrastructure",
                    "app startup",
                    "routing",
                    "configuration",
                    "app structure",
                    "wf-plan-management",
                    "wf-client",
                    "wf-server",
                ],
            )
            .with_entry("routing", &["routing", "routes", "navigation", "router"])
    }

    /// Capability inference table for free-text task descriptions.
    #[must_use]
    pub fn task_capabilities() -> Self {
        Self::new()
            .with_entry("structure-validation", &["validation", "structure", "validate"])
            .with_entry("pattern-analysis", &["analysis", "pattern", "analyze"])
            .with_entry(
                "performance-optimization",
                &["performance", "optimization", "optimize"],
            )
            .with_entry("workflow-validation", &["workflow", "trigger", "flow"])
            .with_entry("dependency-analysis", &["dependency", "import", "relationship"])
    }
}

/// Domain-specific expertise bonus: applied when both keywords appear in
/// an agent document body.
#[derive(Debug, Clone)]
pub struct ExpertiseRule {
    /// Domain the bonus applies to.
    pub domain: String,
    /// First required keyword.
    pub first: String,
    /// Second required keyword.
    pub second: String,
    /// Score bonus when both keywords are present.
    pub bonus: u8,
}

impl ExpertiseRule {
    /// Creates one rule.
    #[must_use]
    pub fn new(domain: &str, first: &str, second: &str, bonus: u8) -> Self {
        Self {
            domain: domain.to_owned(),
            first: first.to_owned(),
            second: second.to_owned(),
            bonus,
        }
    }

    /// Default per-domain bonus rules.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("react", "component", "patterns", 15),
            Self::new("eventTypes", "validation", "workflow", 20),
            Self::new("sql", "schema", "validation", 15),
            Self::new("infrastructure", "routing", "configuration", 15),
            Self::new("routing", "routes", "navigation", 15),
        ]
    }

    /// Returns true if both required keywords appear in the (lowercased)
    /// body text.
    #[must_use]
    pub fn applies_to(&self, body: &str) -> bool {
        body.contains(self.first.as_str()) && body.contains(self.second.as_str())
    }
}
