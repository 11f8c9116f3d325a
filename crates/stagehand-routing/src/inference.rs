use stagehand_core::TaskMetadata;
use stagehand_registry::KeywordTable;

/// Inference confidence when both domain and capability were found.
const BOTH_INFERRED: f64 = 0.7;
/// Inference confidence when at most one tag was found.
const PARTIAL_INFERRED: f64 = 0.4;

/// Infers task metadata from free-text task descriptions.
///
/// Domain and capability are inferred independently against two ordered
/// keyword tables; the context-size estimate uses a fixed cascade of
/// complexity indicators.
pub struct TaskInference {
    domains: KeywordTable,
    capabilities: KeywordTable,
}

impl Default for TaskInference {
    fn default() -> Self {
        Self {
            domains: KeywordTable::task_domains(),
            capabilities: KeywordTable::task_capabilities(),
        }
    }
}

impl TaskInference {
    /// Substitutes the domain inference table.
    #[must_use]
    pub fn with_domain_table(mut self, domains: KeywordTable) -> Self {
        self.domains = domains;
        self
    }

    /// Substitutes the capability inference table.
    #[must_use]
    pub fn with_capability_table(mut self, capabilities: KeywordTable) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Infers domain, capability, and context size from task text.
    ///
    /// For each table the tag with the strictly highest keyword match count
    /// wins; ties keep the earlier table entry and a zero count leaves the
    /// tag absent. The returned confidence is informational only; routing
    /// does not consume it. The task id is left empty for the caller to
    /// fill in.
    #[must_use]
    pub fn infer(&self, text: &str) -> TaskMetadata {
        let domain = self.domains.best_match(text);
        let capability = self.capabilities.best_match(text);
        let confidence = if domain.is_some() && capability.is_some() {
            BOTH_INFERRED
        } else {
            PARTIAL_INFERRED
        };

        TaskMetadata {
            task_id: String::new(),
            domain,
            capability,
            context_size: Some(estimate_context_size(text)),
            confidence,
        }
    }
}

/// Estimates the token budget a task needs from complexity indicators.
fn estimate_context_size(text: &str) -> usize {
    let lowered = text.to_lowercase();
    if lowered.contains("architecture") || lowered.contains("cross-app") {
        12000
    } else if lowered.contains("analysis") || lowered.contains("workflow") {
        8000
    } else if lowered.contains("validation") || lowered.contains("pattern") {
        6000
    } else {
        4000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_domain_and_capability() {
        let inference = TaskInference::default();
        let metadata = inference.infer("Analyze eventTypes structure for validation errors");

        assert_eq!(metadata.domain.as_deref(), Some("eventTypes"));
        assert_eq!(metadata.capability.as_deref(), Some("structure-validation"));
        assert!((metadata.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_infer_nothing_from_unrelated_text() {
        let inference = TaskInference::default();
        let metadata = inference.infer("bake a loaf of sourdough bread");

        assert!(metadata.domain.is_none());
        assert!(metadata.capability.is_none());
        assert!((metadata.confidence - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_inference_lowers_confidence() {
        let inference = TaskInference::default();
        // "react" matches a domain but nothing matches a capability.
        let metadata = inference.infer("react work");

        assert_eq!(metadata.domain.as_deref(), Some("react"));
        assert!(metadata.capability.is_none());
        assert!((metadata.confidence - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_context_size_cascade() {
        let inference = TaskInference::default();

        let architecture = inference.infer("review the architecture of the system");
        assert_eq!(architecture.context_size, Some(12000));

        let analysis = inference.infer("run an analysis of imports");
        assert_eq!(analysis.context_size, Some(8000));

        let validation = inference.infer("validation of config values");
        assert_eq!(validation.context_size, Some(6000));

        let plain = inference.infer("rename a file");
        assert_eq!(plain.context_size, Some(4000));
    }

    #[test]
    fn test_cascade_prefers_earlier_indicator() {
        let inference = TaskInference::default();
        // Both "architecture" and "validation" appear; the first cascade
        // stage wins.
        let metadata = inference.infer("architecture validation review");
        assert_eq!(metadata.context_size, Some(12000));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let inference = TaskInference::default();
        let first = inference.infer("workflow trigger integration check");
        let second = inference.infer("workflow trigger integration check");
        assert_eq!(first.domain, second.domain);
        assert_eq!(first.capability, second.capability);
        assert_eq!(first.context_size, second.context_size);
    }
}
