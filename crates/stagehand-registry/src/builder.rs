use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use stagehand_core::{
    AgentDescriptor, Availability, ContextLimits, DEFAULT_MODEL, Error, Registry, Result,
};
use tracing::warn;

use crate::frontmatter;
use crate::keywords::{ExpertiseRule, KeywordTable};

/// Default limits used when a declared `contextLimits` field fails to parse.
const DECLARED_LIMIT_DEFAULTS: ContextLimits = ContextLimits {
    optimal: 6000,
    maximum: 12000,
};

/// Base expertise score for every inferred or declared domain.
const EXPERTISE_BASE: u8 = 60;
/// Expertise scores are clamped to this ceiling.
const EXPERTISE_CAP: u8 = 95;

/// Body-text depth bonuses: any listed keyword grants the bonus once.
const DEPTH_BONUSES: [(&[&str], u8); 3] = [
    (&["detailed", "comprehensive"], 20),
    (&["best practices", "standards"], 15),
    (&["structured analysis", "systematic"], 10),
];

/// Source of fresh registries for the router.
///
/// Every call produces an independent registry; implementations must not
/// mutate shared state, so concurrent callers are always safe.
pub trait RegistrySource {
    /// Builds a fresh registry.
    fn build(&self) -> Registry;
}

/// Builds an in-memory registry from a directory of agent description
/// documents.
///
/// A missing directory yields an empty registry, and a single malformed
/// document never aborts the whole build: failures are logged and the
/// remaining documents still load.
pub struct RegistryBuilder {
    agents_dir: PathBuf,
    domains: KeywordTable,
    capabilities: KeywordTable,
    expertise_rules: Vec<ExpertiseRule>,
    default_model: String,
}

impl RegistryBuilder {
    /// Creates a builder for the given agents directory with the default
    /// keyword tables.
    #[must_use]
    pub fn new<T: Into<PathBuf>>(agents_dir: T) -> Self {
        Self {
            agents_dir: agents_dir.into(),
            domains: KeywordTable::registry_domains(),
            capabilities: KeywordTable::registry_capabilities(),
            expertise_rules: ExpertiseRule::defaults(),
            default_model: DEFAULT_MODEL.to_owned(),
        }
    }

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

    /// Substitutes the expertise bonus rules.
    #[must_use]
    pub fn with_expertise_rules(mut self, rules: Vec<ExpertiseRule>) -> Self {
        self.expertise_rules = rules;
        self
    }

    /// Sets the model assigned to agents that do not declare one.
    #[must_use]
    pub fn with_default_model<T: Into<String>>(mut self, model: T) -> Self {
        self.default_model = model.into();
        self
    }

    /// Builds a fresh registry from the agents directory.
    ///
    /// Documents are visited in sorted filename order so registry
    /// iteration order (and therefore tie-breaking) is reproducible.
    #[must_use]
    pub fn build(&self) -> Registry {
        let mut registry = Registry::new();

        let entries = match fs::read_dir(&self.agents_dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    "Agents directory not found: {}: {error}",
                    self.agents_dir.display()
                );
                return registry;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        for path in paths {
            match self.extract_descriptor(&path) {
                Ok(descriptor) => registry.push(descriptor),
                Err(error) => {
                    warn!("Skipping agent document {}: {error}", path.display());
                }
            }
        }

        registry
    }

    /// Extracts one agent descriptor from a document.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or declares no `name`
    /// field; callers skip the document and continue.
    fn extract_descriptor(&self, path: &Path) -> Result<AgentDescriptor> {
        let content = fs::read_to_string(path)?;
        let doc = frontmatter::parse(&content);

        if doc.field("name").is_none() {
            return Err(Error::AgentDoc(format!(
                "missing name in frontmatter: {}",
                path.display()
            )));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::AgentDoc(format!("unusable filename: {}", path.display())))?;

        let body = doc.body.to_lowercase();
        let domains = self.extract_domains(&doc, &body);
        let capabilities = self.extract_capabilities(&doc, &body);
        let context_limits = self.extract_context_limits(&doc, &name);
        let expertise = self.calculate_expertise(&domains, &body);

        let mut descriptor = AgentDescriptor::new(name)
            .with_domains(domains)
            .with_capabilities(capabilities)
            .with_context_limits(context_limits)
            .with_availability(Availability::from_field(
                doc.field("availability").unwrap_or("active"),
            ));
        descriptor.expertise = expertise;
        descriptor.model = doc
            .field("model")
            .map_or_else(|| self.default_model.clone(), ToOwned::to_owned);
        if let Some(description) = doc.field("description") {
            descriptor.description = description.to_owned();
        }
        if let Some(color) = doc.field("color") {
            descriptor.color = color.to_owned();
        }

        Ok(descriptor)
    }

    /// Declared `domains` field wins; otherwise any domain whose keywords
    /// appear in the body is included (a set, not a single best match).
    fn extract_domains(&self, doc: &frontmatter::Document, body: &str) -> Vec<String> {
        if let Some(declared) = doc.field("domains") {
            return split_list(declared);
        }
        self.domains.matching_tags(body)
    }

    /// Symmetric to domain extraction with the capability table.
    fn extract_capabilities(&self, doc: &frontmatter::Document, body: &str) -> Vec<String> {
        if let Some(declared) = doc.field("capabilities") {
            return split_list(declared);
        }
        self.capabilities.matching_tags(body)
    }

    /// Declared `contextLimits` as `"optimal,maximum"` with per-field
    /// default fallback; otherwise inferred from body length.
    fn extract_context_limits(&self, doc: &frontmatter::Document, name: &str) -> ContextLimits {
        if let Some(declared) = doc.field("contextLimits") {
            let mut parts = declared.split(',');
            let optimal = parts
                .next()
                .and_then(|field| field.trim().parse().ok())
                .unwrap_or(DECLARED_LIMIT_DEFAULTS.optimal);
            let maximum = parts
                .next()
                .and_then(|field| field.trim().parse().ok())
                .unwrap_or(DECLARED_LIMIT_DEFAULTS.maximum);

            if optimal > maximum {
                warn!("Agent {name}: contextLimits optimal {optimal} > maximum {maximum}, swapping");
                return ContextLimits {
                    optimal: maximum,
                    maximum: optimal,
                };
            }
            return ContextLimits { optimal, maximum };
        }

        let length = doc.body.len();
        if length > 3000 {
            ContextLimits {
                optimal: 8000,
                maximum: 16000,
            }
        } else if length > 1500 {
            ContextLimits {
                optimal: 6000,
                maximum: 12000,
            }
        } else {
            ContextLimits {
                optimal: 4000,
                maximum: 8000,
            }
        }
    }

    /// Scores each domain from the body: base 60, depth bonuses, plus any
    /// domain-specific rule bonus, clamped to 95.
    fn calculate_expertise(&self, domains: &[String], body: &str) -> BTreeMap<String, u8> {
        let mut expertise = BTreeMap::new();

        for domain in domains {
            let mut score = u16::from(EXPERTISE_BASE);

            for (keywords, bonus) in DEPTH_BONUSES {
                if keywords.iter().any(|keyword| body.contains(keyword)) {
                    score += u16::from(bonus);
                }
            }

            for rule in &self.expertise_rules {
                if rule.domain == *domain && rule.applies_to(body) {
                    score += u16::from(rule.bonus);
                }
            }

            let clamped = score.min(u16::from(EXPERTISE_CAP)) as u8;
            expertise.insert(domain.clone(), clamped);
        }

        expertise
    }
}

impl RegistrySource for RegistryBuilder {
    fn build(&self) -> Registry {
        Self::build(self)
    }
}

/// Registry source backed by a fixed registry; cloned out on every build.
///
/// Primarily a test double for exercising the router without touching the
/// filesystem.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    registry: Registry,
}

impl StaticRegistry {
    /// Wraps an already-built registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl RegistrySource for StaticRegistry {
    fn build(&self) -> Registry {
        self.registry.clone()
    }
}

/// Splits a declared comma-separated field into trimmed tags.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}
