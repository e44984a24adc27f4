//! Attribute specs and the roster they form
//!
//! The roster is read from a TOML table keyed by attribute name:
//!
//! ```toml
//! [material_name]
//! system_prompt = "Identify the housing material name ..."
//! model = "accounts/fireworks/models/llama-v3p1-70b-instruct"
//!
//! [sealing_class]
//! system_prompt = "Identify the IP sealing class ..."
//! model = "accounts/fireworks/models/llama-v3p1-70b-instruct"
//! answer_marker = "SEALING CLASS:"
//! ```
//!
//! Each entry is checked on its own. A broken entry stays in the roster as
//! [`RosterEntry::Invalid`] so the rest of the run is unaffected.

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Attribute keys analyzed for connector housing datasheets
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    "material",
    "material_name",
    "pull_seat",
    "working_temp",
    "colour",
    "contact_systems",
    "gender",
    "height",
    "housing_seal",
    "hv_qualified",
    "length",
    "mechanical_coding",
    "cavities",
    "rows",
    "pre_assembled",
    "sealing",
    "sealing_class",
    "tpa",
    "connector_type",
    "width",
    "wire_seal",
    "cpa",
    "colour_coding",
    "set_kit",
    "closed_cavities",
];

/// Default literal introducing the reasoning section
pub const DEFAULT_REASONING_MARKER: &str = "REASONING:";

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    512
}

fn default_top_p() -> f32 {
    0.9
}

fn default_reasoning_marker() -> String {
    DEFAULT_REASONING_MARKER.to_string()
}

/// Static configuration for one attribute
///
/// Unknown keys are rejected so a misspelt setting fails its own entry
/// instead of silently falling back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSpec {
    /// Attribute key, taken from the table key
    #[serde(skip)]
    pub name: String,

    /// Human-readable label for exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// System-role instruction
    pub system_prompt: String,

    /// Target model identifier
    pub model: String,

    /// Credential for this attribute's requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Literal introducing the reasoning section
    #[serde(default = "default_reasoning_marker")]
    pub reasoning_marker: String,

    /// Literal introducing the answer section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_marker: Option<String>,
}

impl AttributeSpec {
    /// Create a spec with default generation parameters and markers
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: None,
            system_prompt: system_prompt.into(),
            model: model.into(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            reasoning_marker: default_reasoning_marker(),
            answer_marker: None,
        }
    }

    /// Set the answer marker
    pub fn with_answer_marker(mut self, marker: impl Into<String>) -> Self {
        self.answer_marker = Some(marker.into());
        self
    }

    /// Set the per-attribute credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Export label, e.g. `material_name` → `Material Name`
    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| default_label(&self.name))
    }

    /// Answer marker, e.g. `material_name` → `MATERIAL NAME:`
    pub fn answer_marker(&self) -> String {
        self.answer_marker
            .clone()
            .unwrap_or_else(|| format!("{}:", self.name.replace('_', " ").to_uppercase()))
    }

    /// Validate the spec
    pub fn validate(&self) -> Result<(), ExtractorError> {
        let invalid = |reason: &str| ExtractorError::InvalidSpec {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.system_prompt.trim().is_empty() {
            return Err(invalid("system_prompt must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature must be within [0.0, 2.0]"));
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(invalid("top_p must be within (0.0, 1.0]"));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be greater than 0"));
        }

        let answer_marker = self.answer_marker();
        if self.reasoning_marker.trim().is_empty() || answer_marker.trim().is_empty() {
            return Err(invalid("markers must not be empty"));
        }
        if self.reasoning_marker == answer_marker {
            return Err(invalid("reasoning and answer markers must differ"));
        }
        Ok(())
    }
}

/// Title-cased label from an attribute key
pub fn default_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One roster slot
#[derive(Debug, Clone, PartialEq)]
pub enum RosterEntry {
    /// A usable spec
    Valid(AttributeSpec),

    /// A spec that failed to load; analyzing it yields `ANALYSIS_ERROR`
    Invalid {
        /// Attribute key
        name: String,
        /// Why the spec was rejected
        reason: String,
    },
}

impl RosterEntry {
    /// Attribute key
    pub fn name(&self) -> &str {
        match self {
            RosterEntry::Valid(spec) => &spec.name,
            RosterEntry::Invalid { name, .. } => name,
        }
    }

    /// Export label
    pub fn label(&self) -> String {
        match self {
            RosterEntry::Valid(spec) => spec.label(),
            RosterEntry::Invalid { name, .. } => default_label(name),
        }
    }

    /// Whether the spec loaded
    pub fn is_valid(&self) -> bool {
        matches!(self, RosterEntry::Valid(_))
    }
}

/// The ordered set of attributes analyzed in a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Build a roster from specs, validating each one
    pub fn new(specs: impl IntoIterator<Item = AttributeSpec>) -> Self {
        let entries = specs.into_iter().map(checked).collect();
        Self { entries }
    }

    /// Build a roster from a TOML table keyed by attribute name
    ///
    /// Table order is preserved. Entries that fail to deserialize or validate
    /// become [`RosterEntry::Invalid`].
    pub fn from_table(table: &toml::Table) -> Self {
        let entries = table
            .iter()
            .map(|(name, value)| match value.clone().try_into::<AttributeSpec>() {
                Ok(mut spec) => {
                    spec.name = name.clone();
                    checked(spec)
                }
                Err(e) => {
                    warn!("Attribute '{}' could not be loaded: {}", name, e);
                    RosterEntry::Invalid {
                        name: name.clone(),
                        reason: e.to_string().trim().to_string(),
                    }
                }
            })
            .collect();
        Self { entries }
    }

    /// Parse a TOML document whose top-level tables are attributes
    ///
    /// # Errors
    ///
    /// Returns error only if the document itself is not valid TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let table: toml::Table = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        Ok(Self::from_table(&table))
    }

    /// Entries in roster order
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Attribute keys in roster order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(RosterEntry::name).collect()
    }

    /// Look up an entry by attribute key
    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Entries that failed to load
    pub fn invalid(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(|entry| !entry.is_valid())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn checked(spec: AttributeSpec) -> RosterEntry {
    match spec.validate() {
        Ok(()) => RosterEntry::Valid(spec),
        Err(e) => {
            warn!("{}", e);
            let reason = match e {
                ExtractorError::InvalidSpec { reason, .. } => reason,
                other => other.to_string(),
            };
            RosterEntry::Invalid {
                name: spec.name,
                reason,
            }
        }
    }
}
