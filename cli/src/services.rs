//! Service list parsing

use std::collections::HashSet;

use crate::errors::DeployError;

/// A deployable Railway service, labeled for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Human label, unique within a run, used only for display and lookup
    pub label: String,

    /// Opaque Railway service id
    pub id: String,
}

/// The set of services targeted by a deploy run
///
/// Built once from the multiline `label:id` input. Iteration order is an
/// implementation detail; only the first-service guarantee in the
/// orchestrator mandates an ordering.
#[derive(Debug, Clone)]
pub struct ServiceSet {
    entries: Vec<ServiceEntry>,
}

impl ServiceSet {
    /// Parse a multiline service list, one `label:id` pair per line
    ///
    /// Splits each line on the first colon only, so ids may themselves
    /// contain colons. Empty lines are skipped; a non-empty line without a
    /// colon is an error.
    pub fn parse(raw: &str) -> Result<Self, DeployError> {
        let mut entries = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (label, id) = line
                .split_once(':')
                .ok_or_else(|| DeployError::MalformedServiceLine(line.to_string()))?;
            let label = label.trim();
            let id = id.trim();

            if label.is_empty() {
                return Err(DeployError::EmptyServiceField {
                    field: "label",
                    line: line.to_string(),
                });
            }
            if id.is_empty() {
                return Err(DeployError::EmptyServiceField {
                    field: "id",
                    line: line.to_string(),
                });
            }
            if !seen.insert(label.to_string()) {
                return Err(DeployError::DuplicateServiceLabel(label.to_string()));
            }

            entries.push(ServiceEntry {
                label: label.to_string(),
                id: id.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(DeployError::EmptyServiceList);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.iter()
    }

    /// Look up an entry by label
    pub fn get(&self, label: &str) -> Option<&ServiceEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// All labels, for error reporting
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }
}
