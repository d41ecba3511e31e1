//! Capability set discovered from a provider's well-known document

use serde::Deserialize;
use std::collections::BTreeMap;

/// Capabilities advertised by a paymail provider
///
/// Keys are BRFC ids or well-known aliases; values are either endpoint URL
/// templates or boolean flags. Accessors take a primary identifier and an
/// optional alternate; the first match wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapabilitySet {
    /// bsvalias specification version
    #[serde(default)]
    pub bsvalias: String,
    /// Capability identifier to value mapping
    #[serde(default)]
    pub capabilities: BTreeMap<String, serde_json::Value>,
}

impl CapabilitySet {
    /// Look up an endpoint URL template, trying the alternate id if the
    /// primary is absent or not a string
    pub fn get_string(&self, primary: &str, alternate: Option<&str>) -> Option<String> {
        self.string_value(primary)
            .or_else(|| alternate.and_then(|id| self.string_value(id)))
    }

    /// Look up a boolean flag, trying the alternate id if the primary is
    /// absent or not a boolean. Absent reads as false.
    pub fn get_bool(&self, primary: &str, alternate: Option<&str>) -> bool {
        self.bool_value(primary)
            .or_else(|| alternate.and_then(|id| self.bool_value(id)))
            .unwrap_or(false)
    }

    /// Check whether any capability is advertised under the given id
    pub fn has(&self, id: &str) -> bool {
        self.capabilities.contains_key(id)
    }

    fn string_value(&self, id: &str) -> Option<String> {
        match self.capabilities.get(id) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    fn bool_value(&self, id: &str) -> Option<bool> {
        match self.capabilities.get(id) {
            Some(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}
