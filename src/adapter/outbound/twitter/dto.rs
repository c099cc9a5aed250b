//! Wire types for the filtered stream rules endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::Rule;
use crate::port::InstalledRule;

#[derive(Debug, Deserialize)]
pub struct RulesResponse {
    /// Absent when no rules are installed.
    #[serde(default)]
    pub data: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RuleEntry {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub tag: String,
}

impl From<RuleEntry> for InstalledRule {
    fn from(entry: RuleEntry) -> Self {
        Self {
            id: entry.id,
            rule: Rule::new(entry.value, entry.tag),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddRules<'a> {
    pub add: &'a [Rule],
}

#[derive(Debug, Serialize)]
pub struct DeleteRules<'a> {
    pub delete: RuleIds<'a>,
}

#[derive(Debug, Serialize)]
pub struct RuleIds<'a> {
    pub ids: &'a [String],
}
