//! The central in-memory data structure (component C): `ActionPathEntry`
//! and its set algebra, `ActionPathSet`.
//!
//! Grounded on `analyze.go`'s `ActionPathSet`/`ResolveAssumeRolePaths`: add
//! is append-only, equality and removal are always on the
//! (principal_arn, action, resource_arn) triple, never on the full entry.

use {
    crate::{condition::Condition, effect::Effect, graph::GraphHop, graph::NodeId},
    std::collections::{HashMap, HashSet},
};

/// One evaluated permission: `(principal, action, resource, effect, conditions)`.
#[derive(Clone, Debug)]
pub struct ActionPathEntry {
    pub principal_id: NodeId,
    pub principal_arn: String,
    pub principal_tags: HashMap<String, String>,
    pub is_principal_direct: bool,

    pub resource_id: NodeId,
    pub resource_arn: String,
    pub resource_tags: HashMap<String, String>,

    pub action: String,
    pub effect: Effect,
    pub statement: NodeId,
    pub conditions: Vec<Condition>,
    pub path: Vec<GraphHop>,
}

impl ActionPathEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        principal_id: NodeId,
        principal_arn: impl Into<String>,
        is_principal_direct: bool,
        resource_id: NodeId,
        resource_arn: impl Into<String>,
        action: impl Into<String>,
        effect: Effect,
        statement: NodeId,
    ) -> Self {
        Self {
            principal_id,
            principal_arn: principal_arn.into(),
            principal_tags: HashMap::new(),
            is_principal_direct,
            resource_id,
            resource_arn: resource_arn.into(),
            resource_tags: HashMap::new(),
            action: action.into(),
            effect,
            statement,
            conditions: Vec::new(),
            path: Vec::new(),
        }
    }

    /// The structural-equality key: invariant 4, all other fields are metadata.
    #[inline]
    pub fn key(&self) -> (&str, &str, &str) {
        (self.principal_arn.as_str(), self.action.as_str(), self.resource_arn.as_str())
    }

    #[inline]
    pub fn is_conditional(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// The 5th `:`-separated segment (account id) of `arn`, or empty if the
    /// ARN has fewer than 5 segments.
    pub fn account_id_of(arn: &str) -> &str {
        arn.splitn(6, ':').nth(4).unwrap_or("")
    }

    pub fn principal_account_id(&self) -> &str {
        Self::account_id_of(&self.principal_arn)
    }

    pub fn resource_account_id(&self) -> &str {
        Self::account_id_of(&self.resource_arn)
    }
}

/// An ordered collection of [`ActionPathEntry`] values supporting the set
/// operations spec.md §4.C names. `add` never dedups; `contains` and
/// `remove_by_equality` always compare on [`ActionPathEntry::key`].
#[derive(Clone, Debug, Default)]
pub struct ActionPathSet {
    entries: Vec<ActionPathEntry>,
}

impl ActionPathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ActionPathEntry) {
        self.entries.push(entry);
    }

    pub fn add_path_set(&mut self, other: ActionPathSet) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionPathEntry> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ActionPathEntry> {
        self.entries
    }

    pub fn contains(&self, entry: &ActionPathEntry) -> bool {
        self.entries.iter().any(|e| e.key() == entry.key())
    }

    /// Remove every entry sharing `entry`'s (principal_arn, action, resource_arn) triple.
    pub fn remove_by_equality(&mut self, entry: &ActionPathEntry) {
        let key = entry.key();
        self.entries.retain(|e| e.key() != key);
    }

    pub fn split_by_effect(self) -> (ActionPathSet, ActionPathSet) {
        let mut allow = ActionPathSet::new();
        let mut deny = ActionPathSet::new();
        for entry in self.entries {
            match entry.effect {
                Effect::Allow => allow.add(entry),
                Effect::Deny => deny.add(entry),
            }
        }
        (allow, deny)
    }

    /// Partitions into (unconditional allow, unconditional deny, conditional
    /// allow, conditional deny).
    pub fn split_by_conditional_effect(self) -> (ActionPathSet, ActionPathSet, ActionPathSet, ActionPathSet) {
        let mut allow = ActionPathSet::new();
        let mut deny = ActionPathSet::new();
        let mut cond_allow = ActionPathSet::new();
        let mut cond_deny = ActionPathSet::new();

        for entry in self.entries {
            match (entry.effect, entry.is_conditional()) {
                (Effect::Allow, false) => allow.add(entry),
                (Effect::Allow, true) => cond_allow.add(entry),
                (Effect::Deny, false) => deny.add(entry),
                (Effect::Deny, true) => cond_deny.add(entry),
            }
        }

        (allow, deny, cond_allow, cond_deny)
    }

    /// May contain duplicates; callers dedupe.
    pub fn principal_arns(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.principal_arn.clone()).collect()
    }

    pub fn resource_arns_unique(&self) -> HashSet<String> {
        self.entries.iter().map(|e| e.resource_arn.clone()).collect()
    }

    pub fn to_principal_action_map(&self) -> HashMap<String, HashSet<String>> {
        let mut map: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in &self.entries {
            map.entry(entry.principal_arn.clone()).or_default().insert(entry.action.clone());
        }
        map
    }

    pub fn to_action_path_map(&self) -> HashMap<String, Vec<ActionPathEntry>> {
        let mut map: HashMap<String, Vec<ActionPathEntry>> = HashMap::new();
        for entry in &self.entries {
            map.entry(entry.action.clone()).or_default().push(entry.clone());
        }
        map
    }
}

impl FromIterator<ActionPathEntry> for ActionPathSet {
    fn from_iter<T: IntoIterator<Item = ActionPathEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ActionPathSet {
    type Item = ActionPathEntry;
    type IntoIter = std::vec::IntoIter<ActionPathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
