//! # Match Criteria

use std::collections::HashMap;
use std::fmt;

use shared_types::{NotificationEvent, ScriptHash};

/// Which emitters a criterion accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterFilter {
    Any,
    Exact(ScriptHash),
}

impl EmitterFilter {
    pub fn accepts(&self, emitter: &ScriptHash) -> bool {
        match self {
            EmitterFilter::Any => true,
            EmitterFilter::Exact(expected) => expected == emitter,
        }
    }
}

impl fmt::Display for EmitterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitterFilter::Any => write!(f, "*"),
            EmitterFilter::Exact(hash) => write!(f, "{}", hash),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub name: String,
    pub emitter: EmitterFilter,
}

impl MatchCriteria {
    pub fn new(name: impl Into<String>, emitter: EmitterFilter) -> Self {
        Self {
            name: name.into(),
            emitter,
        }
    }

    pub fn matches(&self, event: &NotificationEvent) -> bool {
        event.name == self.name && self.emitter.accepts(&event.emitter)
    }
}

/// Criteria keyed by event name. Inserting a name twice keeps the later
/// emitter filter.
#[derive(Debug, Clone, Default)]
pub struct CriteriaSet {
    by_name: HashMap<String, EmitterFilter>,
}

impl CriteriaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, criteria: MatchCriteria) {
        self.by_name.insert(criteria.name, criteria.emitter);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn matches(&self, event: &NotificationEvent) -> bool {
        self.by_name
            .get(&event.name)
            .is_some_and(|emitter| emitter.accepts(&event.emitter))
    }

    pub fn iter(&self) -> impl Iterator<Item = MatchCriteria> + '_ {
        self.by_name
            .iter()
            .map(|(name, emitter)| MatchCriteria::new(name.clone(), *emitter))
    }
}

impl FromIterator<MatchCriteria> for CriteriaSet {
    fn from_iter<I: IntoIterator<Item = MatchCriteria>>(iter: I) -> Self {
        let mut set = CriteriaSet::new();
        for criteria in iter {
            set.insert(criteria);
        }
        set
    }
}

/// Events accepted by `criteria`, in input order.
pub fn filter<'a>(
    criteria: &CriteriaSet,
    events: &'a [NotificationEvent],
) -> Vec<&'a NotificationEvent> {
    events.iter().filter(|e| criteria.matches(e)).collect()
}
