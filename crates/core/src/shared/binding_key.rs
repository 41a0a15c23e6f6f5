use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque grouping token shared by labels that form one logical object.
///
/// Two labels with equal keys belong to the same binding group. The key
/// carries no meaning beyond equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingKey(String);

impl BindingKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BindingKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for BindingKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Identity of a binding group.
///
/// Labels without a binding key all fall into the single `Unbound` group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Bound(BindingKey),
    Unbound,
}

impl GroupKey {
    pub fn is_bound(&self) -> bool {
        matches!(self, GroupKey::Bound(_))
    }

    pub fn binding_key(&self) -> Option<&BindingKey> {
        match self {
            GroupKey::Bound(key) => Some(key),
            GroupKey::Unbound => None,
        }
    }
}

impl From<Option<&BindingKey>> for GroupKey {
    fn from(key: Option<&BindingKey>) -> Self {
        key.map_or(GroupKey::Unbound, |k| GroupKey::Bound(k.clone()))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Bound(key) => write!(f, "{key}"),
            GroupKey::Unbound => write!(f, "<unbound>"),
        }
    }
}
