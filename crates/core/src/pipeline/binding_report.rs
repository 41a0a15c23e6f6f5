use crate::annotation::domain::annotation::Annotation;
use crate::shared::binding_key::{BindingKey, GroupKey};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub size: usize,
}

/// Snapshot of an annotation's binding state: the key of every label, in
/// label order, and the size of every group, in group order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingReport {
    pub label_keys: Vec<Option<BindingKey>>,
    pub groups: Vec<GroupSummary>,
}

impl BindingReport {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        let label_keys = annotation
            .labels
            .iter()
            .map(|l| l.binding_key().cloned())
            .collect();
        let groups = annotation
            .get_bindings()
            .into_iter()
            .map(|(key, labels)| GroupSummary {
                key,
                size: labels.len(),
            })
            .collect();
        Self { label_keys, groups }
    }

    pub fn bound_group_count(&self) -> usize {
        self.groups.iter().filter(|g| g.key.is_bound()).count()
    }

    pub fn unbound_count(&self) -> usize {
        self.groups
            .iter()
            .find(|g| !g.key.is_bound())
            .map_or(0, |g| g.size)
    }

    /// Human-readable group summary, one line per group.
    pub fn summary_lines(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| match &g.key {
                GroupKey::Bound(key) => format!("Group [{key}] has {} labels", g.size),
                GroupKey::Unbound => format!("{} labels do not have any binding", g.size),
            })
            .collect()
    }
}
