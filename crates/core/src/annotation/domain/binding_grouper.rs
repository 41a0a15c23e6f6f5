use indexmap::IndexMap;

use crate::annotation::domain::label::Label;
use crate::shared::binding_key::GroupKey;

/// Labels partitioned by binding key.
///
/// Groups iterate in first-occurrence order of their key; labels inside a
/// group keep their input order. Every group is non-empty.
pub type BindingGroups<'a> = IndexMap<GroupKey, Vec<&'a Label>>;

/// Partitions `labels` into binding groups.
///
/// Labels without a key share the single [`GroupKey::Unbound`] group, which
/// is absent when every label is bound.
pub fn group_bindings(labels: &[Label]) -> BindingGroups<'_> {
    let mut groups = BindingGroups::new();
    for label in labels {
        groups.entry(label.group_key()).or_default().push(label);
    }
    groups
}
