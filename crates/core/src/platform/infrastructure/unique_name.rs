use std::collections::HashSet;

use crate::shared::constants::UNIQUE_NAME_SUFFIX_DIGITS;

/// Returns `base` if unused, otherwise the first free `base_001`, `base_002`, ...
pub fn unique_name<'a>(base: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n:0width$}", width = UNIQUE_NAME_SUFFIX_DIGITS))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
