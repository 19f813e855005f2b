//! Text formatting helpers for package details

use crate::core::depend::Depend;

const SIZE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with binary units, e.g. `1.50 KiB`
#[must_use]
pub fn human_readable_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", SIZE_UNITS[unit])
    }
}

/// Join items with `", "`
#[must_use]
pub fn list_to_string<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join dependency specifications with `", "`
#[must_use]
pub fn deplist_to_string(deps: &[Depend]) -> String {
    deps.iter()
        .map(Depend::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip the `: description` part of an optional dependency string
#[must_use]
pub fn strtrunc_dep_desc(optdep: &str) -> &str {
    optdep.split_once(": ").map_or(optdep, |(spec, _)| spec)
}
