//! Deterministic naming rules.
//!
//! All collision checks are case-insensitive: `used` sets hold lowercase
//! names, as produced by [`Hierarchy::sibling_names`](crate::hierarchy::Hierarchy::sibling_names).

use std::collections::HashSet;

use dataroom_core::config::WorkspaceConfig;

/// Configurable parts of the naming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Extension every file name carries, including the dot.
    pub required_extension: String,
    /// Name used when a file name normalizes to nothing.
    pub fallback_file_name: String,
}

impl NamingPolicy {
    /// Build the policy from workspace configuration.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self {
            required_extension: config.required_extension.clone(),
            fallback_file_name: config.fallback_file_name.clone(),
        }
    }

    /// Append the required extension when missing.
    pub fn ensure_extension(&self, name: &str) -> String {
        ensure_extension(name, &self.required_extension)
    }

    /// Whether a name may be admitted as a file.
    pub fn accepts(&self, name: &str) -> bool {
        has_required_extension(name, &self.required_extension)
    }

    /// Unique file name under this policy.
    pub fn unique_file_name(&self, candidate: &str, used: &HashSet<String>) -> String {
        unique_file_name_with(candidate, used, self)
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::from_config(&WorkspaceConfig::default())
    }
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a file name into base and extension (the extension keeps its dot).
///
/// A name without a dot, or whose only dot is the first character, has no
/// extension.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx..])),
        _ => (name, None),
    }
}

/// Append `extension` unless the name already ends with it (any case).
pub fn ensure_extension(name: &str, extension: &str) -> String {
    if has_required_extension(name, extension) {
        name.to_string()
    } else {
        format!("{name}{extension}")
    }
}

/// Whether the name ends with `extension`, ignoring case.
pub fn has_required_extension(name: &str, extension: &str) -> bool {
    name.to_lowercase().ends_with(&extension.to_lowercase())
}

/// Unique folder name among `used`.
///
/// Returns the candidate unchanged when free. Otherwise appends ` (n)` with
/// the smallest positive `n` that is free; a candidate that already ends in
/// ` (n)` is numbered from its base, so `Budget (1)` becomes `Budget (2)`.
pub fn unique_folder_name(candidate: &str, used: &HashSet<String>) -> String {
    if !used.contains(&candidate.to_lowercase()) {
        return candidate.to_string();
    }

    let base = strip_copy_suffix(candidate);
    first_free(used, |n| format!("{base} ({n})"))
}

/// Unique file name among `used`, using the default naming policy.
///
/// The required extension is appended first when missing, so `notes`
/// becomes `notes.pdf` before any collision check.
pub fn unique_file_name(candidate: &str, used: &HashSet<String>) -> String {
    unique_file_name_with(candidate, used, &NamingPolicy::default())
}

fn unique_file_name_with(candidate: &str, used: &HashSet<String>, policy: &NamingPolicy) -> String {
    let normalized = normalize_name(candidate);
    let name = if normalized.is_empty() {
        policy.fallback_file_name.clone()
    } else {
        policy.ensure_extension(&normalized)
    };

    if !used.contains(&name.to_lowercase()) {
        return name;
    }

    let (base, extension) = split_file_name(&name);
    let extension = extension.unwrap_or(&policy.required_extension);
    let base = strip_copy_suffix(base);
    first_free(used, |n| format!("{base} ({n}){extension}"))
}

fn first_free(used: &HashSet<String>, format_candidate: impl Fn(u64) -> String) -> String {
    // At most `used.len() + 1` candidates can be tried before one is free.
    (1..)
        .map(format_candidate)
        .find(|name| !used.contains(&name.to_lowercase()))
        .unwrap_or_default()
}

/// `"Budget (3)"` → `"Budget"`; anything else is returned unchanged.
fn strip_copy_suffix(name: &str) -> &str {
    let stripped = name
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once(" ("))
        .filter(|(base, digits)| {
            !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        });
    match stripped {
        Some((base, _)) => base,
        None => name,
    }
}
