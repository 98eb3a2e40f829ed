use std::sync::LazyLock;

use compact_str::CompactString;
use indexmap::IndexSet;
use regex::Regex;

/// `FROM`/`JOIN` followed by one to three dot-separated identifiers.
static TABLE_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:from|join)\s+([a-z_][a-z0-9_]*(?:\.[a-z_][a-z0-9_]*){0,2})")
        .expect("valid regex")
});

/// Extract table references that follow `FROM` or `JOIN`.
///
/// Lexical only: names inside string literals or comments are picked up too,
/// and anything that is not a plain identifier path is missed. References are
/// lower-cased and returned once each, in order of first appearance.
pub fn extract_table_references(query: &str) -> IndexSet<CompactString> {
    let lowered = query.to_lowercase();
    TABLE_REFERENCE_REGEX
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1))
        .map(|m| CompactString::from(m.as_str()))
        .collect()
}
