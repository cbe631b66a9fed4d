//! @acp:module "Property Reconciler"
//! @acp:summary "Merge discovered properties with existing @property tags"
//! @acp:domain docblock
//! @acp:layer core
//!
//! Existing tags are matched by identity (type and `$name`), not by text,
//! so padding added by the aligner or a trailing human note never causes a
//! duplicate to be synthesized.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{align_lines, tag_line};

/// Groups: 1=type (may contain spaces, e.g. `array<int, string>`), 2=name without the sigil
static PROPERTY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@property\s+(.+?)\s+&?\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// @acp:summary "A property known to exist on the class"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFact {
    pub name: String,
    pub r#type: String,
    /// Existing raw tag line describing this property, kept verbatim
    pub source_line: Option<String>,
}

impl PropertyFact {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            source_line: None,
        }
    }

    fn render(&self) -> String {
        match &self.source_line {
            Some(line) => line.clone(),
            None => tag_line("@property", &format!("{} ${}", self.r#type, self.name)),
        }
    }
}

/// @acp:summary "Outcome of asking the data source for property facts"
#[derive(Debug, Clone)]
pub enum Discovery {
    /// Facts in discovery order
    Discovered(Vec<PropertyFact>),
    /// The data source failed; existing tags must stay untouched
    Unavailable(String),
}

/// Parse `(type, name)` out of an existing `@property` line
fn describe(line: &str) -> Option<(&str, &str)> {
    let caps = PROPERTY_PATTERN.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// @acp:summary "Produce the merged, aligned @property group"
///
/// Discovered facts come first in discovery order, reusing an existing line
/// whenever one already describes the same type and name. Existing lines for
/// names that were not discovered follow in their original order. Existing
/// lines for a discovered name with a different type are replaced.
///
/// With [`Discovery::Unavailable`] the existing lines are returned as-is.
pub fn reconcile_properties(existing: &[String], discovery: &Discovery) -> Vec<String> {
    let facts = match discovery {
        Discovery::Discovered(facts) => facts,
        Discovery::Unavailable(_) => return existing.to_vec(),
    };

    let mut used = vec![false; existing.len()];
    let mut seen_names = HashSet::new();
    let mut merged: Vec<PropertyFact> = Vec::with_capacity(facts.len());

    for fact in facts {
        if !seen_names.insert(fact.name.as_str()) {
            continue;
        }
        let found = existing.iter().enumerate().position(|(i, line)| {
            !used[i] && describe(line) == Some((fact.r#type.as_str(), fact.name.as_str()))
        });
        let mut fact = fact.clone();
        if let Some(index) = found {
            used[index] = true;
            fact.source_line = Some(existing[index].clone());
        }
        merged.push(fact);
    }

    let mut lines: Vec<String> = merged.iter().map(PropertyFact::render).collect();
    for (index, line) in existing.iter().enumerate() {
        if used[index] || lines.contains(line) {
            continue;
        }
        match describe(line) {
            Some((_, name)) if seen_names.contains(name) => {}
            _ => lines.push(line.clone()),
        }
    }

    align_lines(&lines, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn facts(pairs: &[(&str, &str)]) -> Discovery {
        Discovery::Discovered(pairs.iter().map(|(n, t)| PropertyFact::new(*n, *t)).collect())
    }

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_discovery_order_is_kept_and_aligned() {
        let lines = reconcile_properties(
            &[],
            &facts(&[("id", "int"), ("name", "string"), ("email", "string")]),
        );
        assert_eq!(
            lines,
            vec![
                " * @property int    $id",
                " * @property string $name",
                " * @property string $email",
            ]
        );
        let columns: HashSet<_> = lines.iter().map(|l| l.find('$')).collect();
        assert_eq!(columns.len(), 1);
    }

    #[test]
    fn test_generic_typed_line_matched_by_name() {
        let lines = reconcile_properties(
            &owned(&[" * @property array<int, string> $tags"]),
            &facts(&[("tags", "string")]),
        );
        assert_eq!(lines, vec![" * @property string $tags"]);
    }

    #[test]
    fn test_generic_typed_line_kept_when_types_agree() {
        let existing = owned(&[" * @property array{a: int} $shape"]);
        let lines = reconcile_properties(&existing, &facts(&[("shape", "array{a: int}")]));
        assert_eq!(lines, existing);
    }

    #[test]
    fn test_existing_line_kept_verbatim() {
        let existing = owned(&[" * @property int $id  // primary key"]);
        let lines = reconcile_properties(&existing, &facts(&[("id", "int")]));
        assert_eq!(lines, existing);
    }

    #[test]
    fn test_padded_line_matches_by_identity() {
        let existing = owned(&[" * @property int    $id", " * @property string $name"]);
        let lines = reconcile_properties(&existing, &facts(&[("id", "int"), ("name", "string")]));
        assert_eq!(lines, existing);
    }

    #[test]
    fn test_name_prefix_is_not_a_match() {
        let existing = owned(&[" * @property int $id_user"]);
        let lines = reconcile_properties(&existing, &facts(&[("id", "int")]));
        assert_eq!(lines, vec![" * @property int $id", " * @property int $id_user"]);
    }

    #[test]
    fn test_type_change_replaces_stale_line() {
        let existing = owned(&[" * @property string $id"]);
        let lines = reconcile_properties(&existing, &facts(&[("id", "int")]));
        assert_eq!(lines, vec![" * @property int $id"]);
    }

    #[test]
    fn test_undiscovered_human_tags_survive() {
        let existing = owned(&[" * @property string $full_name accessor"]);
        let lines = reconcile_properties(&existing, &facts(&[("id", "int")]));
        assert_eq!(
            lines,
            vec![" * @property int    $id", " * @property string $full_name accessor"]
        );
    }

    #[test]
    fn test_unavailable_leaves_group_byte_identical() {
        let existing = owned(&[" * @property   int $id", " * @property string $x", " * @property string $x"]);
        let lines = reconcile_properties(&existing, &Discovery::Unavailable("down".into()));
        assert_eq!(lines, existing);
    }

    #[test]
    fn test_duplicate_discoveries_collapse() {
        let lines = reconcile_properties(&[], &facts(&[("id", "int"), ("id", "int")]));
        assert_eq!(lines, vec![" * @property int $id"]);
    }
}
