//! @acp:module "Docblock"
//! @acp:summary "Tag grouping, alignment, reconciliation and canonical rendering"
//! @acp:domain docblock
//! @acp:layer core
//!
//! Everything in here is a pure text transform over `/** ... */` blocks.
//! Nothing reads files or touches the source outside the block itself.
//!
//! ## Pipeline
//!
//! 1. [`group_tags`] splits a raw block into [`TagGroups`]
//! 2. [`reconcile_properties`] / [`synthesize_method_block`] produce merged tags
//! 3. [`align_lines`] lines up the variable tokens of sibling tags
//! 4. [`assemble`] renders the groups in an [`OrderSpec`]
//!
//! [`ClassBlock`] runs the whole pipeline for a class comment.

pub mod align;
pub mod assemble;
pub mod class;
pub mod group;
pub mod method;
pub mod property;

pub use align::align_lines;
pub use assemble::{assemble, OrderSpec, CLASS_ORDER, METHOD_ORDER};
pub use class::{ClassBlock, MixinRequirement};
pub use group::group_tags;
pub use method::{synthesize_method_block, MethodSignature, Parameter};
pub use property::{reconcile_properties, Discovery, PropertyFact};

/// Opening delimiter of a block
pub const OPEN: &str = "/**";
/// Closing delimiter of a block
pub const CLOSE: &str = " */";
/// Blank decorative separator line
pub const BLANK: &str = " *";
/// Key of the synthetic group holding untagged lines
pub const COMMENT: &str = "comment";

/// Prefix every rendered tag line starts with
pub(crate) fn tag_line(tag: &str, body: &str) -> String {
    format!(" * {} {}", tag, body)
}

/// @acp:summary "Ordered mapping of tag keyword to the raw lines bearing it"
///
/// Groups remember the order in which they first appeared, and lines keep
/// their order within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl TagGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line to `key`, creating the group on first use
    pub fn push(&mut self, key: &str, line: impl Into<String>) {
        match self.groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, lines)) => lines.push(line.into()),
            None => self.groups.push((key.to_string(), vec![line.into()])),
        }
    }

    /// Replace the lines of `key`, keeping the group's position if it exists
    pub fn set(&mut self, key: &str, lines: Vec<String>) {
        match self.groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = lines,
            None => self.groups.push((key.to_string(), lines)),
        }
    }

    /// Lines of `key`, empty when the group is absent
    pub fn lines(&self, key: &str) -> &[String] {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn has(&self, key: &str) -> bool {
        !self.lines(key).is_empty()
    }

    /// Group keys in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, lines)| lines.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_first_appearance_order() {
        let mut groups = TagGroups::new();
        groups.push("@see", " * @see Foo");
        groups.push("@property", " * @property int $id");
        groups.push("@see", " * @see Bar");

        let keys: Vec<_> = groups.keys().collect();
        assert_eq!(keys, vec!["@see", "@property"]);
        assert_eq!(groups.lines("@see"), [" * @see Foo", " * @see Bar"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut groups = TagGroups::new();
        groups.push("comment", " * Hello");
        groups.push("@property", " * @property int $id");
        groups.set("comment", vec![" * Bye".to_string()]);

        assert_eq!(groups.keys().next(), Some("comment"));
        assert_eq!(groups.lines("comment"), [" * Bye"]);
        assert!(groups.lines("@mixin").is_empty());
        assert!(!groups.has("@mixin"));
    }
}
