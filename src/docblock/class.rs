//! @acp:module "Class Block Builder"
//! @acp:summary "Merge an existing class doc comment with discovered facts"
//! @acp:domain docblock
//! @acp:layer core

use super::{
    align_lines, assemble, group_tags, reconcile_properties, tag_line, Discovery, CLASS_ORDER,
    COMMENT,
};

/// @acp:summary "A capability declaration a class block must carry once"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinRequirement {
    pub target: String,
    pub already_present: bool,
}

impl MixinRequirement {
    /// Check `targets` against the existing `@mixin` lines
    pub fn resolve(targets: &[String], existing: &[String]) -> Vec<MixinRequirement> {
        let present: Vec<&str> = existing
            .iter()
            .filter_map(|line| line.split_once("@mixin"))
            .map(|(_, rest)| normalize_target(rest))
            .collect();

        targets
            .iter()
            .map(|target| MixinRequirement {
                target: target.clone(),
                already_present: present.contains(&normalize_target(target)),
            })
            .collect()
    }
}

fn normalize_target(target: &str) -> &str {
    target.trim().trim_start_matches('\\')
}

/// @acp:summary "Everything needed to render one class block"
#[derive(Debug, Clone)]
pub struct ClassBlock<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    /// Existing doc comment text
    pub existing: Option<&'a str>,
    pub discovery: &'a Discovery,
    /// Required `@mixin` targets
    pub mixins: &'a [String],
    /// Description used when the block has no free text
    pub placeholder: &'a str,
}

impl ClassBlock<'_> {
    /// @acp:summary "Render the canonical block for this class"
    pub fn render(&self) -> String {
        let mut groups = group_tags(self.existing.unwrap_or_default());

        let properties = reconcile_properties(groups.lines("@property"), self.discovery);
        groups.set("@property", properties);

        if !groups.has(COMMENT) && !self.placeholder.is_empty() {
            groups.set(COMMENT, vec![format!(" * {}", self.placeholder)]);
        }

        let class_line = groups
            .lines("@class")
            .first()
            .cloned()
            .unwrap_or_else(|| tag_line("@class", &format!("{{{}}}", self.name)));
        let namespace_line = groups
            .lines("@namespace")
            .first()
            .cloned()
            .unwrap_or_else(|| tag_line("@namespace", &format!("{{{}}}", self.namespace)));
        let mut pair = align_lines(&[class_line, namespace_line], None).into_iter();
        groups.set("@class", pair.next().into_iter().collect());
        groups.set("@namespace", pair.next().into_iter().collect());

        let mut mixins: Vec<String> = Vec::new();
        for line in groups.lines("@mixin") {
            if !mixins.contains(line) {
                mixins.push(line.clone());
            }
        }
        for requirement in MixinRequirement::resolve(self.mixins, &mixins) {
            if !requirement.already_present {
                mixins.push(tag_line("@mixin", &requirement.target));
            }
        }
        groups.set("@mixin", mixins);

        assemble(&groups, &CLASS_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docblock::PropertyFact;
    use pretty_assertions::assert_eq;

    const BUILDER: &str = "\\Illuminate\\Database\\Eloquent\\Builder";

    fn user_block<'a>(existing: Option<&'a str>, discovery: &'a Discovery, mixins: &'a [String]) -> ClassBlock<'a> {
        ClassBlock {
            name: "User",
            namespace: "App\\Models",
            existing,
            discovery,
            mixins,
            placeholder: "<Class description here>",
        }
    }

    #[test]
    fn test_fresh_model_block() {
        let discovery = Discovery::Discovered(vec![
            PropertyFact::new("id", "int"),
            PropertyFact::new("name", "string"),
        ]);
        let mixins = vec![BUILDER.to_string()];
        let rendered = user_block(None, &discovery, &mixins).render();

        assert_eq!(
            rendered,
            "/**\n * <Class description here>\n *\n * @property int    $id\n * @property string $name\n *\n * @class     {User}\n * @namespace {App\\Models}\n *\n * @mixin \\Illuminate\\Database\\Eloquent\\Builder\n */"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let discovery = Discovery::Discovered(vec![PropertyFact::new("id", "int")]);
        let mixins = vec![BUILDER.to_string()];
        let once = user_block(Some("/**\n * Users.\n * @see Other\n */"), &discovery, &mixins).render();
        let twice = user_block(Some(&once), &discovery, &mixins).render();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_line_tagged_block_is_stable() {
        let discovery = Discovery::Discovered(vec![PropertyFact::new("id", "int")]);
        let mixins = vec![BUILDER.to_string()];
        let once = user_block(Some("/** @mixin IdeHelperUser */"), &discovery, &mixins).render();
        let twice = user_block(Some(&once), &discovery, &mixins).render();

        assert_eq!(once, twice);
        assert!(once.starts_with("/**\n * <Class description here>\n"));
        assert!(once.contains(" * @mixin IdeHelperUser\n * @mixin \\Illuminate"));
    }

    #[test]
    fn test_existing_mixin_not_duplicated() {
        let discovery = Discovery::Discovered(vec![]);
        let mixins = vec![BUILDER.to_string()];
        let existing = "/**\n * @mixin Illuminate\\Database\\Eloquent\\Builder\n */";
        let rendered = user_block(Some(existing), &discovery, &mixins).render();
        assert_eq!(rendered.matches("@mixin").count(), 1);
    }

    #[test]
    fn test_unavailable_facts_keep_properties() {
        let discovery = Discovery::Unavailable("no schema".into());
        let existing = "/**\n * Users\n *\n * @property int  $id\n */";
        let rendered = user_block(Some(existing), &discovery, &[]).render();
        assert!(rendered.contains(" * @property int  $id\n"));
    }

    #[test]
    fn test_human_class_tag_kept() {
        let discovery = Discovery::Discovered(vec![]);
        let existing = "/**\n * @class {Account}\n */";
        let rendered = user_block(Some(existing), &discovery, &[]).render();
        assert!(rendered.contains(" * @class     {Account}"));
        assert!(!rendered.contains("{User}"));
    }
}
