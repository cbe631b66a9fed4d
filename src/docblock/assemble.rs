//! @acp:module "Block Assembler"
//! @acp:summary "Render tag groups in canonical order with controlled spacing"
//! @acp:domain docblock
//! @acp:layer core

use super::{TagGroups, BLANK, CLOSE, COMMENT, OPEN};

/// @acp:summary "Fixed group order with a blank-line-after flag per group"
#[derive(Debug, Clone, Copy)]
pub struct OrderSpec(pub &'static [(&'static str, bool)]);

impl OrderSpec {
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| *k == key)
    }
}

/// Class blocks: description, properties, the `@class`/`@namespace` pair, mixins
pub const CLASS_ORDER: OrderSpec = OrderSpec(&[
    (COMMENT, true),
    ("@property", true),
    ("@class", false),
    ("@namespace", true),
    ("@mixin", false),
]);

/// Method blocks: parameters, separator, return
pub const METHOD_ORDER: OrderSpec = OrderSpec(&[("@param", true), ("@return", false)]);

/// @acp:summary "Render groups inside `/** */` following `order`"
///
/// Groups missing from `groups` are skipped. Groups not named by `order`
/// follow the ordered ones in first-appearance order. Runs of blank
/// separators collapse to one and no separator touches a delimiter.
pub fn assemble(groups: &TagGroups, order: &OrderSpec) -> String {
    let mut body: Vec<&str> = Vec::new();

    for (key, blank_after) in order.0 {
        let lines = groups.lines(key);
        if lines.is_empty() {
            continue;
        }
        body.extend(lines.iter().map(String::as_str));
        if *blank_after {
            body.push(BLANK);
        }
    }

    let mut extras = groups.keys().filter(|k| !order.contains(k)).peekable();
    if extras.peek().is_some() {
        body.push(BLANK);
        for key in extras {
            body.extend(groups.lines(key).iter().map(String::as_str));
        }
    }

    let mut rendered = String::from(OPEN);
    let mut last_blank = true;
    for line in body {
        let is_blank = line == BLANK;
        if is_blank && last_blank {
            continue;
        }
        rendered.push('\n');
        rendered.push_str(line);
        last_blank = is_blank;
    }
    if last_blank && rendered.ends_with(BLANK) && rendered != OPEN {
        rendered.truncate(rendered.len() - BLANK.len() - 1);
    }
    rendered.push('\n');
    rendered.push_str(CLOSE);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docblock::group_tags;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_order_and_spacing() {
        let mut groups = TagGroups::new();
        groups.push("@mixin", " * @mixin \\Builder");
        groups.push("@namespace", " * @namespace {App}");
        groups.push("@class", " * @class {User}");
        groups.push("@property", " * @property int $id");
        groups.push(COMMENT, " * A user");

        let rendered = assemble(&groups, &CLASS_ORDER);
        assert_eq!(
            rendered,
            "/**\n * A user\n *\n * @property int $id\n *\n * @class {User}\n * @namespace {App}\n *\n * @mixin \\Builder\n */"
        );
    }

    #[test]
    fn test_missing_groups_are_skipped() {
        let mut groups = TagGroups::new();
        groups.push("@class", " * @class {User}");
        groups.push("@namespace", " * @namespace {App}");

        let rendered = assemble(&groups, &CLASS_ORDER);
        assert_eq!(rendered, "/**\n * @class {User}\n * @namespace {App}\n */");
    }

    #[test]
    fn test_unknown_groups_follow_ordered_ones() {
        let mut groups = TagGroups::new();
        groups.push("@see", " * @see Other");
        groups.push(COMMENT, " * Text");

        let rendered = assemble(&groups, &CLASS_ORDER);
        assert_eq!(rendered, "/**\n * Text\n *\n * @see Other\n */");
    }

    #[test]
    fn test_method_order_without_return() {
        let mut groups = TagGroups::new();
        groups.push("@param", " * @param int $a");
        assert_eq!(assemble(&groups, &METHOD_ORDER), "/**\n * @param int $a\n */");
    }

    #[test]
    fn test_empty_groups_render_empty_block() {
        assert_eq!(assemble(&TagGroups::new(), &CLASS_ORDER), "/**\n */");
    }

    #[test]
    fn test_rendering_is_stable_under_regrouping() {
        let mut groups = TagGroups::new();
        groups.push(COMMENT, " * Something");
        groups.push("@property", " * @property int $id");
        groups.push("@see", " * @see Foo");
        let once = assemble(&groups, &CLASS_ORDER);
        let twice = assemble(&group_tags(&once), &CLASS_ORDER);
        assert_eq!(once, twice);
    }
}
