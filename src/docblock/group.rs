//! @acp:module "Tag Grouper"
//! @acp:summary "Split a raw doc comment into keyword groups"
//! @acp:domain docblock
//! @acp:layer core

use std::sync::LazyLock;

use regex::Regex;

use super::{TagGroups, COMMENT};

/// Matches `* @tag` at the start of a block line.
/// Groups: 1=tag keyword including the `@`
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\*\s+(@[a-z][a-z-]*)(?:\s|$)").unwrap()
});

/// @acp:summary "Parse raw block text into ordered tag groups"
///
/// Tagged lines are kept verbatim under their keyword. Untagged lines go to
/// the `comment` group, except for decoration (`/**`, a lone `*`, `*/`) and
/// lines without a `*` at all, which are dropped.
pub fn group_tags(block: &str) -> TagGroups {
    let mut grouped = TagGroups::new();

    for line in block.lines() {
        if let Some(caps) = TAG_PATTERN.captures(line) {
            grouped.push(&caps[1], line);
            continue;
        }

        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("/**") {
            // Text sharing the opening line is re-read as a regular block line
            let rest = rest.trim().trim_end_matches("*/").trim_end();
            if rest.is_empty() {
                continue;
            }
            let line = format!(" * {}", rest);
            match TAG_PATTERN.captures(&line) {
                Some(caps) => grouped.push(&caps[1], line.clone()),
                None => grouped.push(COMMENT, line),
            }
            continue;
        }
        if is_decoration(trimmed) {
            continue;
        }
        grouped.push(COMMENT, line);
    }

    grouped
}

fn is_decoration(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed == "*"
        || trimmed == "*/"
        || trimmed == "**/"
        || !trimmed.contains('*')
}
