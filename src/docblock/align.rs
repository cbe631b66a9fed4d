//! @acp:module "Column Aligner"
//! @acp:summary "Line up the variable token of sibling tag lines on one column"
//! @acp:domain docblock
//! @acp:layer core

use std::sync::LazyLock;

use regex::Regex;

/// Whitespace run followed by the variable token: `$name`, `&$name`,
/// `...$name` or a braced `{Name}`.
/// Groups: 1=token
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(&?(?:\.\.\.)?\$[A-Za-z0-9_]+|\{[^}\s]*\})").unwrap()
});

/// Split a line into the text before its token and the token onwards.
fn split_token(line: &str) -> Option<(&str, &str)> {
    let caps = TOKEN_PATTERN.captures(line)?;
    let whole = caps.get(0)?;
    let token = caps.get(1)?;
    Some((&line[..whole.start()], &line[token.start()..]))
}

/// @acp:summary "Pad each line so its token starts on a shared column"
///
/// The measured length of a line is the text before its token. With no
/// explicit `width` the longest measured length wins and gets exactly one
/// separating space. Lines without a token pass through untouched.
pub fn align_lines(lines: &[String], width: Option<usize>) -> Vec<String> {
    let width = width.unwrap_or_else(|| {
        lines
            .iter()
            .filter_map(|line| split_token(line))
            .map(|(prefix, _)| prefix.chars().count())
            .max()
            .unwrap_or(0)
    });

    lines
        .iter()
        .map(|line| match split_token(line) {
            Some((prefix, rest)) => {
                let pad = width.saturating_sub(prefix.chars().count()) + 1;
                format!("{}{}{}", prefix, " ".repeat(pad), rest)
            }
            None => line.clone(),
        })
        .collect()
}
