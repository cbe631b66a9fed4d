//! @acp:module "Parameter Scanner"
//! @acp:summary "Bracket- and quote-aware splitting of parameter lists"
//! @acp:domain parse
//! @acp:layer service

use std::sync::LazyLock;

use regex::Regex;

use crate::docblock::Parameter;

/// Groups: 1=type, 2=by-reference, 3=variadic, 4=name
static PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:public|protected|private|readonly)\s+)*(?:(\S+)\s+)?(&)?(\.\.\.)?\$([A-Za-z_][A-Za-z0-9_]*)$",
    )
    .unwrap()
});

/// Find the `)` closing the `(` at byte offset `open`.
pub(crate) fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on top-level commas.
pub(crate) fn split_parameters(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (offset, ch) in list.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);

    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Drop leading `#[...]` attribute groups.
fn strip_attributes(mut raw: &str) -> &str {
    loop {
        raw = raw.trim_start();
        if !raw.starts_with("#[") {
            return raw;
        }
        match matching_paren(raw, 1) {
            Some(end) => raw = &raw[end + 1..],
            None => return raw,
        }
    }
}

/// Parse one raw parameter such as `?int $id = null`.
pub(crate) fn parse_parameter(raw: &str) -> Option<Parameter> {
    let raw = strip_attributes(raw);
    let declared = raw.split('=').next()?;
    let normalized = declared.split_whitespace().collect::<Vec<_>>().join(" ");
    let caps = PARAM_PATTERN.captures(&normalized)?;

    Some(Parameter {
        name: caps.get(4)?.as_str().to_string(),
        r#type: caps.get(1).map(|m| m.as_str().to_string()),
        by_ref: caps.get(2).is_some(),
        variadic: caps.get(3).is_some(),
    })
}
