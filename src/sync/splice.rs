//! @acp:module "Splice Engine"
//! @acp:summary "Replace a previously captured declaration text inside a source file"
//! @acp:domain sync
//! @acp:layer service
//!
//! Only whole-line occurrences count: a match must begin at the start of a
//! line and must not run into a longer identifier, so `class User` never
//! matches inside `class UserController`.

use crate::error::{DocsyncError, Result};

/// @acp:summary "Outcome of one splice"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub matched: bool,
    pub new_text: String,
}

/// Byte offsets of every anchored occurrence of `needle` in `source`
fn occurrences(source: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    source
        .match_indices(needle)
        .map(|(start, _)| start)
        .filter(|&start| start == 0 || source[..start].ends_with('\n'))
        .filter(|&start| {
            !source[start + needle.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
        })
        .collect()
}

/// @acp:summary "Replace the single occurrence of `previous` with `replacement`"
///
/// No occurrence leaves the text as it was with `matched == false`; more
/// than one is an [`DocsyncError::AmbiguousSpliceMatch`].
pub fn splice(source: &str, previous: &str, replacement: &str) -> Result<PatchResult> {
    let found = occurrences(source, previous);
    match found.as_slice() {
        [] => Ok(PatchResult {
            matched: false,
            new_text: source.to_string(),
        }),
        [start] => {
            let end = start + previous.len();
            let mut new_text = String::with_capacity(source.len() + replacement.len());
            new_text.push_str(&source[..*start]);
            new_text.push_str(replacement);
            new_text.push_str(&source[end..]);
            Ok(PatchResult {
                matched: true,
                new_text,
            })
        }
        many => Err(DocsyncError::AmbiguousSpliceMatch { count: many.len() }),
    }
}

/// Like [`splice`] but a missing match is an error
pub fn splice_required(source: &str, previous: &str, replacement: &str) -> Result<String> {
    let patch = splice(source, previous, replacement)?;
    if patch.matched {
        Ok(patch.new_text)
    } else {
        Err(DocsyncError::NoSpliceMatch)
    }
}
