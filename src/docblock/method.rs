//! @acp:module "Method Block Synthesizer"
//! @acp:summary "Render @param/@return blocks for undocumented methods"
//! @acp:domain docblock
//! @acp:layer core

use super::{align_lines, assemble, tag_line, TagGroups, METHOD_ORDER};
use crate::parse::ImportTable;

/// Type used for parameters declared without one
const UNTYPED: &str = "mixed";

/// @acp:summary "A single declared parameter"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub r#type: Option<String>,
    pub by_ref: bool,
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, r#type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.map(str::to_string),
            by_ref: false,
            variadic: false,
        }
    }

    fn token(&self) -> String {
        let mut token = String::new();
        if self.by_ref {
            token.push('&');
        }
        if self.variadic {
            token.push_str("...");
        }
        token.push('$');
        token.push_str(&self.name);
        token
    }
}

/// @acp:summary "Declared shape of a public method"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    /// Exact source text of the declaration line
    pub declaration_line: String,
    /// Exact source text from the first attribute line above the
    /// declaration (if any) through the end of the declaration line
    pub anchor: String,
    /// Existing doc comment, if any
    pub doc: Option<String>,
    /// Name of the class, trait or interface the method is declared in
    pub declaring_class: String,
}

impl MethodSignature {
    /// Leading whitespace of the declaration line
    pub fn indent(&self) -> &str {
        let trimmed = self.declaration_line.trim_start_matches([' ', '\t']);
        &self.declaration_line[..self.declaration_line.len() - trimmed.len()]
    }

    /// Whether a block may be synthesized for this method inside `class`
    pub fn wants_block(&self, class: &str) -> bool {
        let documented = self.doc.as_deref().is_some_and(|d| !d.trim().is_empty());
        !documented && self.declaring_class == class
    }
}

/// @acp:summary "Render an indented block for `method`, or None when skipped"
///
/// Methods that already carry a doc comment, that are declared outside
/// `class`, or that have neither parameters nor a return type get nothing.
/// Types are collapsed through `imports` before rendering.
pub fn synthesize_method_block(
    method: &MethodSignature,
    class: &str,
    imports: &ImportTable,
) -> Option<String> {
    if !method.wants_block(class) {
        return None;
    }
    if method.parameters.is_empty() && method.return_type.is_none() {
        return None;
    }

    let params: Vec<String> = method
        .parameters
        .iter()
        .map(|param| {
            let r#type = param
                .r#type
                .as_deref()
                .map(|t| imports.collapse(t))
                .unwrap_or_else(|| UNTYPED.to_string());
            tag_line("@param", &format!("{} {}", r#type, param.token()))
        })
        .collect();

    let mut groups = TagGroups::new();
    groups.set("@param", align_lines(&params, None));
    if let Some(ret) = &method.return_type {
        groups.set("@return", vec![tag_line("@return", &imports.collapse(ret))]);
    }

    let indent = method.indent();
    let block = assemble(&groups, &METHOD_ORDER)
        .lines()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n");
    Some(block)
}
