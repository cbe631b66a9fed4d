//! @acp:module "Import Table"
//! @acp:summary "Collapse fully-qualified type names to their imported short form"
//! @acp:domain parse
//! @acp:layer service

/// @acp:summary "`use` clauses and namespace of one source file"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    namespace: String,
    /// (fully-qualified name, local alias)
    imports: Vec<(String, String)>,
}

impl ImportTable {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.trim_matches('\\').to_string(),
            imports: Vec::new(),
        }
    }

    /// Register the body of a `use ...;` statement.
    ///
    /// Handles `A\B`, `A\B as C` and group clauses `A\{B, C as D}`.
    /// Function and constant imports are ignored.
    pub fn add_use(&mut self, clause: &str) {
        let clause = clause.trim();
        if clause.starts_with("function ") || clause.starts_with("const ") {
            return;
        }

        if let Some((prefix, group)) = clause.split_once('{') {
            let prefix = prefix.trim().trim_end_matches('\\');
            for item in group.trim_end_matches('}').split(',') {
                let item = item.trim();
                if !item.is_empty() {
                    self.add_single(&format!("{}\\{}", prefix, item));
                }
            }
        } else {
            self.add_single(clause);
        }
    }

    fn add_single(&mut self, clause: &str) {
        let (full, alias) = match clause.split_once(" as ") {
            Some((full, alias)) => (full.trim(), alias.trim().to_string()),
            None => {
                let full = clause.trim();
                let short = full.rsplit('\\').next().unwrap_or(full).to_string();
                (full, short)
            }
        };
        let full = full.trim_start_matches('\\');
        if !full.is_empty() && !alias.is_empty() {
            self.imports.push((full.to_string(), alias));
        }
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// @acp:summary "Shorten every class name inside a type expression"
    ///
    /// Nullable, union and intersection types are handled part by part.
    /// Names that match no import keep their original spelling.
    pub fn collapse(&self, r#type: &str) -> String {
        let (nullable, body) = match r#type.trim().strip_prefix('?') {
            Some(rest) => ("?", rest),
            None => ("", r#type.trim()),
        };

        let mut out = String::from(nullable);
        let mut part = String::new();
        for ch in body.chars() {
            if matches!(ch, '|' | '&' | '(' | ')') {
                out.push_str(&self.collapse_name(&part));
                out.push(ch);
                part.clear();
            } else {
                part.push(ch);
            }
        }
        out.push_str(&self.collapse_name(&part));
        out
    }

    fn collapse_name(&self, name: &str) -> String {
        let bare = name.trim_start_matches('\\');
        if bare.is_empty() {
            return name.to_string();
        }

        for (full, alias) in &self.imports {
            if bare == full {
                return alias.clone();
            }
            if let Some(rest) = bare.strip_prefix(full.as_str()).and_then(|r| r.strip_prefix('\\')) {
                return format!("{}\\{}", alias, rest);
            }
        }

        if !self.namespace.is_empty() {
            if let Some(rest) = bare
                .strip_prefix(self.namespace.as_str())
                .and_then(|r| r.strip_prefix('\\'))
            {
                if !rest.contains('\\') {
                    return rest.to_string();
                }
            }
        }

        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ImportTable {
        let mut table = ImportTable::new("App\\Http\\Controllers");
        table.add_use("Illuminate\\Http\\Request");
        table.add_use("Illuminate\\Support\\Collection as Bag");
        table.add_use("App\\Models\\{User, Post as Article}");
        table.add_use("function App\\helper");
        table
    }

    #[test]
    fn test_registers_plain_alias_and_group_imports() {
        assert_eq!(table().len(), 4);
    }

    #[test]
    fn test_collapse_exact_import() {
        let t = table();
        assert_eq!(t.collapse("\\Illuminate\\Http\\Request"), "Request");
        assert_eq!(t.collapse("Illuminate\\Http\\Request"), "Request");
        assert_eq!(t.collapse("Illuminate\\Support\\Collection"), "Bag");
        assert_eq!(t.collapse("App\\Models\\Post"), "Article");
    }

    #[test]
    fn test_collapse_own_namespace() {
        assert_eq!(table().collapse("App\\Http\\Controllers\\Helper"), "Helper");
        assert_eq!(
            table().collapse("App\\Http\\Controllers\\Admin\\Helper"),
            "App\\Http\\Controllers\\Admin\\Helper"
        );
    }

    #[test]
    fn test_collapse_compound_types() {
        let t = table();
        assert_eq!(t.collapse("?\\App\\Models\\User"), "?User");
        assert_eq!(t.collapse("Illuminate\\Http\\Request|int|null"), "Request|int|null");
    }

    #[test]
    fn test_unknown_names_untouched() {
        let t = table();
        assert_eq!(t.collapse("int"), "int");
        assert_eq!(t.collapse("\\Carbon\\Carbon"), "\\Carbon\\Carbon");
    }
}
