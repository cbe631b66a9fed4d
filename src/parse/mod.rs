//! @acp:module "Parser"
//! @acp:summary "Static declaration scanning for PHP class files"
//! @acp:domain parse
//! @acp:layer service
//!
//! Extracts the facts the docblock pipeline needs without executing code:
//! namespace, class head and its doc comment, `use` imports, public
//! properties, public methods with their parameters, and the model's
//! connection/table overrides.
//! Uses regex-based scanning plus a small bracket-aware parameter scanner.

pub mod imports;
pub(crate) mod params;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

pub use imports::ImportTable;

use crate::docblock::{MethodSignature, PropertyFact};
use crate::error::{DocsyncError, Result};

/// Groups: 1=namespace
static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^namespace\s+([A-Za-z0-9_\\]+)\s*;").unwrap()
});

/// Top-level class head, e.g. `final class User`.
/// Groups: 1=class name
static CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:(?:abstract|final|readonly)\s+)*class\s+([A-Za-z_][A-Za-z0-9_]*)\b").unwrap()
});

/// Any type head, used to find the declaring scope of members.
/// Groups: 1=type name
static TYPE_HEAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:(?:abstract|final|readonly)\s+)*(?:class|trait|interface|enum)\s+([A-Za-z_][A-Za-z0-9_]*)\b")
        .unwrap()
});

/// Groups: 1=use clause body
static USE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^use\s+([^;]+);").unwrap()
});

/// Groups: 1=modifiers, 2=type, 3=name
static PROPERTY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]+((?:(?:public|protected|private|static|readonly|var)\s+)+)(?:([?A-Za-z0-9_\\|&]+)\s+)?\$([A-Za-z_][A-Za-z0-9_]*)",
    )
    .unwrap()
});

/// Method head up to the opening parenthesis.
/// Groups: 1=modifiers, 2=name
static METHOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:(?:abstract|final|public|protected|private|static)\s+)*)function\s+&?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(",
    )
    .unwrap()
});

/// Groups: 1=return type
static RETURN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:\s*(\??[A-Za-z0-9_\\|&()]+)").unwrap()
});

static CONNECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*protected\s+(?:\??string\s+)?\$connection\s*=\s*['"]([^'"]+)['"]"#).unwrap()
});

static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*protected\s+(?:\??string\s+)?\$table\s*=\s*['"]([^'"]+)['"]"#).unwrap()
});

/// @acp:summary "Declaration facts of the primary class in a file"
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub path: PathBuf,
    pub namespace: String,
    pub name: String,
    /// Attribute lines (if any) plus the class head, e.g. `final class User`
    pub anchor: String,
    /// Exact source text the class splice replaces: doc, separator, anchor
    pub previous: String,
    /// Whitespace between the doc comment and the anchor
    pub separator: String,
    pub doc: Option<String>,
    pub imports: ImportTable,
    /// Public instance properties in declaration order
    pub properties: Vec<PropertyFact>,
    /// Public methods in declaration order
    pub methods: Vec<MethodSignature>,
    /// `protected $connection` override
    pub connection: Option<String>,
    /// `protected $table` override
    pub table: Option<String>,
    /// Line ending used by the file
    pub newline: &'static str,
}

impl ClassDecl {
    /// Convert `\n` endings of rendered text to the file's line ending
    pub fn with_newlines(&self, text: &str) -> String {
        if self.newline == "\n" {
            text.to_string()
        } else {
            text.replace('\n', self.newline)
        }
    }

    /// Replacement for [`ClassDecl::previous`] given a freshly rendered block
    pub fn class_replacement(&self, block: &str) -> String {
        format!("{}{}{}", self.with_newlines(block), self.separator, self.anchor)
    }
}

/// @acp:summary "Scanner for PHP class files"
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// @acp:summary "Scan source text that was read from `path`"
    pub fn parse_source(&self, path: &Path, content: &str) -> Result<ClassDecl> {
        let malformed = |reason: &str| DocsyncError::MalformedDeclaration {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let namespace = NAMESPACE_PATTERN
            .captures(content)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| malformed("no namespace declaration"))?;
        let head = CLASS_PATTERN
            .captures(content)
            .ok_or_else(|| malformed("no class declaration"))?;
        let head_match = head.get(0).ok_or_else(|| malformed("no class declaration"))?;
        let name = head[1].to_string();
        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

        let anchor_start = attribute_start(content, head_match.start());
        let anchor = content[anchor_start..head_match.end()].to_string();
        let doc = preceding_doc(content, anchor_start);
        let (previous_start, separator) = match doc {
            Some((start, text)) => (start, content[start + text.len()..anchor_start].to_string()),
            None => (anchor_start, newline.to_string()),
        };

        let mut imports = ImportTable::new(&namespace);
        for caps in USE_PATTERN.captures_iter(&content[..head_match.start()]) {
            imports.add_use(&caps[1]);
        }

        let heads: Vec<(usize, String)> = TYPE_HEAD_PATTERN
            .captures_iter(content)
            .filter_map(|caps| Some((caps.get(0)?.start(), caps[1].to_string())))
            .collect();

        let properties = scan_properties(content, &heads, &name);
        let methods = scan_methods(content, &heads);

        Ok(ClassDecl {
            path: path.to_path_buf(),
            namespace,
            name,
            previous: content[previous_start..head_match.end()].to_string(),
            separator,
            doc: doc.map(|(_, text)| text.to_string()),
            anchor,
            imports,
            properties,
            methods,
            connection: CONNECTION_PATTERN.captures(content).map(|c| c[1].to_string()),
            table: TABLE_PATTERN.captures(content).map(|c| c[1].to_string()),
            newline,
        })
    }
}

/// Name of the type whose head most recently precedes `offset`
fn scope_at(heads: &[(usize, String)], offset: usize) -> &str {
    heads
        .iter()
        .take_while(|(start, _)| *start < offset)
        .last()
        .map(|(_, name)| name.as_str())
        .unwrap_or("")
}

fn scan_properties(content: &str, heads: &[(usize, String)], class: &str) -> Vec<PropertyFact> {
    PROPERTY_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let modifiers: Vec<&str> = caps[1].split_whitespace().collect();
            let public = modifiers.iter().any(|m| matches!(*m, "public" | "var"));
            if !public || modifiers.contains(&"static") {
                return None;
            }
            if scope_at(heads, caps.get(0)?.start()) != class {
                return None;
            }
            let r#type = caps.get(2).map(|m| m.as_str()).unwrap_or("mixed");
            Some(PropertyFact::new(&caps[3], r#type))
        })
        .collect()
}

fn scan_methods(content: &str, heads: &[(usize, String)]) -> Vec<MethodSignature> {
    let mut methods = Vec::new();

    for caps in METHOD_PATTERN.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let modifiers = &caps[1];
        if modifiers.contains("private") || modifiers.contains("protected") {
            continue;
        }
        let name = caps[2].to_string();

        let open = whole.end() - 1;
        let Some(close) = params::matching_paren(content, open) else {
            tracing::debug!("Unbalanced parameter list for {}", name);
            continue;
        };
        let raw_params = params::split_parameters(&content[open + 1..close]);
        let parameters: Vec<_> = raw_params.iter().filter_map(|raw| params::parse_parameter(raw)).collect();
        if parameters.len() != raw_params.len() {
            tracing::debug!("Could not read every parameter of {}, skipping", name);
            continue;
        }
        let return_type = RETURN_PATTERN
            .captures(&content[close + 1..])
            .map(|c| c[1].to_string());

        let decl_start = line_start(content, whole.start());
        let decl_end = line_end(content, decl_start);
        let anchor_start = attribute_start(content, decl_start);

        methods.push(MethodSignature {
            name,
            parameters,
            return_type,
            declaration_line: content[decl_start..decl_end].to_string(),
            anchor: content[anchor_start..decl_end].to_string(),
            doc: preceding_doc(content, anchor_start).map(|(_, text)| text.to_string()),
            declaring_class: scope_at(heads, decl_start).to_string(),
        });
    }

    methods
}

fn line_start(content: &str, offset: usize) -> usize {
    content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// End of the line starting at `start`, excluding `\r\n`
fn line_end(content: &str, start: usize) -> usize {
    let end = content[start..].find('\n').map(|i| start + i).unwrap_or(content.len());
    if content[..end].ends_with('\r') {
        end - 1
    } else {
        end
    }
}

/// Start of the run of `#[...]` attribute lines directly above `line`
fn attribute_start(content: &str, line: usize) -> usize {
    let mut start = line;
    while start > 0 {
        let prev = line_start(content, start - 1);
        let text = content[prev..start].trim();
        if text.starts_with("#[") && text.ends_with(']') {
            start = prev;
        } else {
            break;
        }
    }
    start
}

/// Doc comment separated from `anchor_start` by whitespace only
fn preceding_doc(content: &str, anchor_start: usize) -> Option<(usize, &str)> {
    let before = content[..anchor_start].trim_end();
    if !before.ends_with("*/") {
        return None;
    }
    let start = before.rfind("/**")?;
    let text = &before[start..];
    if text.len() < 5 || text[..text.len() - 2].contains("*/") {
        return None;
    }
    Some((start, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTROLLER: &str = r#"<?php

namespace App\Http\Controllers;

use Illuminate\Http\Request;
use App\Models\User;

/**
 * Handles users.
 */
#[Middleware('auth')]
final class UserController extends Controller
{
    public ?string $title;
    public static int $count = 0;
    protected int $hidden;
    public $loose;

    /**
     * Documented.
     */
    public function index(): void
    {
    }

    public function store(Request $request, int $id = 5): \Illuminate\Http\JsonResponse
    {
        $fn = function ($x) { return $x; };
    }

    private function secret(int $a): int
    {
    }

    #[Route('/show')]
    public function show(
        User $user,
        array $options = ['a', 'b'],
    ) {
    }
}
"#;

    fn parse(content: &str) -> Result<ClassDecl> {
        Parser::new().parse_source(Path::new("UserController.php"), content)
    }

    #[test]
    fn test_class_head_doc_and_anchor() {
        let decl = parse(CONTROLLER).unwrap();
        assert_eq!(decl.namespace, "App\\Http\\Controllers");
        assert_eq!(decl.name, "UserController");
        assert_eq!(decl.anchor, "#[Middleware('auth')]\nfinal class UserController");
        assert_eq!(decl.doc.as_deref(), Some("/**\n * Handles users.\n */"));
        assert_eq!(
            decl.previous,
            "/**\n * Handles users.\n */\n#[Middleware('auth')]\nfinal class UserController"
        );
        assert_eq!(decl.separator, "\n");
        assert!(CONTROLLER.contains(&decl.previous));
        assert_eq!(decl.imports.len(), 2);
    }

    #[test]
    fn test_public_instance_properties() {
        let decl = parse(CONTROLLER).unwrap();
        assert_eq!(
            decl.properties,
            vec![PropertyFact::new("title", "?string"), PropertyFact::new("loose", "mixed")]
        );
    }

    #[test]
    fn test_public_methods() {
        let decl = parse(CONTROLLER).unwrap();
        let names: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["index", "store", "show"]);

        let index = &decl.methods[0];
        assert!(index.doc.is_some());

        let store = &decl.methods[1];
        assert_eq!(store.parameters.len(), 2);
        assert_eq!(store.return_type.as_deref(), Some("\\Illuminate\\Http\\JsonResponse"));
        assert_eq!(
            store.declaration_line,
            "    public function store(Request $request, int $id = 5): \\Illuminate\\Http\\JsonResponse"
        );
        assert_eq!(store.indent(), "    ");
        assert_eq!(store.declaring_class, "UserController");
        assert!(store.doc.is_none());

        let show = &decl.methods[2];
        assert_eq!(show.parameters.len(), 2);
        assert!(show.return_type.is_none());
        assert_eq!(show.anchor, "    #[Route('/show')]\n    public function show(");
    }

    #[test]
    fn test_model_overrides() {
        let source = "<?php\n\nnamespace App\\Models;\n\nclass Post extends Model\n{\n    protected $connection = 'archive';\n    protected $table = 'blog_posts';\n}\n";
        let decl = parse(source).unwrap();
        assert_eq!(decl.connection.as_deref(), Some("archive"));
        assert_eq!(decl.table.as_deref(), Some("blog_posts"));
        assert!(decl.doc.is_none());
        assert_eq!(decl.previous, "class Post");
    }

    #[test]
    fn test_missing_namespace_is_malformed() {
        let err = parse("<?php\nclass Foo {}\n").unwrap_err();
        assert!(matches!(err, DocsyncError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_missing_class_is_malformed() {
        let err = parse("<?php\nnamespace App;\nfunction helper() {}\n").unwrap_err();
        assert!(matches!(err, DocsyncError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_plain_block_comment_is_not_a_doc() {
        let source = "<?php\nnamespace App;\n/** file doc */\nuse Foo;\n/* not a doc */\nclass Bar {}\n";
        let decl = parse(source).unwrap();
        assert!(decl.doc.is_none());
    }

    #[test]
    fn test_crlf_sources() {
        let source = "<?php\r\nnamespace App;\r\n\r\nclass Bar\r\n{\r\n    public function go(int $a)\r\n    {\r\n    }\r\n}\r\n";
        let decl = parse(source).unwrap();
        assert_eq!(decl.newline, "\r\n");
        assert_eq!(decl.methods[0].declaration_line, "    public function go(int $a)");
        assert_eq!(decl.with_newlines("a\nb"), "a\r\nb");
    }
}
