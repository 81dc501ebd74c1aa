//! Named-unit extraction from script-language source via tree-sitter.
//!
//! The grammars accept a superset of everyday dialect features (JSX, type
//! annotations), so one pass covers plain and typed sources alike. Each
//! extracted unit keeps the exact source span reported by the parser, so
//! original formatting and comments inside the unit are preserved.

use anyhow::{anyhow, Result};
use tree_sitter::{Node, Parser};

use crate::models::{Snippet, SnippetKind};
use crate::tags;

/// Receiver identifiers conventionally bound to a request router.
const ROUTER_RECEIVERS: &[&str] = &["app", "router"];

/// HTTP verbs recognized on a router receiver.
const ROUTER_VERBS: &[&str] = &["get", "post", "put", "delete", "patch", "head", "options"];

/// Script dialect, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLang {
    JavaScript,
    TypeScript,
    Tsx,
}

impl ScriptLang {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "jsx" => Some(Self::JavaScript),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extract all named units from one source file.
///
/// # Errors
///
/// Returns an error when the grammar cannot be loaded or the source does not
/// parse cleanly; the caller skips the file and continues the walk.
pub fn scan_source(file: &str, source: &str, lang: ScriptLang) -> Result<Vec<Snippet>> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.grammar())
        .map_err(|e| anyhow!("failed to load grammar: {e}"))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow!("parser returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(anyhow!("syntax error"));
    }

    let mut found = Vec::new();
    collect(&mut found, file, source, root);
    Ok(found)
}

/// Depth-first pre-order visit over every named node.
fn collect(out: &mut Vec<Snippet>, file: &str, source: &str, node: Node) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            out.push(function_declaration(file, source, node));
        }
        "variable_declarator" => {
            if let Some(snippet) = variable_binding(file, source, node) {
                out.push(snippet);
            }
        }
        "method_definition" => {
            if let Some(snippet) = method(file, source, node) {
                out.push(snippet);
            }
        }
        "call_expression" => {
            if let Some(snippet) = route_registration(file, source, node) {
                out.push(snippet);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect(out, file, source, child);
    }
}

fn function_declaration(file: &str, source: &str, node: Node) -> Snippet {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(source, n).to_string());
    let code = text(source, node).to_string();

    let mut snippet = Snippet::new(file, name, SnippetKind::FunctionDeclaration);
    snippet.params = unit_params(source, node);
    snippet.tags = tags::infer(snippet.name.as_deref().unwrap_or(""), &code);
    snippet.code = code;
    snippet
}

/// `const foo = (...) => {...}` and `const foo = function (...) {...}`.
/// The snippet spans the declarator (`foo = ...`), keyed by the bound name.
fn variable_binding(file: &str, source: &str, node: Node) -> Option<Snippet> {
    let value = node.child_by_field_name("value")?;
    let kind = match value.kind() {
        "arrow_function" => SnippetKind::ArrowFunction,
        "function_expression" | "generator_function" => SnippetKind::FunctionExpression,
        _ => return None,
    };

    // A destructured binding has no single name to key on.
    let name_node = node.child_by_field_name("name")?;
    if name_node.kind() != "identifier" {
        return None;
    }

    let name = text(source, name_node).to_string();
    let code = text(source, node).to_string();

    let mut snippet = Snippet::new(file, Some(name), kind);
    snippet.params = unit_params(source, value);
    snippet.tags = tags::infer(snippet.name.as_deref().unwrap_or(""), &code);
    snippet.code = code;
    Some(snippet)
}

/// Methods in class bodies (static included) and in object literals.
fn method(file: &str, source: &str, node: Node) -> Option<Snippet> {
    let parent = node.parent()?;
    let kind = match parent.kind() {
        "class_body" => SnippetKind::ClassMethod,
        "object" => SnippetKind::ObjectMethod,
        _ => return None,
    };

    let name_node = node.child_by_field_name("name");
    if name_node.map(|n| n.kind()) == Some("private_property_identifier") {
        return None;
    }
    let name = name_node
        .filter(|n| n.kind() == "property_identifier")
        .map(|n| text(source, n).to_string());

    let code = text(source, node).to_string();

    let mut snippet = Snippet::new(file, name, kind);
    snippet.params = unit_params(source, node);
    snippet.tags = tags::infer(snippet.name.as_deref().unwrap_or(""), &code);
    snippet.code = code;
    Some(snippet)
}

/// `app.get("/path", handler)` and friends: a two-part member call whose
/// receiver is a conventional router name and whose property is an HTTP verb.
fn route_registration(file: &str, source: &str, node: Node) -> Option<Snippet> {
    let callee = node.child_by_field_name("function")?;
    if callee.kind() != "member_expression" {
        return None;
    }

    let object = callee.child_by_field_name("object")?;
    let property = callee.child_by_field_name("property")?;
    if object.kind() != "identifier" || !ROUTER_RECEIVERS.contains(&text(source, object)) {
        return None;
    }
    let verb = text(source, property);
    if !ROUTER_VERBS.contains(&verb) {
        return None;
    }

    let args = node.child_by_field_name("arguments")?;
    if args.kind() != "arguments" {
        return None;
    }
    let mut cursor = args.walk();
    let path = args
        .named_children(&mut cursor)
        .next()
        .map(|arg| literal_string(source, arg))
        .unwrap_or_default();

    let verb = verb.to_uppercase();

    let mut snippet = Snippet::new(file, None, SnippetKind::ApiRoute);
    snippet.code = text(source, node).to_string();
    snippet.tags = tags::route_tags(&verb, &path);
    snippet.verb = Some(verb);
    snippet.path = Some(path);
    Some(snippet)
}

/// Parameter names joined with `", "`. Only plain identifiers contribute
/// their name; patterns, defaults, and rest elements contribute `arg`.
fn unit_params(source: &str, func: Node) -> String {
    if let Some(params) = func.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        let names: Vec<String> = params
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .map(|n| param_name(source, n))
            .collect();
        names.join(", ")
    } else if let Some(single) = func.child_by_field_name("parameter") {
        // Bare single-parameter arrow: `x => ...`
        param_name(source, single)
    } else {
        String::new()
    }
}

fn param_name(source: &str, node: Node) -> String {
    match node.kind() {
        "identifier" => text(source, node).to_string(),
        // TypeScript wraps each parameter; the pattern carries the identifier.
        "required_parameter" | "optional_parameter" => node
            .child_by_field_name("pattern")
            .filter(|p| p.kind() == "identifier")
            .map(|p| text(source, p).to_string())
            .unwrap_or_else(|| "arg".to_string()),
        _ => "arg".to_string(),
    }
}

/// Literal value of a quoted string, or the leading fragment of a template
/// literal; empty for any other expression.
fn literal_string(source: &str, node: Node) -> String {
    match node.kind() {
        "string" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .filter(|n| matches!(n.kind(), "string_fragment" | "escape_sequence"))
                .map(|n| text(source, n))
                .collect()
        }
        "template_string" => {
            let mut cursor = node.walk();
            let result = node.named_children(&mut cursor)
                .find(|n| n.kind() == "string_fragment")
                .map(|n| text(source, n).to_string())
                .unwrap_or_default();
            result
        }
        _ => String::new(),
    }
}

fn text<'a>(source: &'a str, node: Node) -> &'a str {
    &source[node.byte_range()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_js(source: &str) -> Vec<Snippet> {
        scan_source("src/app.js", source, ScriptLang::JavaScript).unwrap()
    }

    #[test]
    fn standalone_function_declaration() {
        let source = "function add(a,b){return a+b;}\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        let s = &found[0];
        assert_eq!(s.kind, SnippetKind::FunctionDeclaration);
        assert_eq!(s.name.as_deref(), Some("add"));
        assert_eq!(s.params, "a, b");
        assert_eq!(s.code, "function add(a,b){return a+b;}");
        assert!(s.tags.is_empty());
    }

    #[test]
    fn code_span_preserves_inner_formatting() {
        let source = "function pad(s) {\n  // left pad\n  return ' ' + s;\n}\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert!(found[0].code.contains("// left pad"));
        assert_eq!(found[0].code, source.trim_end());
    }

    #[test]
    fn arrow_function_spans_declarator() {
        let source = "const makeUser = (name, age) => ({ name, age });\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        let s = &found[0];
        assert_eq!(s.kind, SnippetKind::ArrowFunction);
        assert_eq!(s.name.as_deref(), Some("makeUser"));
        assert_eq!(s.params, "name, age");
        assert_eq!(s.code, "makeUser = (name, age) => ({ name, age })");
    }

    #[test]
    fn bare_parameter_arrow() {
        let source = "let double = x => x * 2;\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].params, "x");
    }

    #[test]
    fn function_expression_binding() {
        let source = "var load = function (id) { return cache[id]; };\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SnippetKind::FunctionExpression);
        assert_eq!(found[0].name.as_deref(), Some("load"));
    }

    #[test]
    fn destructured_binding_is_skipped() {
        let source = "const { name } = () => {};\nconst helper = () => {};\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("helper"));
    }

    #[test]
    fn non_function_binding_is_skipped() {
        let found = scan_js("const limit = 5;\n");
        assert!(found.is_empty());
    }

    #[test]
    fn class_methods_including_static() {
        let source = r#"
class UserService {
  find(id) { return db.get(id); }
  static create() { return new UserService(); }
}
"#;
        let found = scan_js(source);
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|s| s.kind == SnippetKind::ClassMethod));
        assert_eq!(found[0].name.as_deref(), Some("find"));
        assert_eq!(found[1].name.as_deref(), Some("create"));
        assert!(found[0].tags.contains(&"users".to_string()));
    }

    #[test]
    fn object_literal_methods() {
        let source = "const api = {\n  fetchOrders(page) { return []; }\n};\n";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, SnippetKind::ObjectMethod);
        assert_eq!(found[0].name.as_deref(), Some("fetchOrders"));
        assert_eq!(found[0].params, "page");
    }

    #[test]
    fn route_registration_with_string_path() {
        let source = r#"router.get("/users/:id", handler);"#;
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        let s = &found[0];
        assert_eq!(s.kind, SnippetKind::ApiRoute);
        assert_eq!(s.verb.as_deref(), Some("GET"));
        assert_eq!(s.path.as_deref(), Some("/users/:id"));
        assert_eq!(s.tags, vec!["api", "GET", "users"]);
        assert_eq!(s.code, r#"router.get("/users/:id", handler)"#);
        assert!(s.name.is_none());
    }

    #[test]
    fn route_registration_with_template_path() {
        let source = "app.post(`/orders`, createOrder);";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].verb.as_deref(), Some("POST"));
        assert_eq!(found[0].path.as_deref(), Some("/orders"));
        assert_eq!(found[0].tags, vec!["api", "POST", "orders"]);
    }

    #[test]
    fn route_registration_with_non_literal_path() {
        let source = "app.delete(routes.remove, handler);";
        let found = scan_js(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path.as_deref(), Some(""));
        assert_eq!(found[0].tags, vec!["api", "DELETE", ""]);
    }

    #[test]
    fn unknown_receiver_is_not_a_route() {
        let found = scan_js(r#"server.get("/x", h);"#);
        assert!(found.is_empty());
    }

    #[test]
    fn unknown_verb_is_not_a_route() {
        let found = scan_js(r#"app.use("/x", h);"#);
        assert!(found.is_empty());
    }

    #[test]
    fn pattern_params_become_arg() {
        let source = "function f(a, { b }, ...rest) {}\n";
        let found = scan_js(source);
        assert_eq!(found[0].params, "a, arg, arg");
    }

    #[test]
    fn typescript_annotations_are_tolerated() {
        let source = "function greet(name: string, count?: number): void {}\n";
        let found = scan_source("src/greet.ts", source, ScriptLang::TypeScript).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].params, "name, count");
    }

    #[test]
    fn jsx_is_tolerated() {
        let source = "const App = () => <div className=\"app\">hi</div>;\n";
        let found = scan_source("src/App.jsx", source, ScriptLang::JavaScript).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("App"));
    }

    #[test]
    fn nested_functions_are_all_extracted() {
        let source = r#"
function outer() {
  function inner() {}
  return inner;
}
"#;
        let found = scan_js(source);
        let names: Vec<&str> = found.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["outer", "inner"]);
    }

    #[test]
    fn syntax_error_fails_the_file() {
        assert!(scan_source("src/broken.js", "function {{{", ScriptLang::JavaScript).is_err());
    }

    #[test]
    fn tag_inference_runs_on_units() {
        let source = "function getUserOrders(id) { return orders[id]; }\n";
        let found = scan_js(source);
        assert_eq!(found[0].tags, vec!["GET", "users", "orders"]);
    }
}
