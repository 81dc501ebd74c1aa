//! Best-effort tag inference over extracted snippets.
//!
//! [`infer`] runs an ordered list of independent pattern rules over a
//! snippet's name and source text and accumulates every match. Rules never
//! conflict and never suppress each other, so extending the list is additive:
//! existing inputs keep producing the same tags.
//!
//! Route registrations skip inference entirely and get a fixed three-element
//! tag list from [`route_tags`].

use regex::Regex;
use std::sync::LazyLock;

/// Which part of the snippet a rule inspects.
enum RuleInput {
    Name,
    Code,
    NameAndCode,
}

struct TagRule {
    input: RuleInput,
    pattern: Regex,
    tag: &'static str,
}

static RULES: LazyLock<Vec<TagRule>> = LazyLock::new(|| {
    vec![
        TagRule {
            input: RuleInput::Code,
            pattern: Regex::new(r"(?i)(app|router)\.(get|post|put|delete|patch|head|options)")
                .unwrap(),
            tag: "api",
        },
        TagRule {
            input: RuleInput::Name,
            pattern: Regex::new(r"(?i)get").unwrap(),
            tag: "GET",
        },
        TagRule {
            input: RuleInput::Name,
            pattern: Regex::new(r"(?i)post").unwrap(),
            tag: "POST",
        },
        TagRule {
            input: RuleInput::Name,
            pattern: Regex::new(r"(?i)user").unwrap(),
            tag: "users",
        },
        TagRule {
            input: RuleInput::Name,
            pattern: Regex::new(r"(?i)order").unwrap(),
            tag: "orders",
        },
        TagRule {
            input: RuleInput::NameAndCode,
            pattern: Regex::new(r"(?i)auth|login|logout").unwrap(),
            tag: "auth",
        },
    ]
});

/// Derive categorical tags from a snippet's name and source text.
///
/// Pure and deterministic: the same `(name, code)` always yields the same
/// tags, in rule order.
pub fn infer(name: &str, code: &str) -> Vec<String> {
    let combined = format!("{name}{code}");

    RULES
        .iter()
        .filter(|rule| {
            let haystack = match rule.input {
                RuleInput::Name => name,
                RuleInput::Code => code,
                RuleInput::NameAndCode => &combined,
            };
            rule.pattern.is_match(haystack)
        })
        .map(|rule| rule.tag.to_string())
        .collect()
}

/// Synthesized tags for an `api_route` snippet: the literal `api`, the
/// uppercased verb, and the first path segment of the route.
///
/// The third element strips a leading `/` and takes the substring before the
/// next `/`; it is the empty string when the route itself is empty. Empty
/// elements are kept: downstream consumers rely on the positions.
pub fn route_tags(verb: &str, path: &str) -> Vec<String> {
    let segment = if path.is_empty() {
        String::new()
    } else {
        path.strip_prefix('/')
            .unwrap_or(path)
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    };

    vec!["api".to_string(), verb.to_string(), segment]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rules_match() {
        assert!(infer("add", "function add(a,b){return a+b;}").is_empty());
    }

    #[test]
    fn name_rules_are_case_insensitive() {
        assert_eq!(infer("getUser", "function getUser(id) {}"), vec!["GET", "users"]);
        assert_eq!(infer("POSTorder", ""), vec!["POST", "orders"]);
    }

    #[test]
    fn router_call_in_code_emits_api() {
        let code = r#"router.get("/users", handler)"#;
        let tags = infer("register", code);
        assert!(tags.contains(&"api".to_string()));
    }

    #[test]
    fn name_rule_independent_of_api_rule() {
        // A function merely named like a verb gets the verb tag with no router call.
        assert_eq!(infer("getTotal", "return total;"), vec!["GET"]);
    }

    #[test]
    fn auth_matches_name_or_code() {
        assert_eq!(infer("login", ""), vec!["auth"]);
        assert_eq!(infer("check", "if (session.auth) {}"), vec!["auth"]);
    }

    #[test]
    fn infer_is_deterministic() {
        let a = infer("getUserOrders", "app.get('/orders', list)");
        let b = infer("getUserOrders", "app.get('/orders', list)");
        assert_eq!(a, b);
        assert_eq!(a, vec!["api", "GET", "users", "orders"]);
    }

    #[test]
    fn route_tags_first_segment() {
        assert_eq!(route_tags("GET", "/users/:id"), vec!["api", "GET", "users"]);
        assert_eq!(route_tags("POST", "/orders"), vec!["api", "POST", "orders"]);
    }

    #[test]
    fn route_tags_empty_path_keeps_empty_third_element() {
        assert_eq!(route_tags("GET", ""), vec!["api", "GET", ""]);
    }

    #[test]
    fn route_tags_without_leading_slash() {
        assert_eq!(route_tags("PUT", "items/7"), vec!["api", "PUT", "items"]);
    }
}
