//! Static discovery of the controller classes a script declares.

use indexmap::IndexSet;
use regex::Regex;

lazy_static! {
    /// String literals and comments, matched left to right so a comment
    /// marker inside a string (or a quote inside a comment) is not mistaken
    /// for the other.
    static ref NON_CODE: Regex = Regex::new(
        r#"(?s)"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`(?:[^`\\]|\\.)*`|/\*.*?\*/|//[^\n]*"#
    )
    .unwrap();
    static ref CLASS_DECLARATION: Regex =
        Regex::new(r"\bclass\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap();
}

/// Names of the classes declared in `script`, deduplicated, in order of first
/// occurrence. The script is scanned, never executed.
pub fn extract_class_names(script: &str) -> Vec<String> {
    let code = NON_CODE.replace_all(script, " ");
    let names: IndexSet<String> = CLASS_DECLARATION
        .captures_iter(&code)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_classes() {
        assert!(extract_class_names("").is_empty());
        assert!(extract_class_names("function f() { return 1 }").is_empty());
    }

    #[test]
    fn test_order_of_first_occurrence() {
        let script = "class Deal {}\nclass DealProducts extends Base {}\nclass Deal {}";
        assert_eq!(extract_class_names(script), vec!["Deal", "DealProducts"]);
    }

    #[test]
    fn test_ignores_comments() {
        let script = r#"
            // class Commented {}
            /* class Blocked {
               class AlsoBlocked {} */
            class Lead { }
        "#;
        assert_eq!(extract_class_names(script), vec!["Lead"]);
    }

    #[test]
    fn test_ignores_strings() {
        let script = r#"
            class Lead {
                onload() { toast("class Fake loaded // not a comment") }
            }
            const note = 'class Quoted'
            class LeadItems {}
        "#;
        assert_eq!(extract_class_names(script), vec!["Lead", "LeadItems"]);
    }

    #[test]
    fn test_identifier_suffix_is_not_a_keyword() {
        assert!(extract_class_names("let subclass = 1; myclass Foo").is_empty());
    }
}
