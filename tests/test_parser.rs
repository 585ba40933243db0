//! Parser tests over whole controller scripts.

extern crate formscript;

use formscript::controller::extract_class_names;
use formscript::parser::ast::StatementType;
use formscript::parser::{parse_to_token_tree, FormParser};

const LEAD_SCRIPT: &str = r#"
// Lead form behaviour
class Lead {
    status = "Open";

    onLoad() {
        if (!this.doc.lead_owner) {
            this.doc.lead_owner = "Administrator";
        }
    }

    email() {
        if (!this.value.includes("@")) {
            throw { message: "invalid email" };
        }
        toast("email changed from " + this.oldValue);
    }
}

/* the child table needs its own controller */
class LeadProducts {
    qty() {
        const row = this.getRow("products");
        row.amount = row.qty * (row.rate ?? 0);
    }
}

function helper(a, b) {
    return a > b ? a : b;
}
"#;

#[test]
fn test_controller_script_parses() {
    let program = match FormParser::parse_program(LEAD_SCRIPT) {
        Ok(p) => p,
        Err(e) => panic!("{}", e),
    };
    assert_eq!(program.class_names(), vec!["Lead", "LeadProducts"]);
    assert!(matches!(
        program.body.last(),
        Some(StatementType::FunctionDeclaration(f)) if f.name == "helper"
    ));
}

#[test]
fn test_extractor_agrees_with_parser() {
    let program = FormParser::parse_program(LEAD_SCRIPT).unwrap();
    let parsed: Vec<String> = program.class_names().iter().map(|s| s.to_string()).collect();
    assert_eq!(extract_class_names(LEAD_SCRIPT), parsed);
}

#[test]
fn test_token_tree_shows_rules_and_spans() {
    let tree = parse_to_token_tree("class A {}").unwrap();
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines[0], r#"script => (0,10) #"class A {}""#);
    assert_eq!(lines[1], r#"  class_declaration => (0,10) #"class A {}""#);
    assert_eq!(lines[2], r#"    identifier => (6,7) #"A""#);
}

#[test]
fn test_token_tree_reports_parse_errors() {
    let error = parse_to_token_tree("class {").unwrap_err();
    assert!(error.starts_with("Parse error due to"));
}

#[test]
fn test_error_position_is_reported() {
    let error = FormParser::parse_program("class A {\n  onLoad() {\n    let = 1;\n  }\n}").unwrap_err();
    match error.line_col {
        pest::error::LineColLocation::Pos((line, _)) | pest::error::LineColLocation::Span((line, _), _) => {
            assert_eq!(line, 3)
        }
    }
}

#[test]
fn test_semicolons_are_optional() {
    let program = FormParser::parse_program("let a = 1\nlet b = a + 1\nb").unwrap();
    assert_eq!(program.body.len(), 3);
}

#[test]
fn test_empty_script_parses() {
    let program = FormParser::parse_program("  // nothing here\n").unwrap();
    assert!(program.body.is_empty());
    assert!(program.class_names().is_empty());
}
