use ::errors::LoxErrors;
use itertools::Itertools;
use lazy_regex::regex;
use parser::Parser;
use test_suite_proc_macro::generate_tests;

use pretty_assertions::assert_eq;

/// Runs `code` through the scanner and parser and checks the result against
/// the expectations embedded in its comments:
///
/// - `// expect: <tree>` for the printed syntax tree
/// - `// Error...` for a diagnostic on the same line
/// - `// [line N] Error...` for a diagnostic on another line
pub fn lox_expect(code: &str) {
    let mut expected_errors = vec![];
    let mut expected_output = vec![];

    let error_regex = regex!(r"// (Error( at '.*'| at end)?: .*)");
    let error_on_line_regex = regex!(r"// \[line (\d+)\] (Error.*)");
    let output_regex = regex!(r"// expect: (.*)");

    for (i, line) in code.lines().enumerate() {
        if let Some(cap) = error_on_line_regex.captures(line) {
            expected_errors.push(format!("[line {}] {}", &cap[1], &cap[2]));
        } else if let Some(cap) = error_regex.captures(line) {
            expected_errors.push(format!("[line {}] {}", i + 1, &cap[1]));
        } else if let Some(cap) = output_regex.captures(line) {
            expected_output.push(cap[1].to_string());
        }
    }

    assert!(
        expected_errors.is_empty() || expected_output.is_empty(),
        "Can't expect a tree when there are errors."
    );

    let mut errors = LoxErrors::default();
    let tokens = scanner::tokenize(code, &mut errors);
    let result = if errors.is_empty() { Parser::new(&tokens).parse() } else { Err(errors) };

    match result {
        Ok(expr) => {
            assert!(expected_errors.is_empty(), "Expected errors but none occurred");
            assert_eq!(expected_output, vec![expr.to_string()]);
        }
        Err(errors) => {
            assert!(expected_output.is_empty(), "Unexpected errors:\n{errors}");
            assert_eq!(errors.iter().map(|e| e.to_string()).collect_vec(), expected_errors);
        }
    }
}

generate_tests!();
