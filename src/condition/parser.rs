// SPDX-License-Identifier: MIT

//! Condition text parser
//!
//! Parses expressions like:
//! - `blessing == 1`
//! - `span >= 3 and version != 'v0'`
//! - `not (accuracy < threshold or loss > 0.5)`
//!
//! Names on either side of a comparison resolve to placeholders through
//! [`Bindings`]. `or` binds loosest, then `and`, then `not`. Both binary
//! operators are left-associative, so `a and b and c` nests as
//! `(a and b) and c`.

use std::collections::HashMap;

use super::ast::{CompareOp, Literal, Operand};
use super::predicate::Predicate;
use crate::error::{ConditionError, Result};
use crate::placeholder::PlaceholderRef;

/// Names that condition text may refer to
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    placeholders: HashMap<String, PlaceholderRef>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a placeholder, replacing any previous binding
    pub fn insert(&mut self, name: impl Into<String>, placeholder: impl Into<PlaceholderRef>) {
        self.placeholders.insert(name.into(), placeholder.into());
    }

    pub fn get(&self, name: &str) -> Option<&PlaceholderRef> {
        self.placeholders.get(name)
    }

    fn resolve(&self, name: &str) -> Result<PlaceholderRef> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ConditionError::unknown_binding(name))
    }
}

/// Parse a condition expression string into a predicate
pub fn parse(input: &str, bindings: &Bindings) -> Result<Predicate> {
    check_balanced(input)?;
    parse_expression(input, bindings)
}

fn parse_expression(input: &str, bindings: &Bindings) -> Result<Predicate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ConditionError::parse("Empty condition"));
    }

    if let Some((left, right)) = split_at_keyword(input, "or") {
        let left = parse_expression(left, bindings)?;
        let right = parse_expression(right, bindings)?;
        return Ok(left.logical_or(&right));
    }

    if let Some((left, right)) = split_at_keyword(input, "and") {
        let left = parse_expression(left, bindings)?;
        let right = parse_expression(right, bindings)?;
        return Ok(left.logical_and(&right));
    }

    if let Some(rest) = strip_not(input) {
        return Ok(parse_expression(rest, bindings)?.negated());
    }

    if let Some(inner) = strip_enclosing_parens(input) {
        return parse_expression(inner, bindings);
    }

    parse_comparison(input, bindings)
}

/// Walk `input` outside of quoted strings, reporting each char with the
/// parenthesis depth it sits at.
fn scan_top_level(input: &str, mut visit: impl FnMut(usize, char, i32)) {
    let mut depth = 0;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => {
                visit(i, c, depth);
                depth += 1;
            }
            ')' => {
                depth -= 1;
                visit(i, c, depth);
            }
            _ => visit(i, c, depth),
        }
    }
}

fn check_balanced(input: &str) -> Result<()> {
    let mut depth = 0;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ConditionError::parse(format!(
                        "Unbalanced ')' in condition: {}",
                        input
                    )));
                }
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err(ConditionError::parse(format!(
            "Unterminated string in condition: {}",
            input
        )));
    }
    if depth != 0 {
        return Err(ConditionError::parse(format!(
            "Unbalanced '(' in condition: {}",
            input
        )));
    }
    Ok(())
}

fn is_boundary(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_whitespace() || c == '(' || c == ')')
}

/// Split at the last top-level occurrence of a binary keyword
fn split_at_keyword<'a>(input: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let mut found = None;

    scan_top_level(input, |i, _, depth| {
        if depth != 0 || !input[i..].starts_with(keyword) {
            return;
        }
        let before = input[..i].chars().next_back();
        let after = input[i + keyword.len()..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            found = Some(i);
        }
    });

    found.map(|i| (&input[..i], &input[i + keyword.len()..]))
}

fn strip_not(input: &str) -> Option<&str> {
    let rest = input.strip_prefix("not")?;
    if is_boundary(rest.chars().next()) {
        Some(rest)
    } else {
        None
    }
}

/// Returns the inside of `( ... )` when the parentheses wrap the whole input
fn strip_enclosing_parens(input: &str) -> Option<&str> {
    if !input.starts_with('(') {
        return None;
    }

    let mut closing = None;
    scan_top_level(input, |i, c, depth| {
        if c == ')' && depth == 0 && closing.is_none() {
            closing = Some(i);
        }
    });

    match closing {
        Some(i) if i == input.len() - 1 => Some(&input[1..i]),
        _ => None,
    }
}

fn find_compare_op(input: &str) -> Option<(usize, CompareOp, usize)> {
    let mut found = None;

    scan_top_level(input, |i, c, _| {
        if found.is_some() {
            return;
        }
        let rest = &input[i..];
        found = match c {
            '=' if rest.starts_with("==") => Some((i, CompareOp::Equal, 2)),
            '!' if rest.starts_with("!=") => Some((i, CompareOp::NotEqual, 2)),
            '<' if rest.starts_with("<=") => Some((i, CompareOp::LessThanOrEqual, 2)),
            '<' => Some((i, CompareOp::LessThan, 1)),
            '>' if rest.starts_with(">=") => Some((i, CompareOp::GreaterThanOrEqual, 2)),
            '>' => Some((i, CompareOp::GreaterThan, 1)),
            _ => None,
        };
    });

    found
}

fn parse_comparison(input: &str, bindings: &Bindings) -> Result<Predicate> {
    let (pos, op, len) = find_compare_op(input)
        .ok_or_else(|| ConditionError::parse(format!("Could not parse condition: {}", input)))?;

    let left = input[..pos].trim();
    let right = input[pos + len..].trim();

    if !is_name(left) {
        return Err(ConditionError::parse(format!(
            "Left side of '{}' must be a bound name, got '{}'",
            op, left
        )));
    }
    let left = bindings.resolve(left)?;
    let right = parse_operand(right, bindings)?;

    Ok(Predicate::from_comparison(op, left, right))
}

fn is_name(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
}

fn parse_operand(input: &str, bindings: &Bindings) -> Result<Operand> {
    if input.is_empty() {
        return Err(ConditionError::parse("Missing right side of comparison"));
    }

    // String (single or double quotes), closed by the last character
    if let Some(quote) = input.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let body = &input[1..];
        return match body.find(quote) {
            Some(end) if end == body.len() - 1 => {
                Ok(Literal::String(body[..end].to_string()).into())
            }
            _ => Err(ConditionError::parse(format!(
                "Malformed string literal: {}",
                input
            ))),
        };
    }

    if matches!(input, "true" | "false" | "null") {
        return Err(ConditionError::argument_type(format!(
            "'{}' is not an int, float or string literal",
            input
        )));
    }

    // Number
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.') {
        if let Ok(i) = input.parse::<i64>() {
            return Ok(Literal::Int(i).into());
        }
        if let Ok(f) = input.parse::<f64>() {
            return Ok(Literal::float(f)?.into());
        }
        return Err(ConditionError::parse(format!(
            "Could not parse number: {}",
            input
        )));
    }

    if is_name(input) {
        return Ok(Operand::Placeholder(bindings.resolve(input)?));
    }

    Err(ConditionError::parse(format!(
        "Could not parse operand: {}",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpressionError;
    use crate::placeholder::EncodedPlaceholder;
    use serde_json::{json, Value};

    fn bindings() -> Bindings {
        let mut bindings = Bindings::new();
        for name in ["span", "version", "blessing", "accuracy", "threshold", "brand"] {
            bindings.insert(name, EncodedPlaceholder::new(json!({"ph": name})).into_ref());
        }
        bindings
    }

    fn ph(name: &str) -> Value {
        json!({"ph": name})
    }

    fn parsed(input: &str) -> Value {
        parse(input, &bindings()).unwrap().to_serializable()
    }

    #[test]
    fn test_parse_simple_equality() {
        assert_eq!(
            parsed("version == 'v1'"),
            json!({"cmp_op": "EQUAL", "left": ph("version"), "right": "v1"})
        );
    }

    #[test]
    fn test_parse_all_operators() {
        let cases = [
            ("span == 1", "EQUAL"),
            ("span != 1", "NOT_EQUAL"),
            ("span < 1", "LESS_THAN"),
            ("span <= 1", "LESS_THAN_OR_EQUAL"),
            ("span > 1", "GREATER_THAN"),
            ("span >= 1", "GREATER_THAN_OR_EQUAL"),
        ];
        for (input, tag) in cases {
            assert_eq!(parsed(input)["cmp_op"], tag, "input: {}", input);
        }
    }

    #[test]
    fn test_parse_numeric_literals() {
        assert_eq!(parsed("span > 3")["right"], json!(3));
        assert_eq!(parsed("span > -3")["right"], json!(-3));
        assert_eq!(parsed("accuracy >= 0.8")["right"], json!(0.8));
    }

    #[test]
    fn test_parse_placeholder_on_right() {
        assert_eq!(
            parsed("accuracy > threshold"),
            json!({"cmp_op": "GREATER_THAN", "left": ph("accuracy"), "right": ph("threshold")})
        );
    }

    #[test]
    fn test_parse_double_quotes() {
        assert_eq!(parsed(r#"version == "v1""#)["right"], "v1");
    }

    #[test]
    fn test_operators_inside_strings_are_ignored() {
        assert_eq!(
            parsed("version == 'a and b or not c >= d'"),
            json!({"cmp_op": "EQUAL", "left": ph("version"), "right": "a and b or not c >= d"})
        );
    }

    #[test]
    fn test_parse_and_or_precedence() {
        let c = |name: &str, n: i64| json!({"cmp_op": "EQUAL", "left": ph(name), "right": n});
        assert_eq!(
            parsed("span == 1 or span == 2 and version == 3"),
            json!({
                "logical_op": "or",
                "left": c("span", 1),
                "right": {"logical_op": "and", "left": c("span", 2), "right": c("version", 3)},
            })
        );
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        let c = |n: i64| json!({"cmp_op": "EQUAL", "left": ph("span"), "right": n});
        assert_eq!(
            parsed("span == 1 and span == 2 and span == 3"),
            json!({
                "logical_op": "and",
                "left": {"logical_op": "and", "left": c(1), "right": c(2)},
                "right": c(3),
            })
        );
    }

    #[test]
    fn test_parse_not_and_parentheses() {
        let c = |name: &str, n: i64| json!({"cmp_op": "LESS_THAN", "left": ph(name), "right": n});
        assert_eq!(
            parsed("not (span < 1 or blessing < 2)"),
            json!({
                "logical_op": "not",
                "left": {"logical_op": "or", "left": c("span", 1), "right": c("blessing", 2)},
                "right": null,
            })
        );
        assert_eq!(
            parsed("not span < 1 and blessing < 2"),
            json!({
                "logical_op": "and",
                "left": {"logical_op": "not", "left": c("span", 1), "right": null},
                "right": c("blessing", 2),
            })
        );
    }

    #[test]
    fn test_keywords_inside_names_are_not_split() {
        assert_eq!(
            parsed("brand == 'x'"),
            json!({"cmp_op": "EQUAL", "left": ph("brand"), "right": "x"})
        );
    }

    #[test]
    fn test_unknown_binding() {
        let result = parse("missing == 1", &bindings());
        assert!(matches!(
            result,
            Err(ConditionError::UnknownBinding { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_boolean_and_null_literals_are_rejected() {
        for input in ["blessing == true", "blessing == false", "blessing == null"] {
            assert!(matches!(
                parse(input, &bindings()),
                Err(ConditionError::Expression(ExpressionError::ArgumentType(_)))
            ));
        }
    }

    #[test]
    fn test_literal_on_left_is_rejected() {
        assert!(matches!(
            parse("5 == span", &bindings()),
            Err(ConditionError::Parse(_))
        ));
    }

    #[test]
    fn test_non_finite_float_literals_are_rejected() {
        for input in ["span > 1e400", "span > -1e400", "accuracy == 1e309 and span == 1"] {
            assert!(
                matches!(
                    parse(input, &bindings()),
                    Err(ConditionError::Expression(ExpressionError::ArgumentType(_)))
                ),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_trailing_text_after_string_is_rejected() {
        for input in ["span == 'a' 'b'", r#"span == "a"b""#, "span == 'a'b", "span == 'a' and"] {
            assert!(
                matches!(parse(input, &bindings()), Err(ConditionError::Parse(_))),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_empty_string_literal() {
        assert_eq!(parsed("version == ''")["right"], "");
    }

    #[test]
    fn test_parse_invalid() {
        for input in [
            "",
            "this is not valid",
            "span ==",
            "(span == 1",
            "span == 1)",
            "version == 'v1",
            "span == 1 and",
            "span == 1.2.3",
        ] {
            assert!(parse(input, &bindings()).is_err(), "input: {:?}", input);
        }
    }
}
