//! `ng-watch="<watch>: <action>; <watch>: <action>"`
//!
//! Each action runs when its watched expression changes after the first
//! update. Separators inside quotes, parentheses, brackets or braces do not
//! count, so a ternary watch expression needs parentheses.

use std::rc::Rc;

use frieze_armature::parse_expression;
use frieze_croquis::ScopeId;
use frieze_fresco::NodeId;
use frieze_relief::{Expr, Value};

use super::NG_WATCH;
use crate::compile::CompileContext;
use crate::error::{AtelierError, Result};
use crate::registry::Activation;
use crate::runtime::Runtime;

pub(super) fn watch(
    _ctx: &mut CompileContext<'_>,
    expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    let pairs = parse_watch_list(expression)?;
    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, _: NodeId| -> Result<()> {
            for (watched, action) in &pairs {
                let action = action.clone();
                let mut primed = false;
                let on_change = move |rt: &mut Runtime, scope: ScopeId, _: &Value| -> Result<()> {
                    // the first pass only records the initial value
                    if !primed {
                        primed = true;
                        return Ok(());
                    }
                    rt.scopes.eval_expr(scope, &action)?;
                    Ok(())
                };
                rt.scopes
                    .watch_expr(scope, watched.clone(), Box::new(on_change))?;
            }
            Ok(())
        },
    )))
}

fn parse_watch_list(expression: &str) -> Result<Vec<(Expr, Expr)>> {
    let mut pairs = Vec::new();
    for entry in split_top_level(expression, ';') {
        if entry.trim().is_empty() {
            continue;
        }
        let parts = split_top_level(entry, ':');
        let [watched, _, ..] = parts.as_slice() else {
            return Err(AtelierError::directive_parse(
                NG_WATCH,
                expression,
                format!("`{}` is missing `: <action>`", entry.trim()),
            ));
        };
        let action = &entry[watched.len() + 1..];
        pairs.push((
            parse_expression(watched.trim())?,
            parse_expression(action.trim())?,
        ));
    }
    Ok(pairs)
}

/// Split at `sep` where it is not nested in quotes or brackets.
fn split_top_level(source: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(&source[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("a: b = 1; c: d = ';'", ';'),
            vec!["a: b = 1", " c: d = ';'"]
        );
        assert_eq!(
            split_top_level("(a ? b : c): x = {k: 1}", ':'),
            vec!["(a ? b : c)", " x = {k: 1}"]
        );
    }

    #[test]
    fn test_parse_watch_list() {
        let pairs = parse_watch_list("book.title: count = count + 1; shelf: seen = true;").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.to_string(), "book.title");
        assert_eq!(pairs[0].1.to_string(), "count = (count + 1)");
        assert_eq!(pairs[1].0.to_string(), "shelf");

        // the action keeps its own colons
        let pairs = parse_watch_list("x: y = x ? 1 : 2").unwrap();
        assert_eq!(pairs[0].1.to_string(), "y = (x ? 1 : 2)");
    }

    #[test]
    fn test_parse_watch_list_errors() {
        assert!(matches!(
            parse_watch_list("book.title"),
            Err(AtelierError::DirectiveParse { directive: "ng-watch", .. })
        ));
        assert!(matches!(
            parse_watch_list("a: b +"),
            Err(AtelierError::Eval(_))
        ));
    }
}
