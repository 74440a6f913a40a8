//! Expression evaluation.
//!
//! Reads borrow from the environment where they can (a bare property path
//! never clones the collection it walks through). Assignments need mutable
//! access and are only valid as statements, the value of an `=` or a
//! ternary branch.

use std::borrow::Cow;

use frieze_relief::{
    number_value, BinaryOp, EvalError, EvalResult, Expr, Map, UnaryOp, Value, ValueExt,
};

/// Variable bindings an expression is evaluated against.
pub trait Environment {
    /// Resolve a variable.
    fn lookup(&self, name: &str) -> Option<&Value>;

    /// Bind a variable.
    fn assign(&mut self, name: &str, value: Value) -> EvalResult<()>;
}

impl Environment for Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        self.insert(name.to_string(), value);
        Ok(())
    }
}

/// Evaluate an expression, performing any assignments it contains.
pub fn evaluate<E: Environment + ?Sized>(expr: &Expr, env: &mut E) -> EvalResult<Value> {
    match expr {
        Expr::Assign { target, value } => {
            let value = evaluate(value, env)?;
            assign(target, value.clone(), env)?;
            Ok(value)
        }
        Expr::Sequence(statements) => {
            let mut last = Value::Null;
            for statement in statements {
                last = evaluate(statement, env)?;
            }
            Ok(last)
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if read(test, &*env)?.is_truthy() {
                evaluate(consequent, env)
            } else {
                evaluate(alternate, env)
            }
        }
        _ => read(expr, &*env).map(Cow::into_owned),
    }
}

/// Evaluate an expression without side effects.
///
/// Fails with [`EvalError::InvalidAssignment`] if an assignment is reached.
pub fn read<'e, E: Environment + ?Sized>(expr: &Expr, env: &'e E) -> EvalResult<Cow<'e, Value>> {
    match expr {
        Expr::Literal(value) => Ok(Cow::Owned(value.clone())),
        Expr::Ident(name) => env
            .lookup(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| EvalError::undefined(name.as_str())),
        Expr::Member { object, property } => {
            let base = read(object, env)?;
            child(base, property).ok_or_else(|| EvalError::undefined(expr.to_string()))
        }
        Expr::Index { object, index } => {
            let base = read(object, env)?;
            let key = read(index, env)?;
            let found = match key.as_ref() {
                Value::String(name) => child(base, name),
                Value::Number(n) => match n.as_u64() {
                    Some(i) => element(base, i as usize),
                    None => None,
                },
                other => {
                    return Err(EvalError::Type(format!(
                        "cannot index with {}",
                        other.type_name()
                    )))
                }
            };
            found.ok_or_else(|| EvalError::undefined(expr.to_string()))
        }
        Expr::Array(items) => items
            .iter()
            .map(|item| read(item, env).map(Cow::into_owned))
            .collect::<EvalResult<Vec<_>>>()
            .map(|items| Cow::Owned(Value::Array(items))),
        Expr::Object(members) => {
            let mut map = Map::new();
            for (key, value) in members {
                map.insert(key.to_string(), read(value, env)?.into_owned());
            }
            Ok(Cow::Owned(Value::Object(map)))
        }
        Expr::Unary { op, operand } => {
            let value = read(operand, env)?;
            unary(*op, &value).map(Cow::Owned)
        }
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            let left = read(left, env)?;
            if left.is_truthy() {
                read(right, env)
            } else {
                Ok(left)
            }
        }
        Expr::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => {
            let left = read(left, env)?;
            if left.is_truthy() {
                Ok(left)
            } else {
                read(right, env)
            }
        }
        Expr::Binary { op, left, right } => {
            let left = read(left, env)?;
            let right = read(right, env)?;
            binary(*op, &left, &right).map(Cow::Owned)
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if read(test, env)?.is_truthy() {
                read(consequent, env)
            } else {
                read(alternate, env)
            }
        }
        Expr::Assign { .. } | Expr::Sequence(_) => {
            Err(EvalError::InvalidAssignment(expr.to_string()))
        }
    }
}

/// Property of an object, or `length` of an array/string.
fn child<'e>(base: Cow<'e, Value>, property: &str) -> Option<Cow<'e, Value>> {
    match base {
        Cow::Borrowed(value) => property_of(value, property),
        Cow::Owned(value) => property_of(&value, property).map(|v| Cow::Owned(v.into_owned())),
    }
}

fn property_of<'v>(value: &'v Value, property: &str) -> Option<Cow<'v, Value>> {
    match value {
        Value::Object(map) => map.get(property).map(Cow::Borrowed),
        Value::Array(items) if property == "length" => Some(Cow::Owned(Value::from(items.len()))),
        Value::String(s) if property == "length" => {
            Some(Cow::Owned(Value::from(s.chars().count())))
        }
        _ => None,
    }
}

fn element<'e>(base: Cow<'e, Value>, index: usize) -> Option<Cow<'e, Value>> {
    match base {
        Cow::Borrowed(Value::Array(items)) => items.get(index).map(Cow::Borrowed),
        Cow::Owned(Value::Array(mut items)) if index < items.len() => {
            Some(Cow::Owned(items.swap_remove(index)))
        }
        _ => None,
    }
}

fn unary(op: UnaryOp, value: &Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnaryOp::Neg => match value.as_f64() {
            Some(n) => Ok(number_value(-n)),
            None => Err(EvalError::Type(format!(
                "cannot negate {}",
                value.type_name()
            ))),
        },
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let type_error = || {
        EvalError::Type(format!(
            "cannot apply `{}` to {} and {}",
            op.as_str(),
            left.type_name(),
            right.type_name()
        ))
    };

    match op {
        BinaryOp::Eq => Ok(Value::Bool(left.loose_eq(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.loose_eq(right))),
        BinaryOp::Add if left.is_string() || right.is_string() => Ok(Value::String(format!(
            "{}{}",
            left.to_display_string(),
            right.to_display_string()
        ))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = match (left, right) {
                (Value::String(a), Value::String(b)) => a.partial_cmp(b),
                _ => match (left.as_f64(), right.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => return Err(type_error()),
                },
            };
            let Some(ordering) = ordering else {
                return Ok(Value::Bool(false));
            };
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::LtEq => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        _ => {
            let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
                return Err(type_error());
            };
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div | BinaryOp::Rem if b == 0.0 => {
                    return Err(EvalError::Type("division by zero".to_string()))
                }
                BinaryOp::Div => a / b,
                _ => a % b,
            };
            Ok(number_value(result))
        }
    }
}

/// Store `value` at a variable or property path.
///
/// Property paths are copied out of the environment, updated, and bound back
/// under their root variable.
fn assign<E: Environment + ?Sized>(target: &Expr, value: Value, env: &mut E) -> EvalResult<()> {
    if let Expr::Ident(name) = target {
        return env.assign(name, value);
    }

    let mut segments = Vec::new();
    let mut cursor = target;
    let root = loop {
        match cursor {
            Expr::Ident(name) => break name,
            Expr::Member { object, property } => {
                segments.push(Value::String(property.to_string()));
                cursor = object;
            }
            Expr::Index { object, index } => {
                segments.push(read(index, &*env)?.into_owned());
                cursor = object;
            }
            _ => return Err(EvalError::InvalidAssignment(target.to_string())),
        }
    };
    segments.reverse();

    let mut root_value = env
        .lookup(root)
        .cloned()
        .ok_or_else(|| EvalError::undefined(root.as_str()))?;

    let Some((last, parents)) = segments.split_last() else {
        return env.assign(root, value);
    };
    let mut slot = &mut root_value;
    for segment in parents {
        slot = slot_mut(slot, segment).ok_or_else(|| EvalError::undefined(target.to_string()))?;
    }
    match (slot, last) {
        (Value::Object(map), Value::String(key)) => {
            map.insert(key.clone(), value);
        }
        (Value::Array(items), Value::Number(n)) => match n.as_u64().map(|i| i as usize) {
            Some(i) if i < items.len() => items[i] = value,
            Some(i) if i == items.len() => items.push(value),
            _ => {
                return Err(EvalError::Type(format!(
                    "index {n} is out of bounds in `{target}`"
                )))
            }
        },
        (slot, _) => {
            return Err(EvalError::Type(format!(
                "cannot set a property on {} in `{target}`",
                slot.type_name()
            )))
        }
    }
    env.assign(root, root_value)
}

fn slot_mut<'v>(value: &'v mut Value, segment: &Value) -> Option<&'v mut Value> {
    match (value, segment) {
        (Value::Object(map), Value::String(key)) => map.get_mut(key),
        (Value::Array(items), Value::Number(n)) => {
            items.get_mut(usize::try_from(n.as_u64()?).ok()?)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parse_expression;
    use serde_json::json;

    fn env(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn eval_in(src: &str, env: &mut Map<String, Value>) -> EvalResult<Value> {
        evaluate(&parse_expression(src).unwrap(), env)
    }

    #[test]
    fn test_paths() {
        let mut env = env(json!({
            "books": [{"title": "X"}, {"title": "Y"}],
            "name": "frieze",
        }));
        assert_eq!(eval_in("books[1].title", &mut env).unwrap(), json!("Y"));
        assert_eq!(eval_in("books.length", &mut env).unwrap(), json!(2));
        assert_eq!(eval_in("name.length", &mut env).unwrap(), json!(6));
        assert_eq!(eval_in("books[0]['title']", &mut env).unwrap(), json!("X"));
        assert_eq!(eval_in("[10, 20][1]", &mut env).unwrap(), json!(20));
    }

    #[test]
    fn test_undefined_paths() {
        let mut env = env(json!({"book": {"title": "X"}, "list": [1]}));
        assert_eq!(
            eval_in("missing", &mut env),
            Err(EvalError::undefined("missing"))
        );
        assert_eq!(
            eval_in("book.author", &mut env),
            Err(EvalError::undefined("book.author"))
        );
        assert_eq!(
            eval_in("book.title.first", &mut env),
            Err(EvalError::undefined("book.title.first"))
        );
        assert_eq!(
            eval_in("list[3]", &mut env),
            Err(EvalError::undefined("list[3]"))
        );
    }

    #[test]
    fn test_operators() {
        let mut env = env(json!({"a": 2, "b": 3, "s": "x"}));
        assert_eq!(eval_in("a * b + 1", &mut env).unwrap(), json!(7));
        assert_eq!(eval_in("b / a", &mut env).unwrap(), json!(1.5));
        assert_eq!(eval_in("b % a", &mut env).unwrap(), json!(1));
        assert_eq!(eval_in("-a", &mut env).unwrap(), json!(-2));
        assert_eq!(eval_in("s + a", &mut env).unwrap(), json!("x2"));
        assert_eq!(eval_in("a < b && b <= 3", &mut env).unwrap(), json!(true));
        assert_eq!(eval_in("'a' < 'b'", &mut env).unwrap(), json!(true));
        assert_eq!(eval_in("a == 2.0", &mut env).unwrap(), json!(true));
        assert_eq!(eval_in("!s", &mut env).unwrap(), json!(false));
        assert_eq!(eval_in("a > b ? 'big' : 'small'", &mut env).unwrap(), json!("small"));
    }

    #[test]
    fn test_short_circuit() {
        let mut env = env(json!({"a": 0, "b": "fallback"}));
        // right side would be undefined, but is never read
        assert_eq!(eval_in("a && missing", &mut env).unwrap(), json!(0));
        assert_eq!(eval_in("a || b", &mut env).unwrap(), json!("fallback"));
        assert_eq!(eval_in("b || missing", &mut env).unwrap(), json!("fallback"));
    }

    #[test]
    fn test_type_errors() {
        let mut env = env(json!({"a": 1, "o": {}}));
        assert!(matches!(eval_in("a - 'x'", &mut env), Err(EvalError::Type(_))));
        assert!(matches!(eval_in("a / 0", &mut env), Err(EvalError::Type(_))));
        assert!(matches!(eval_in("o < a", &mut env), Err(EvalError::Type(_))));
        assert!(matches!(eval_in("o[true]", &mut env), Err(EvalError::Type(_))));
    }

    #[test]
    fn test_assignment() {
        let mut env = env(json!({"book": {"title": "X"}, "list": [1, 2]}));
        assert_eq!(eval_in("count = 1 + 1", &mut env).unwrap(), json!(2));
        assert_eq!(env.get("count"), Some(&json!(2)));

        eval_in("book.title = 'Y'; book.pages = 10", &mut env).unwrap();
        assert_eq!(env.get("book"), Some(&json!({"title": "Y", "pages": 10})));

        eval_in("list[0] = 9; list[2] = 3", &mut env).unwrap();
        assert_eq!(env.get("list"), Some(&json!([9, 2, 3])));

        assert!(matches!(
            eval_in("list[7] = 0", &mut env),
            Err(EvalError::Type(_))
        ));
        assert_eq!(
            eval_in("nothing.here = 1", &mut env),
            Err(EvalError::undefined("nothing"))
        );
    }

    #[test]
    fn test_assignment_only_as_statement() {
        let mut env = env(json!({"a": 1}));
        assert!(matches!(
            eval_in("[b = 1]", &mut env),
            Err(EvalError::InvalidAssignment(_))
        ));
        assert_eq!(eval_in("a ? b = 5 : 0", &mut env).unwrap(), json!(5));
        assert_eq!(env.get("b"), Some(&json!(5)));
    }
}
