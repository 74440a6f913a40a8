//! Binding directives: `ng-bind` and `ng-bind-attr`.

use std::rc::Rc;

use frieze_armature::parse_expression;
use frieze_croquis::ScopeId;
use frieze_fresco::NodeId;
use frieze_relief::{EvalError, Value, ValueExt};

use crate::compile::CompileContext;
use crate::error::Result;
use crate::registry::Activation;
use crate::runtime::Runtime;

/// `ng-bind`: the element's text follows the expression.
pub(super) fn bind_text(
    _ctx: &mut CompileContext<'_>,
    expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    let expr = parse_expression(expression)?;
    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, element: NodeId| -> Result<()> {
            rt.scopes.watch_expr(
                scope,
                expr.clone(),
                Box::new(move |rt: &mut Runtime, _: ScopeId, value: &Value| -> Result<()> {
                    rt.document.set_text(element, value.to_display_string())?;
                    Ok(())
                }),
            )?;
            Ok(())
        },
    )))
}

/// `ng-bind-attr`: every member of an object becomes an attribute; `null`
/// members remove theirs.
pub(super) fn bind_attr(
    _ctx: &mut CompileContext<'_>,
    expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    let expr = parse_expression(expression)?;
    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, element: NodeId| -> Result<()> {
            rt.scopes.watch_expr(
                scope,
                expr.clone(),
                Box::new(move |rt: &mut Runtime, _: ScopeId, value: &Value| -> Result<()> {
                    apply_attributes(rt, element, value)
                }),
            )?;
            Ok(())
        },
    )))
}

fn apply_attributes(rt: &mut Runtime, element: NodeId, value: &Value) -> Result<()> {
    let attrs = match value {
        Value::Object(attrs) => attrs,
        Value::Null => return Ok(()),
        other => {
            return Err(EvalError::Type(format!(
                "ng-bind-attr expects an object, found {}",
                other.type_name()
            ))
            .into())
        }
    };
    for (name, value) in attrs {
        if value.is_null() {
            rt.document.remove_attr(element, name)?;
        } else {
            rt.document
                .set_attr(element, name, value.to_display_string())?;
        }
    }
    Ok(())
}
