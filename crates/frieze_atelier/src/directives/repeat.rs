//! `ng-repeat`: one instance of the element per collection entry.

use std::rc::Rc;

use frieze_armature::parse_expression;
use frieze_carton::{is_simple_identifier, CompactString};
use frieze_croquis::ScopeId;
use frieze_fresco::NodeId;
use frieze_relief::{Expr, Value};

use super::NG_REPEAT;
use crate::compile::CompileContext;
use crate::error::{AtelierError, Result};
use crate::reconciler::ListReconciler;
use crate::registry::Activation;
use crate::runtime::Runtime;

/// A parsed `<var> in <collection>` expression
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatExpression {
    /// Loop variable
    pub lhs: CompactString,
    /// Collection expression
    pub rhs: Expr,
}

impl RepeatExpression {
    /// Split at the first ` in `; the left side must be a single identifier.
    pub fn parse(expression: &str) -> Result<Self> {
        let Some((lhs, rhs)) = expression.split_once(" in ") else {
            return Err(AtelierError::directive_parse(
                NG_REPEAT,
                expression,
                "expected `<variable> in <collection>`",
            ));
        };
        let lhs = lhs.trim();
        if !is_simple_identifier(lhs) {
            return Err(AtelierError::directive_parse(
                NG_REPEAT,
                expression,
                format!("`{lhs}` is not an identifier"),
            ));
        }
        Ok(Self {
            lhs: CompactString::from(lhs),
            rhs: parse_expression(rhs.trim())?,
        })
    }
}

/// Replaces the element with a marker comment and compiles it into the
/// template every instance is cloned from.
pub(super) fn repeat(
    ctx: &mut CompileContext<'_>,
    expression: &str,
    element: NodeId,
) -> Result<Option<Activation>> {
    let RepeatExpression { lhs, rhs } = RepeatExpression::parse(expression)?;

    let reference = ctx.reference(&format!("{NG_REPEAT}: {expression}"));
    ctx.document().remove_attr(element, NG_REPEAT)?;
    let template = Rc::new(ctx.compile(element)?);
    ctx.document().replace_with(element, reference)?;
    ctx.descend(false);

    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, marker: NodeId| -> Result<()> {
            let mut reconciler =
                ListReconciler::new(lhs.clone(), Rc::clone(&template), marker, scope);
            rt.scopes.add_eval_expr(
                scope,
                rhs.clone(),
                Some(Box::new(
                    move |rt: &mut Runtime, _: ScopeId, items: &Value| -> Result<()> {
                        reconciler.reconcile(rt, items)?;
                        Ok(())
                    },
                )),
            )?;
            Ok(())
        },
    )))
}
