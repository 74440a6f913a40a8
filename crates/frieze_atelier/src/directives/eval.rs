use std::rc::Rc;

use frieze_armature::parse_expression;
use frieze_croquis::ScopeId;
use frieze_fresco::NodeId;

use crate::compile::CompileContext;
use crate::error::Result;
use crate::registry::Activation;
use crate::runtime::Runtime;

/// `ng-init`
pub(super) fn init(
    _ctx: &mut CompileContext<'_>,
    expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    let expr = parse_expression(expression)?;
    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, _: NodeId| -> Result<()> {
            rt.scopes.eval_expr(scope, &expr)?;
            Ok(())
        },
    )))
}

/// `ng-eval`
pub(super) fn eval(
    _ctx: &mut CompileContext<'_>,
    expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    let expr = parse_expression(expression)?;
    Ok(Some(Rc::new(
        move |rt: &mut Runtime, scope: ScopeId, _: NodeId| -> Result<()> {
            rt.scopes.add_eval_expr(scope, expr.clone(), None)?;
            Ok(())
        },
    )))
}
