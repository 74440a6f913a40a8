use frieze_fresco::NodeId;

use crate::compile::CompileContext;
use crate::error::Result;
use crate::registry::Activation;

/// `ng-non-bindable`
pub(super) fn non_bindable(
    ctx: &mut CompileContext<'_>,
    _expression: &str,
    _element: NodeId,
) -> Result<Option<Activation>> {
    ctx.descend(false);
    Ok(None)
}
