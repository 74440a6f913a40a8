//! Update cycles.

use tracing::trace;

use crate::error::ScopeError;
use crate::scope::{ScopeHost, ScopeId, Watcher};

/// Run one pass over the watchers of `id`, in registration order.
///
/// Watches fire when their value differs from the previous pass (always on
/// their first pass); evaluations fire every pass. The watcher list is moved
/// out of the scope for the duration of the pass, so watchers registered by a
/// callback join from the next pass on. A second `update_view` on the same
/// scope from inside a callback fails with [`ScopeError::ReentrantUpdate`].
pub fn update_view<H: ScopeHost>(host: &mut H, id: ScopeId) -> Result<(), H::Error> {
    let mut watchers = {
        let scope = host.scopes_mut().scope_mut(id)?;
        if scope.updating {
            return Err(ScopeError::ReentrantUpdate(id).into());
        }
        scope.updating = true;
        std::mem::take(&mut scope.watchers)
    };

    let result = run_watchers(host, id, &mut watchers);

    // A callback may have destroyed the scope; its watchers go with it.
    if let Ok(scope) = host.scopes_mut().scope_mut(id) {
        scope.updating = false;
        let registered = std::mem::replace(&mut scope.watchers, watchers);
        scope.watchers.extend(registered);
    }
    result
}

fn run_watchers<H: ScopeHost>(
    host: &mut H,
    id: ScopeId,
    watchers: &mut [Watcher<H>],
) -> Result<(), H::Error> {
    for watcher in watchers {
        if !host.scopes().contains(id) {
            break;
        }
        let value = host.scopes_mut().eval_expr(id, &watcher.expr)?;
        if !watcher.should_fire(&value) {
            continue;
        }
        if let Some(callback) = watcher.callback.as_mut() {
            trace!(scope = %id, expr = %watcher.expr, "watch fired");
            callback(host, id, &value)?;
        }
    }
    Ok(())
}
