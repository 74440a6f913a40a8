//! Built-in directives.
//!
//! | attribute | behavior |
//! | --- | --- |
//! | `ng-init` | evaluates its expression once at activation |
//! | `ng-eval` | evaluates its expression on every update |
//! | `ng-bind` | keeps the element's text equal to the expression |
//! | `ng-bind-attr` | keeps attributes equal to an object's members |
//! | `ng-non-bindable` | leaves the element's children uncompiled |
//! | `ng-repeat` | stamps the element once per collection entry |
//! | `ng-watch` | runs actions when watched expressions change |

mod bind;
mod eval;
mod non_bindable;
mod repeat;
mod watch;

pub use repeat::RepeatExpression;

use crate::registry::{DirectiveFlags, DirectiveRegistry};

pub const NG_INIT: &str = "ng-init";
pub const NG_EVAL: &str = "ng-eval";
pub const NG_BIND: &str = "ng-bind";
pub const NG_BIND_ATTR: &str = "ng-bind-attr";
pub const NG_NON_BINDABLE: &str = "ng-non-bindable";
pub const NG_REPEAT: &str = "ng-repeat";
pub const NG_WATCH: &str = "ng-watch";

/// Add every built-in directive to `registry`
pub fn register_builtins(registry: &mut DirectiveRegistry) {
    let none = DirectiveFlags::empty();
    registry.register(NG_INIT, eval::init, none);
    registry.register(NG_EVAL, eval::eval, none);
    registry.register(NG_BIND, bind::bind_text, none);
    registry.register(NG_BIND_ATTR, bind::bind_attr, none);
    registry.register(NG_NON_BINDABLE, non_bindable::non_bindable, none);
    registry.register(NG_REPEAT, repeat::repeat, DirectiveFlags::EXCLUSIVE);
    registry.register(NG_WATCH, watch::watch, none);
}
