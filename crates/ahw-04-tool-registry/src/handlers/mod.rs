pub mod balance;
pub mod pending;
pub mod sign;
pub mod transfer;

use crate::context::ServiceContext;
use ahw_02_router::registry::{handler_fn, MethodRegistry};

/// Register every agent-facing tool handler onto `registry`, each closing
/// over its own clone of `ctx`. Called once, at startup, by
/// [`crate::ToolRegistry::standard`].
pub fn register_all(registry: &mut MethodRegistry, ctx: ServiceContext) {
    macro_rules! register {
        ($name:expr, $handler:path) => {{
            let ctx = ctx.clone();
            registry.register($name, handler_fn(move |params| $handler(params, ctx.clone())));
        }};
    }

    register!("get_balance", balance::get_balance);
    register!("get_transactions", balance::get_transactions);
    register!("get_pending_transactions", pending::get_pending_transactions);
    register!("approve_transaction", pending::approve_transaction);
    register!("reject_transaction", pending::reject_transaction);
    register!("send_transaction", transfer::send_transaction);
    register!("sign_message", sign::sign_message);
    register!("swap_tokens", transfer::swap_tokens);
    register!("simulate_transaction", transfer::simulate_transaction);
    register!("get_transaction_status", transfer::get_transaction_status);
}
