pub mod reconcile_ctx;
pub mod reconcile_flow;

pub use reconcile_ctx::ReconcileCtx;
pub use reconcile_flow::ReconcileFlow;
