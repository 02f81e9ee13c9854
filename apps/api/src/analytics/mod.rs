// Derived performance statistics. Pure aggregation — no subscription state.

pub mod aggregate;
pub mod handlers;
