// Owner-scoped dashboard: live subscription state, derived filtering, views.

pub mod handlers;
pub mod live;
pub mod view;
