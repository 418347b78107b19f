//! Session core: token storage, inspection, and route gating

pub mod guard;
pub mod indicator;
pub mod inspector;
pub mod store;
