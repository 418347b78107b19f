//! Data models for the client session core

pub mod claims;
pub mod route;
