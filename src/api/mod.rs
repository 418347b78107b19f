//! Clients for the backend REST API

pub mod auth;
