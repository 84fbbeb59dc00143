// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus service info and health probes.

pub mod auth;
pub mod service;

pub use service::{health, index};
