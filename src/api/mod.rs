//! sora2api admin API: wire types and HTTP client

mod client;
pub mod types;

pub use client::{HttpTokenApi, TokenApi};
