// src/github/mod.rs
pub mod client;
pub mod models;
