pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod fingerprint;
pub mod risk;
pub mod scoring;
pub mod server;

#[cfg(test)]
mod testing;
