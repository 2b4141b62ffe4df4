//! Library crate for ultistats-client, exposing the client stores for the binary and integration tests.

pub mod config;
pub mod dao;
pub mod display;
pub mod error;
pub mod services;
pub mod state;
pub mod styling;
