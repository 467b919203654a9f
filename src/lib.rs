//! switchd - remotely switchable file server
//!
//! Core library for serving files and directory listings over a minimal
//! GET protocol, gated by a UDP on/off control channel.

pub mod config;
pub mod daemon;
pub mod error;
pub mod http;
pub mod logging;
pub mod server;
