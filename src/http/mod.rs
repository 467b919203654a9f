//! Minimal GET protocol implementation.
//!
//! One receive call carries one request line; no headers are parsed. Every
//! response is a status line plus a few optional headers, followed by a file,
//! a generated directory listing, or a short HTML error page.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection worker session state machine
//! - **`parser`**: Extracts method and path from raw request bytes
//! - **`request`**: Request representation
//! - **`handler`**: Turns a request into a response via resolver and listing
//! - **`resolver`**: Maps a request path onto the serving root
//! - **`listing`**: Renders directory listings through a spool file
//! - **`response`**: Status codes, response heads and bodies
//! - **`writer`**: Serializes heads and streams bodies to the client
//! - **`mime`**: Content type lookup by file extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait up to the idle timeout for a request
//!        └──────┬──────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve, render
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send head and body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ keep alive → Reading (same connection)
//!               └─ close → Closed
//! ```
//!
//! Idle timeout, peer close and read errors move `Reading` straight to
//! `Closed`.

pub mod connection;
pub mod handler;
pub mod listing;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
