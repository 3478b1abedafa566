//! Transport-agnostic remote command subsystem.
//!
//! Exposes the `setRPM` function and the `temperature`, `voltage` and
//! `rpm` variables to a remote client that has passed the PSK handshake.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  I/O thread                          Control loop            │
//! │  ┌───────────┐  ┌──────────────┐ CMD ┌─────────────────────┐ │
//! │  │ Transport │─▶│ Codec + Auth │───▶ │ Engine → AppService │ │
//! │  │  (trait)  │◀─│   (session)  │◀─── │ (rate limit)        │ │
//! │  └───────────┘  └──────────────┘ RESP└─────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod channels;
pub mod codec;
pub mod engine;
pub mod io_task;
pub mod protocol;
pub mod transport;
