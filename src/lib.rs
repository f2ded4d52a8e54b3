//! Typed command layer for OpenOCD's TCL scripting interface
//!
//! Renders the daemon's textual commands — halt/resume, memory access,
//! breakpoints, register reads, image loading — runs them over an injected
//! transport, and parses the textual replies back into typed values.
//! The transport itself (the TCP connection to OpenOCD's TCL server and its
//! 0x1a-terminated framing) stays behind the [`TclRpc`] trait and is
//! supplied by the caller; this crate holds no connection state and owns no
//! CLI, files, or environment variables.
//!
//! Call model: synchronous and blocking. Each operation sends exactly one
//! command line and returns once the reply (or a transport error) arrives;
//! there are no retries and no recovery, so a transport error surfaces
//! unchanged from whichever call hit it.

pub mod commands;
pub mod error;
pub mod rpc;
pub mod types;

pub use commands::Openocd;
pub use error::{Result, TclError};
pub use rpc::TclRpc;
pub use types::{ImageFormat, LoadImageOptions, Width};
