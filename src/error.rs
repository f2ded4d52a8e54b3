//! Error types shared by the command layer and TCL RPC transports

use thiserror::Error;

/// Errors produced while running commands against an OpenOCD daemon.
///
/// Transport implementations construct every variant except
/// [`Self::MalformedReply`], which is the one kind the command layer adds
/// on top; transport errors pass through the command layer untouched.
#[derive(Error, Debug)]
pub enum TclError {
    /// The daemon ran the command and reported failure; the payload is the
    /// daemon's raw error text.
    #[error("OpenOCD error: {0}")]
    Daemon(String),

    #[error("Connection closed by OpenOCD")]
    ConnectionClosed,

    #[error("Command timeout")]
    Timeout,

    /// A reply that could not be decoded the way the operation requires.
    /// `reply` holds the text that failed to decode.
    #[error("Malformed reply {reply:?}: {reason}")]
    MalformedReply { reply: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TclError>;
