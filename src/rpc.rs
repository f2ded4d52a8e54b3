//! Transport seam for OpenOCD's TCL RPC channel
//!
//! OpenOCD's TCL server speaks a line-oriented protocol over TCP (default
//! port 6666): a command as UTF-8 terminated by 0x1a, answered by UTF-8
//! text terminated by 0x1a. Framing and connection lifecycle belong to the
//! transport; this crate only consumes the channel through [`TclRpc`].

use crate::error::Result;

/// Synchronous command channel to a running OpenOCD daemon.
///
/// One call sends a single command line and blocks until the daemon's full
/// reply text (or an error) is available. Implementations map a
/// daemon-reported failure to [`TclError::Daemon`] carrying the raw error
/// text, and connectivity failures to the other [`TclError`] variants.
///
/// [`TclError`]: crate::TclError
/// [`TclError::Daemon`]: crate::TclError::Daemon
pub trait TclRpc {
    /// Run one command and return the daemon's reply text.
    fn run(&mut self, command: &str) -> Result<String>;
}

impl<T: TclRpc + ?Sized> TclRpc for &mut T {
    fn run(&mut self, command: &str) -> Result<String> {
        (**self).run(command)
    }
}

impl<T: TclRpc + ?Sized> TclRpc for Box<T> {
    fn run(&mut self, command: &str) -> Result<String> {
        (**self).run(command)
    }
}
