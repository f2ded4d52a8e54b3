//! Command formatter/parser for OpenOCD's TCL scripting interface
//!
//! Builds the daemon's textual commands, runs them over an injected
//! [`TclRpc`] transport, and decodes the textual replies into typed values.
//! Every rendered command is a single line. Numeric arguments are rendered
//! as lower-case `0x` hex literals with no padding, except widths, counts
//! and breakpoint lengths, which the daemon expects decimal.
//!
//! Most commands are wrapped in `capture "..."` so the daemon returns the
//! inner command's textual output instead of executing it silently;
//! `load_image` is the exception because its filename argument already
//! carries quotes.

use tracing::debug;

use crate::error::{Result, TclError};
use crate::rpc::TclRpc;
use crate::types::{LoadImageOptions, Width};

/// Typed command surface over a TCL RPC transport.
///
/// Wraps any [`TclRpc`] transport and exposes one method per daemon
/// operation. Each call renders one command line, runs it, and parses the
/// reply; transport errors propagate unchanged, and no call retries or
/// recovers. The wrapper itself implements [`TclRpc`], which serves as the
/// escape hatch for commands without a typed method here.
pub struct Openocd<T> {
    rpc: T,
}

impl<T: TclRpc> Openocd<T> {
    /// Wrap a transport.
    pub fn new(rpc: T) -> Self {
        Self { rpc }
    }

    /// Shared reference to the underlying transport
    pub fn get_ref(&self) -> &T {
        &self.rpc
    }

    /// Mutable reference to the underlying transport
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.rpc
    }

    /// Unwrap, returning the transport
    pub fn into_inner(self) -> T {
        self.rpc
    }

    /// Run `inner` under the daemon's capture wrapper, returning its output
    fn run_captured(&mut self, inner: &str) -> Result<String> {
        self.run(&format!("capture \"{}\"", inner))
    }

    // =========================================================================
    // Target control
    // =========================================================================

    /// Reset the target and halt it immediately.
    pub fn reset_halt(&mut self) -> Result<String> {
        self.run_captured("reset halt")
    }

    /// Reset the target and let it run.
    pub fn reset_run(&mut self) -> Result<String> {
        self.run_captured("reset run")
    }

    /// Halt the target.
    pub fn halt(&mut self) -> Result<String> {
        self.run_captured("halt")
    }

    /// Resume the target at its current code position, or at `address` if
    /// one is given.
    ///
    /// The daemon waits up to five seconds for the target to resume before
    /// the reply comes back.
    pub fn resume(&mut self, address: Option<u64>) -> Result<String> {
        match address {
            None => self.run_captured("resume"),
            Some(addr) => self.run_captured(&format!("resume {:#x}", addr)),
        }
    }

    /// Single-step the target, optionally from `address`.
    pub fn step(&mut self, address: Option<u64>) -> Result<String> {
        match address {
            None => self.run_captured("step"),
            Some(addr) => self.run_captured(&format!("step {:#x}", addr)),
        }
    }

    /// State table for all configured targets, verbatim.
    pub fn targets(&mut self) -> Result<String> {
        self.run_captured("targets")
    }

    /// Read register `name` (e.g. "pc", "sp", "r0").
    ///
    /// The daemon replies `name (/bits): 0xvalue`, possibly with a trailing
    /// `(dirty)` marker, which is ignored.
    pub fn reg(&mut self, name: &str) -> Result<u64> {
        let reply = self.run_captured(&format!("reg {}", name))?;
        parse_reg(&reply)
    }

    // =========================================================================
    // Memory access
    // =========================================================================

    /// Write one 32-bit word at `address` (the `mww` command).
    pub fn mww(&mut self, address: u64, word: u32) -> Result<String> {
        self.run_captured(&format!("mww {:#x} {:#x}", address, word))
    }

    /// Write `data` starting at `address`, one element per `width` access.
    ///
    /// `data` is rendered as a space-separated, brace-delimited hex list in
    /// its original order. Whether each element fits `width` is left to the
    /// daemon.
    pub fn write_memory(&mut self, address: u64, width: Width, data: &[u64]) -> Result<String> {
        self.run_captured(&format!(
            "write_memory {:#x} {} {{{}}}",
            address,
            width,
            render_words(data)
        ))
    }

    /// Write one 32-bit word at `address` via `write_memory`.
    pub fn write_word(&mut self, address: u64, word: u32) -> Result<String> {
        self.write_memory(address, Width::W32, &[u64::from(word)])
    }

    /// Read `count` elements of `width` bits starting at `address`.
    ///
    /// The reply is a whitespace-separated list of hex values, returned in
    /// order.
    pub fn read_memory(&mut self, address: u64, width: Width, count: u32) -> Result<Vec<u64>> {
        let reply = self.run_captured(&format!("read_memory {:#x} {} {}", address, width, count))?;
        parse_word_list(&reply)
    }

    /// Read one 32-bit word at `address`.
    pub fn read_word(&mut self, address: u64) -> Result<u64> {
        let reply =
            self.run_captured(&format!("read_memory {:#x} {} 1", address, Width::W32))?;
        match parse_word_list(&reply)?.first() {
            Some(word) => Ok(*word),
            None => Err(TclError::MalformedReply {
                reply,
                reason: "empty reply".to_string(),
            }),
        }
    }

    /// Hex-dump `count` 32-bit words at `address` (the `mdw` command).
    ///
    /// The dump interleaves `0x<addr>: <words>` data lines with daemon log
    /// lines; everything that is not word data is skipped.
    pub fn mdw(&mut self, address: u64, count: u32) -> Result<Vec<u32>> {
        let reply = self.run_captured(&format!("mdw {:#x} {}", address, count))?;
        Ok(parse_mdw_dump(&reply))
    }

    // =========================================================================
    // Breakpoints
    // =========================================================================

    /// Set a breakpoint of `length` bytes at `address`; `hw` requests a
    /// hardware breakpoint.
    pub fn bp(&mut self, address: u64, length: u32, hw: bool) -> Result<String> {
        if hw {
            self.run_captured(&format!("bp {:#x} {} hw", address, length))
        } else {
            self.run_captured(&format!("bp {:#x} {}", address, length))
        }
    }

    /// Remove the breakpoint at `address`.
    pub fn rbp(&mut self, address: u64) -> Result<String> {
        self.run_captured(&format!("rbp {:#x}", address))
    }

    // =========================================================================
    // Image loading
    // =========================================================================

    /// Load an image file into target memory, offset by `address` from the
    /// image's own load address.
    ///
    /// `options` carries the daemon's optional positional tail: explicit
    /// image format, minimum address to load from, and maximum byte count.
    /// Unset fields are omitted from the command entirely. Backslashes in
    /// `filename` are doubled so Windows paths survive the quoted argument.
    pub fn load_image(
        &mut self,
        filename: &str,
        address: u64,
        options: LoadImageOptions,
    ) -> Result<String> {
        let mut command = format!(
            "load_image \"{}\" {:#x}",
            filename.replace('\\', "\\\\"),
            address
        );
        if let Some(fmt) = options.format {
            command.push_str(&format!(" {}", fmt));
        }
        if let Some(min_address) = options.min_address {
            command.push_str(&format!(" {:#x}", min_address));
        }
        if let Some(max_length) = options.max_length {
            command.push_str(&format!(" {:#x}", max_length));
        }
        self.run(&command)
    }
}

impl<T: TclRpc> TclRpc for Openocd<T> {
    /// Run a raw command line on the wrapped transport.
    ///
    /// Single choke point for every operation above; logs the exchange.
    fn run(&mut self, command: &str) -> Result<String> {
        debug!("OpenOCD command: {}", command);
        let reply = self.rpc.run(command)?;
        debug!("OpenOCD reply: {}", reply);
        Ok(reply)
    }
}

/// Render `data` as the space-separated hex token list of `write_memory`.
pub fn render_words(data: &[u64]) -> String {
    data.iter()
        .map(|word| format!("{:#x}", word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one base-16 token from a daemon reply.
///
/// Accepts an optional `0x`/`0X` prefix and surrounding whitespace; the
/// digits themselves are always read as hex (a bare `10` is 16, not ten).
pub fn parse_hex(token: &str) -> Result<u64> {
    let token = token.trim();
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).map_err(|e| TclError::MalformedReply {
        reply: token.to_string(),
        reason: format!("invalid hex token: {}", e),
    })
}

/// Parse a whitespace-separated list of hex values (a `read_memory` reply).
///
/// An empty reply parses to an empty list.
pub fn parse_word_list(reply: &str) -> Result<Vec<u64>> {
    reply.split_whitespace().map(parse_hex).collect()
}

/// Parse a `reg` reply of the form `name (/bits): 0xvalue`.
///
/// Only the first value token after the colon is read, so trailing
/// annotations such as `(dirty)` are ignored.
pub fn parse_reg(reply: &str) -> Result<u64> {
    let value = reply
        .split_once(':')
        .and_then(|(_, rest)| rest.split_whitespace().next());
    match value {
        Some(token) => parse_hex(token),
        None => Err(TclError::MalformedReply {
            reply: reply.to_string(),
            reason: "expected `name (/bits): 0xvalue`".to_string(),
        }),
    }
}

/// Scrape the flat word list out of `mdw` dump output.
///
/// Data lines look like `0x10000000: deadbeef cafebabe`. The daemon may
/// interleave log lines with the dump; those are skipped, as are tokens
/// that do not parse as hex words.
pub fn parse_mdw_dump(reply: &str) -> Vec<u32> {
    let mut words = Vec::new();
    for line in reply.lines() {
        let (addr, data) = match line.trim().split_once(':') {
            Some(parts) => parts,
            None => continue,
        };
        if !addr.starts_with("0x") {
            continue;
        }
        words.extend(
            data.split_whitespace()
                .filter_map(|token| u32::from_str_radix(token, 16).ok()),
        );
    }
    words
}
