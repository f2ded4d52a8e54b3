//! Value types for the daemon's command grammar

use std::fmt;

/// Memory access bit size accepted by the daemon's memory commands.
///
/// Rendered decimal (`8`, `16`, `32`, `64`) in outgoing commands. Whether a
/// data value actually fits the access size is the daemon's problem, not
/// this layer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Access size in bits
    pub fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    /// Width for a bit size, if it is one the daemon accepts
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Width::W8),
            16 => Some(Width::W16),
            32 => Some(Width::W32),
            64 => Some(Width::W64),
            _ => None,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Image file format `load_image` can be told to expect.
///
/// Omitted from the command when the daemon should detect the format from
/// the file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Bin,
    Ihex,
    Elf,
    S19,
}

impl ImageFormat {
    /// Token spelling in the daemon's command grammar
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Bin => "bin",
            ImageFormat::Ihex => "ihex",
            ImageFormat::Elf => "elf",
            ImageFormat::S19 => "s19",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional trailing arguments of `load_image`.
///
/// The daemon reads these positionally after the address: format, then
/// minimum address, then maximum length. Unset fields are omitted from the
/// command; a later field set without the earlier ones is passed through
/// as rendered and left to the daemon to reject.
#[derive(Debug, Clone, Default)]
pub struct LoadImageOptions {
    /// Explicit image format (auto-detected by the daemon when unset)
    pub format: Option<ImageFormat>,
    /// Ignore image data below this address, relative to the load address
    pub min_address: Option<u64>,
    /// Load at most this many bytes
    pub max_length: Option<u64>,
}
