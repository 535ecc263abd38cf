//! Decode options for SOD files
//!
//! Controls how strictly the `Storm3D_SW` signature must be placed.

/// Bytes examined by [`SignatureSearch::Scan`] when no limit is given.
pub const DEFAULT_SCAN_LIMIT: usize = 4096;

/// Where the decoder looks for the file signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureSearch {
    /// The signature must start at offset 0.
    #[default]
    AtStart,
    /// Scan forward byte by byte, trying at most `limit` start offsets.
    ///
    /// Compatible with legacy readers that accepted leading garbage.
    Scan {
        /// Number of start offsets to try.
        limit: usize,
    },
}

impl SignatureSearch {
    /// Scan with [`DEFAULT_SCAN_LIMIT`].
    pub fn scan() -> Self {
        Self::Scan {
            limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Number of start offsets to try.
    pub(crate) fn max_offsets(self) -> usize {
        match self {
            Self::AtStart => 1,
            Self::Scan { limit } => limit.max(1),
        }
    }
}

/// Options for decoding a SOD file.
///
/// # Example
///
/// ```
/// use stormsod::formats::sod::{DecodeOptions, SignatureSearch};
///
/// // Strict: signature at offset 0 (the default)
/// let options = DecodeOptions::new();
///
/// // Tolerate up to 512 bytes of leading junk
/// let options = DecodeOptions::new()
///     .with_signature_search(SignatureSearch::Scan { limit: 512 });
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// How to locate the signature.
    pub signature_search: SignatureSearch,
}

impl DecodeOptions {
    /// Create strict options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options matching legacy readers: scan for the signature.
    #[must_use]
    pub fn tolerant() -> Self {
        Self {
            signature_search: SignatureSearch::scan(),
        }
    }

    /// Set the signature search strategy.
    #[must_use]
    pub fn with_signature_search(mut self, search: SignatureSearch) -> Self {
        self.signature_search = search;
        self
    }
}
