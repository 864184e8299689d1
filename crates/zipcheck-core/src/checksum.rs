//! Incremental CRC-32 accumulator.
//!
//! ZIP stores a CRC-32 (IEEE 802.3, reflected polynomial `0xEDB88320`) for
//! every entry. [`Crc32`] recomputes it over a byte stream fed in arbitrary
//! chunks; the final value depends only on the bytes, never on how they were
//! split.

/// Streaming CRC-32 state.
///
/// # Examples
///
/// ```
/// use zipcheck_core::checksum::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"hel");
/// crc.update(b"lo");
/// assert_eq!(crc.finalize(), 0x3610_a686);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Crc32 {
    hasher: crc32fast::Hasher,
    bytes: u64,
}

impl Crc32 {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds `chunk` into the accumulator.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub const fn bytes_processed(&self) -> u64 {
        self.bytes
    }

    /// Consumes the accumulator and returns the checksum.
    #[must_use]
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

/// Computes the CRC-32 of `data` in one shot.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}
