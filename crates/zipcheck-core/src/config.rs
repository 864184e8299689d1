//! Configuration for verification runs.

/// Default read chunk size in bytes (24 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 24 * 1024;

/// Default name of the parent-link child inside catalog directories.
pub const DEFAULT_PARENT_LINK_NAME: &str = "..";

/// Tunables for a verification run.
///
/// The chunk size only controls how often `BytesRead` progress events are
/// emitted and how much memory a run holds; it never changes a checksum.
///
/// # Examples
///
/// ```
/// use zipcheck_core::VerifyConfig;
///
/// let config = VerifyConfig::default().with_chunk_size(64 * 1024);
/// assert_eq!(config.chunk_size, 64 * 1024);
///
/// // Zero is clamped to the smallest usable chunk.
/// assert_eq!(VerifyConfig::default().with_chunk_size(0).chunk_size, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Number of bytes read from an entry stream per chunk.
    pub chunk_size: usize,

    /// Child name that marks a parent link and is never descended into.
    pub parent_link_name: String,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parent_link_name: DEFAULT_PARENT_LINK_NAME.to_string(),
        }
    }
}

impl VerifyConfig {
    /// Sets the read chunk size, clamped to at least one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets the name reserved for parent links.
    #[must_use]
    pub fn with_parent_link_name(mut self, name: impl Into<String>) -> Self {
        self.parent_link_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifyConfig::default();
        assert_eq!(config.chunk_size, 24 * 1024);
        assert_eq!(config.parent_link_name, "..");
    }

    #[test]
    fn test_builder_methods() {
        let config = VerifyConfig::default()
            .with_chunk_size(1)
            .with_parent_link_name("^");
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.parent_link_name, "^");
    }
}
