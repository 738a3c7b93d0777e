//! Error types for the `homestead-catalog` crate.

/// Errors that can occur while loading or querying the material catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read catalog file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the catalog JSON content.
    #[error("failed to parse catalog JSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },

    /// No catalog entry matches the requested good name.
    #[error("no catalog entry for good '{name}'")]
    NotFound {
        /// The requested good name.
        name: String,
    },

    /// More than one catalog entry matches the requested good name.
    #[error("{count} catalog entries for good '{name}', expected exactly one")]
    Ambiguous {
        /// The requested good name.
        name: String,
        /// How many entries matched.
        count: usize,
    },

    /// A catalog record violates a structural invariant.
    #[error("invalid catalog record for '{name}': {reason}")]
    InvalidSpec {
        /// The offending record's good name.
        name: String,
        /// What is wrong with the record.
        reason: String,
    },
}
