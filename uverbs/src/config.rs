//! Runtime configuration for opening a verbs session.
//!
//! All values have defaults. Override via environment variables (prefixed
//! `UVERBS_`) or by constructing a custom `VerbsConfig`.

use std::path::PathBuf;

/// Where to find the driver and how to initialize a session on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbsConfig {
    /// Character device of the user-verbs driver.
    pub device: PathBuf,

    /// Number of completion event descriptors requested at session init.
    pub comp_vectors: usize,
}

impl Default for VerbsConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/infiniband/uverbs0"),
            comp_vectors: 1,
        }
    }
}

impl VerbsConfig {
    /// Load config from environment variables, falling back to defaults.
    ///
    /// Recognized variables:
    /// - `UVERBS_DEVICE`
    /// - `UVERBS_COMP_VECTORS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("UVERBS_DEVICE")
            && !v.is_empty()
        {
            cfg.device = PathBuf::from(v);
        }
        if let Some(v) = lookup("UVERBS_COMP_VECTORS")
            && let Ok(n) = v.parse::<usize>()
        {
            cfg.comp_vectors = n;
        }

        cfg
    }
}
