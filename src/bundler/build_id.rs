//! Build identifiers.
//!
//! A build id names the output directory and the archive of one run:
//! `<unix millis>_<first three hex chars of sha256(millis)>`, upper-cased.

use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hash characters appended to the timestamp.
const HASH_SUFFIX_LEN: usize = 3;

/// Unique, filesystem-safe name for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    /// Creates an id from the current wall-clock time.
    pub fn generate() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    /// Creates the id for a given unix timestamp in milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        let stamp = millis.to_string();
        let digest = hex::encode(Sha256::digest(stamp.as_bytes()));
        Self(format!("{}_{}", stamp, &digest[..HASH_SUFFIX_LEN]).to_uppercase())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for BuildId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
