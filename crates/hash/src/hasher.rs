use serde::Serialize;
use sha2::{Digest, Sha256};
use starbase_utils::json;
use tracing::{debug, trace};

/// Feeds serialized values into a running SHA256 digest. Each value is
/// terminated by a newline, so `["a", "b"]` and `["ab"]` never collide.
#[derive(Clone)]
pub struct ContentHasher {
    digest: Sha256,
    items: usize,

    pub label: String,
}

impl ContentHasher {
    pub fn new(label: impl AsRef<str>) -> ContentHasher {
        ContentHasher {
            digest: Sha256::new(),
            items: 0,
            label: label.as_ref().to_owned(),
        }
    }

    pub fn hash_content<T: Serialize>(&mut self, content: T) -> miette::Result<()> {
        let line = json::format(&content, false)?;

        trace!(label = &self.label, bytes = line.len(), "Hashing content");

        self.digest.update(line.as_bytes());
        self.digest.update(b"\n");
        self.items += 1;

        Ok(())
    }

    /// Hex digest of everything hashed so far. More content may be
    /// added afterwards.
    pub fn generate_hash(&self) -> miette::Result<String> {
        let hash = format!("{:x}", self.digest.clone().finalize());

        debug!(label = &self.label, items = self.items, hash, "Generated content hash");

        Ok(hash)
    }
}
