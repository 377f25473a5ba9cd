use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::trace;

/// Calculate the SHA256 digest of a file, streaming its contents.
pub fn hash_file_sha256<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let path = path.as_ref();

    trace!(file = ?path, "Calculating SHA256 checksum for file");

    let mut file = File::open(path)?;
    let mut sha = Sha256::new();

    io::copy(&mut file, &mut sha)?;

    let hash = format!("{:x}", sha.finalize());

    trace!(file = ?path, hash, "Calculated hash");

    Ok(hash)
}
