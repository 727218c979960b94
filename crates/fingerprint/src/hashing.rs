use sha3::{Digest, Sha3_256};
use std::borrow::Cow;
use std::path::Path;

/// Replace every `\r\n` with `\n` so checkouts made on Windows hash like Unix ones.
#[must_use]
pub fn normalize_line_endings(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.windows(2).any(|pair| pair == b"\r\n") {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&b'\n') {
            continue;
        }
        out.push(byte);
    }
    Cow::Owned(out)
}

/// Lowercase hex SHA3-256 digest.
#[must_use]
pub fn digest_hex(bytes: &[u8]) -> String {
    let digest = Sha3_256::digest(bytes);
    to_lower_hex(&digest)
}

/// Hash a file's normalized content.
///
/// An unreadable file hashes as empty content and the scan carries on. This keeps parity with
/// the published manifests, but it can hide a permissions problem behind a "modified" verdict.
pub fn hash_file_or_empty(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => digest_hex(&normalize_line_endings(&bytes)),
        Err(err) => {
            log::warn!(
                "Unable to read {}: {err}; hashing as empty content",
                path.display()
            );
            digest_hex(b"")
        }
    }
}

fn to_lower_hex(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(LUT[(byte >> 4) as usize] as char);
        out.push(LUT[(byte & 0x0f) as usize] as char);
    }
    out
}
