//! CP-008: BLAKE3 fingerprints for workbook files and computed totals.

use crate::core::types::Totals;
use std::io::Read;
use std::path::Path;

const STREAM_BUF_SIZE: usize = 65536;

fn tagged(hash: blake3::Hash) -> String {
    format!("blake3:{}", hash.to_hex())
}

/// Hash a file's contents. Returns `"blake3:{hex}"`.
pub fn hash_file(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; STREAM_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| format!("read error {}: {}", path.display(), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(tagged(hasher.finalize()))
}

/// Hash a string. Returns `"blake3:{hex}"`.
pub fn hash_string(s: &str) -> String {
    tagged(blake3::hash(s.as_bytes()))
}

/// Fingerprint a totals map. Keys are sorted and quantities hashed by their
/// exact bit pattern, so two plans share a fingerprint only if every total
/// is bit-identical, regardless of contribution order.
pub fn hash_totals(totals: &Totals) -> String {
    let mut entries: Vec<(&String, &f64)> = totals.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = blake3::Hasher::new();
    for (id, qty) in entries {
        hasher.update(id.as_bytes());
        hasher.update(b"\0");
        hasher.update(&qty.to_bits().to_le_bytes());
        hasher.update(b"\n");
    }
    tagged(hasher.finalize())
}
