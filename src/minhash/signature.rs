//! Signature-column and band-column construction.

use std::io::Read;

use super::hashing::{shingle_code, HashFamily};
use super::shingles::Shingler;

/// Build a signature column for one document stream.
///
/// Every entry starts at `u32::MAX` (the identity for `min`) and is
/// folded down to the minimum value of its hash function across all
/// shingles. An empty or too-short document leaves the column at all
/// `u32::MAX`.
pub fn signature_column<R: Read>(
    hashers: &HashFamily,
    shingle_size: usize,
    reader: R,
) -> Vec<u32> {
    let mut column = vec![u32::MAX; hashers.len()];

    for shingle in Shingler::new(reader, shingle_size) {
        let code = shingle_code(&shingle);
        for (i, entry) in column.iter_mut().enumerate() {
            let hash = hashers.hash_one(i, code);
            if hash < *entry {
                *entry = hash;
            }
        }
    }

    column
}

/// Project a signature column onto its band column.
///
/// Band `k` is the `k`-th band hasher applied to the contiguous group of
/// `rows` signature entries starting at `k * rows`. The projection is a
/// pure function of the (immutable) band family, so identical signatures
/// always produce identical band columns.
pub fn band_column(band_hashers: &HashFamily, rows: usize, signature: &[u32]) -> Vec<u32> {
    (0..band_hashers.len())
        .map(|k| band_hashers.hash_slice(k, &signature[k * rows..(k + 1) * rows]))
        .collect()
}
