// src/utils/embedding.rs
//! Word-frequency fingerprint for free text.

/// Length of a text embedding.
pub const TEXT_EMBEDDING_DIM: usize = 64;

/// Hashes each lowercase alphanumeric word into one of [`TEXT_EMBEDDING_DIM`] buckets
/// and returns relative word frequencies. Empty text embeds to all zeros.
pub fn embed_text(text: &str) -> Vec<f64> {
    let mut counts = vec![0.0; TEXT_EMBEDDING_DIM];
    let mut total = 0usize;
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        counts[bucket(&word)] += 1.0;
        total += 1;
    }
    if total > 0 {
        counts.iter_mut().for_each(|c| *c /= total as f64);
    }
    counts
}

// FNV-1a, so buckets are stable across runs and platforms.
fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % TEXT_EMBEDDING_DIM as u64) as usize
}
