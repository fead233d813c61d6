//! The per-bank vector-quantization codec.

use super::{BankCodec, EncodedBank, BANK_SIZE};
use crate::error::{Result, Warning};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::instrument;

/// Fixed codebook size; entry 0 is reserved for silence when the noise gate is enabled.
const CODEBOOK_ENTRIES: usize = 256;

/// k-means iteration budget.
const MAX_ITERATIONS: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub struct VqCodec {
    vec_size: usize,
    noise_gate: u8,
    level_count: usize,
}

impl VqCodec {
    pub fn new(vec_size: usize, noise_gate: u8, level_count: usize) -> Self {
        Self { vec_size, noise_gate, level_count }
    }

    /// Silence-vector predicate threshold: every sample in the vector must be below this level.
    fn gate_threshold(&self) -> Option<usize> {
        if self.noise_gate == 0 {
            return None;
        }
        // Ceiling division: ceil((L-1) * gate / 100).
        let l = self.level_count - 1;
        Some((l * self.noise_gate as usize + 99) / 100)
    }
}

impl BankCodec for VqCodec {
    #[instrument(level = "trace", skip_all, fields(bank_index, vec_size = self.vec_size))]
    fn encode_bank(&self, levels: &[u8], bank_index: usize, warnings: &mut Vec<Warning>) -> Result<EncodedBank> {
        let v = self.vec_size;
        let codebook_bytes = CODEBOOK_ENTRIES * v;
        let capacity_indices = BANK_SIZE - codebook_bytes;
        // Ceiling division: a trailing partial vector still counts as one more vector to encode,
        // zero-padded up to `v`, so a stream length that isn't a multiple of `v` is still fully
        // consumed rather than leaving an un-encodable remainder behind.
        let total_vectors = levels.len().div_ceil(v);
        let vectors_to_encode = total_vectors.min(capacity_indices);
        let full_vectors = (levels.len() / v).min(vectors_to_encode);
        let tail_len = if vectors_to_encode > full_vectors { levels.len() - full_vectors * v } else { 0 };
        let consumed = full_vectors * v + tail_len;

        let padded_tail = (tail_len > 0).then(|| {
            let mut padded = vec![0u8; v];
            padded[..tail_len].copy_from_slice(&levels[full_vectors * v..consumed]);
            padded
        });
        let mut vectors: Vec<&[u8]> = levels[..full_vectors * v].chunks_exact(v).collect();
        if let Some(tail) = &padded_tail {
            vectors.push(tail.as_slice());
        }

        let gate = self.gate_threshold();
        let is_silence = |vec: &[u8]| gate.is_some_and(|t| vec.iter().all(|&lvl| (lvl as usize) < t));

        let (mut full_codebook, silence_index) = if gate.is_some() {
            let training: Vec<&[u8]> = vectors.iter().copied().filter(|vec| !is_silence(vec)).collect();
            let mut centroids =
                train_kmeans(&training, CODEBOOK_ENTRIES - 1, v, self.level_count, bank_index, warnings);
            let mut full = Vec::with_capacity(CODEBOOK_ENTRIES);
            full.push(vec![0u8; v]);
            full.append(&mut centroids);
            (full, 0usize)
        } else {
            let training: Vec<&[u8]> = vectors.clone();
            let full = train_kmeans(&training, CODEBOOK_ENTRIES, v, self.level_count, bank_index, warnings);
            let usage = count_usage(&full, &vectors);
            let least_used =
                usage.iter().enumerate().min_by_key(|&(_, &count)| count).map_or(0, |(i, _)| i);
            let mut full = full;
            full[least_used] = vec![0u8; v];
            (full, least_used)
        };
        if full_codebook.len() < CODEBOOK_ENTRIES {
            full_codebook.resize(CODEBOOK_ENTRIES, vec![0u8; v]);
        }

        let mut indices = Vec::with_capacity(capacity_indices);
        for vec in &vectors {
            if is_silence(vec) {
                indices.push(silence_index as u8);
            } else {
                indices.push(nearest_index(&full_codebook, vec) as u8);
            }
        }
        while indices.len() < capacity_indices {
            indices.push(silence_index as u8);
        }

        let mut bytes = Vec::with_capacity(BANK_SIZE);
        for entry in &full_codebook {
            bytes.extend_from_slice(entry);
        }
        bytes.extend_from_slice(&indices);
        debug_assert_eq!(bytes.len(), BANK_SIZE);

        Ok(EncodedBank { bytes, consumed })
    }
}

fn squared_dist(a: &[u8], b: &[u8]) -> f64 {
    a.iter().zip(b).map(|(&x, &y)| { let d = f64::from(x) - f64::from(y); d * d }).sum()
}

fn nearest_index(codebook: &[Vec<u8>], vec: &[u8]) -> usize {
    codebook
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            squared_dist(a, vec).partial_cmp(&squared_dist(b, vec)).unwrap()
        })
        .map_or(0, |(i, _)| i)
}

fn count_usage(codebook: &[Vec<u8>], vectors: &[&[u8]]) -> Vec<u64> {
    let mut usage = vec![0u64; codebook.len()];
    for vec in vectors {
        usage[nearest_index(codebook, vec)] += 1;
    }
    usage
}

/// Runs k-means with k-means++ seeding derived deterministically from `bank_index`. Returns `k`
/// centroids (duplicates are acceptable if the training set has fewer than `k` distinct vectors).
fn train_kmeans(
    training: &[&[u8]],
    k: usize,
    dim: usize,
    level_count: usize,
    bank_index: usize,
    warnings: &mut Vec<Warning>,
) -> Vec<Vec<u8>> {
    if k == 0 {
        return Vec::new();
    }
    if training.is_empty() {
        return vec![vec![0u8; dim]; k];
    }
    let mut rng = SmallRng::seed_from_u64(bank_index as u64);
    let mut centroids = kmeans_plus_plus_init(training, k, &mut rng);
    let mut assignments = vec![usize::MAX; training.len()];
    let mut iterations = 0u32;
    let mut changed = true;
    while changed && iterations < MAX_ITERATIONS {
        // Assignment is the only step that scales with the training set size, and each vector's
        // nearest centroid is independent of every other's, so it is the one place per-bank
        // k-means hands work to the thread pool; the reduction below stays sequential and
        // order-independent of how the map above was scheduled, so results are bit-identical
        // regardless of thread count (see `test_deterministic`).
        let new_assignments: Vec<usize> =
            training.par_iter().map(|vec| nearest_index(&centroids, vec)).collect();
        changed = new_assignments != assignments;
        assignments = new_assignments;
        let mut sums = vec![vec![0u64; dim]; k];
        let mut counts = vec![0u64; k];
        for (i, vec) in training.iter().enumerate() {
            let c = assignments[i];
            counts[c] += 1;
            for d in 0..dim {
                sums[c][d] += u64::from(vec[d]);
            }
        }
        for c in 0..k {
            if counts[c] > 0 {
                for d in 0..dim {
                    let mean = sums[c][d] as f64 / counts[c] as f64;
                    centroids[c][d] = (mean.round() as u8).min((level_count - 1) as u8);
                }
            }
        }
        iterations += 1;
    }
    if changed {
        warnings.push(Warning::KMeansNotConverged { bank: bank_index, iterations });
    }
    centroids
}

fn kmeans_plus_plus_init(training: &[&[u8]], k: usize, rng: &mut SmallRng) -> Vec<Vec<u8>> {
    let n = training.len();
    let mut centroids: Vec<Vec<u8>> = Vec::with_capacity(k);
    centroids.push(training[rng.gen_range(0..n)].to_vec());
    let mut dist2 = vec![f64::INFINITY; n];
    while centroids.len() < k {
        let last = centroids.last().unwrap();
        let mut total = 0.0f64;
        for i in 0..n {
            let d = squared_dist(training[i], last);
            if d < dist2[i] {
                dist2[i] = d;
            }
            total += dist2[i];
        }
        if total <= 0.0 {
            centroids.push(training[centroids.len() % n].to_vec());
            continue;
        }
        let threshold = rng.gen::<f64>() * total;
        let mut acc = 0.0f64;
        let mut chosen = n - 1;
        for i in 0..n {
            acc += dist2[i];
            if acc >= threshold {
                chosen = i;
                break;
            }
        }
        centroids.push(training[chosen].to_vec());
    }
    centroids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vq_silence_short_circuit() {
        let codec = VqCodec::new(4, 5, 46);
        let levels = vec![0u8; 8192];
        let mut warnings = Vec::new();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.consumed, 8192);
        let codebook_bytes = 256 * 4;
        assert_eq!(&bank.bytes[..4], &[0, 0, 0, 0]);
        let indices = &bank.bytes[codebook_bytes..];
        assert_eq!(indices.len(), BANK_SIZE - codebook_bytes);
        assert!(indices[..2048].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_deterministic() {
        let codec = VqCodec::new(4, 0, 46);
        let mut levels = Vec::new();
        for i in 0..4096u32 {
            levels.push(((i * 7) % 46) as u8);
        }
        let mut w1 = Vec::new();
        let mut w2 = Vec::new();
        let bank1 = codec.encode_bank(&levels, 3, &mut w1).unwrap();
        let bank2 = codec.encode_bank(&levels, 3, &mut w2).unwrap();
        assert_eq!(bank1.bytes, bank2.bytes);
    }

    #[test]
    fn test_bank_is_full_size() {
        let codec = VqCodec::new(4, 0, 46);
        let levels = vec![3u8; 100];
        let mut warnings = Vec::new();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.bytes.len(), BANK_SIZE);
    }

    #[test]
    fn test_tail_not_divisible_by_vec_size_is_fully_consumed() {
        let codec = VqCodec::new(4, 0, 46);
        let levels = vec![3u8; 101];
        let mut warnings = Vec::new();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.consumed, 101);
        assert_eq!(bank.bytes.len(), BANK_SIZE);
    }
}
