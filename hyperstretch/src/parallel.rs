//! Data-parallel helpers for element-wise sample transforms.
//!
//! Only element-wise maps run in parallel. Every output sample depends on its
//! own input alone, so results are identical for any thread count.

use rayon::prelude::*;

/// Multiplier for number of chunks relative to CPU threads.
const CHUNKS_PER_THREAD: usize = 2;

/// Buffers below this size are processed on the calling thread.
const MIN_PARALLEL_LEN: usize = 1 << 14;

#[inline]
fn chunk_len(len: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (len / num_chunks).max(MIN_PARALLEL_LEN)
}

/// Apply `f` to every value of `data` in place.
pub fn map_in_place<F>(data: &mut [f32], f: F)
where
    F: Fn(f32) -> f32 + Sync + Send,
{
    if data.len() < MIN_PARALLEL_LEN {
        data.iter_mut().for_each(|v| *v = f(*v));
        return;
    }

    data.par_chunks_mut(chunk_len(data.len()))
        .for_each(|chunk| chunk.iter_mut().for_each(|v| *v = f(*v)));
}

/// Apply `f` to fixed-size groups of values (one pixel's channels) in place.
///
/// `group` must divide `data.len()`.
pub fn map_groups_in_place<F>(data: &mut [f32], group: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    debug_assert!(group > 0 && data.len() % group == 0);

    if data.len() < MIN_PARALLEL_LEN {
        data.chunks_exact_mut(group)
            .enumerate()
            .for_each(|(i, px)| f(i, px));
        return;
    }

    let pixels_per_chunk = chunk_len(data.len()) / group + 1;
    data.par_chunks_mut(pixels_per_chunk * group)
        .enumerate()
        .for_each(|(chunk_idx, chunk)| {
            let start = chunk_idx * pixels_per_chunk;
            chunk
                .chunks_exact_mut(group)
                .enumerate()
                .for_each(|(i, px)| f(start + i, px));
        });
}

/// Collapse fixed-size groups of `data` into one value each.
///
/// `group` must divide `data.len()`. Output order matches group order.
pub fn map_groups<F>(data: &[f32], group: usize, f: F) -> Vec<f32>
where
    F: Fn(&[f32]) -> f32 + Sync + Send,
{
    debug_assert!(group > 0 && data.len() % group == 0);

    if data.len() < MIN_PARALLEL_LEN {
        return data.chunks_exact(group).map(f).collect();
    }

    data.par_chunks_exact(group)
        .with_min_len(chunk_len(data.len()) / group)
        .map(f)
        .collect()
}
