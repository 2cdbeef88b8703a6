//! Warp window layout.
//!
//! A window is 128 words owned by one warp. All word-0 values of its 32 blocks
//! come first, then all word-1 values, and so on, so that lane `i` of a warp
//! reading position `k` touches the word right after lane `i - 1`.

use aesw_core::{
    AeswError, AeswResult, Block, BLOCK_BYTES, WARP_SIZE, WINDOW_BYTES, WINDOW_WORDS,
    WORDS_PER_BLOCK,
};

/// Absolute index of word `k` of lane `lane`'s block in warp `warp`.
#[inline(always)]
pub const fn word_index(warp: usize, lane: usize, k: usize) -> usize {
    WINDOW_WORDS * warp + lane + WARP_SIZE * k
}

/// Load lane `lane`'s block from a single window.
#[inline(always)]
pub fn load_block(window: &[u32], lane: usize) -> Block {
    let mut words = [0u32; WORDS_PER_BLOCK];
    for (k, w) in words.iter_mut().enumerate() {
        *w = window[word_index(0, lane, k)];
    }
    Block(words)
}

#[inline(always)]
pub fn store_block(window: &mut [u32], lane: usize, block: &Block) {
    for (k, w) in block.0.iter().enumerate() {
        window[word_index(0, lane, k)] = *w;
    }
}

/// Whole windows in a buffer of `words` words, plus the leftover word count.
#[inline]
pub fn split_windows(words: usize) -> (usize, usize) {
    (words / WINDOW_WORDS, words % WINDOW_WORDS)
}

/// Blocks in natural byte order -> window layout. Input must be a whole
/// number of 512-byte windows.
pub fn pack_blocks(bytes: &[u8]) -> AeswResult<Vec<u32>> {
    if bytes.len() % WINDOW_BYTES != 0 {
        return Err(AeswError::InvalidInputSize);
    }
    let mut words = vec![0u32; bytes.len() / 4];
    for (idx, chunk) in bytes.chunks_exact(BLOCK_BYTES).enumerate() {
        let mut block = [0u8; BLOCK_BYTES];
        block.copy_from_slice(chunk);
        let (warp, lane) = (idx / WARP_SIZE, idx % WARP_SIZE);
        let window = &mut words[warp * WINDOW_WORDS..(warp + 1) * WINDOW_WORDS];
        store_block(window, lane, &Block::from_bytes(&block));
    }
    Ok(words)
}

/// Window layout -> blocks in natural byte order.
pub fn unpack_blocks(words: &[u32]) -> AeswResult<Vec<u8>> {
    if words.len() % WINDOW_WORDS != 0 {
        return Err(AeswError::InvalidInputSize);
    }
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for window in words.chunks_exact(WINDOW_WORDS) {
        for lane in 0..WARP_SIZE {
            bytes.extend_from_slice(&load_block(window, lane).to_bytes());
        }
    }
    Ok(bytes)
}
