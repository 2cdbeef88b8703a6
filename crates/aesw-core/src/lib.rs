#![no_std]
#![forbid(unsafe_code)]
#[cfg(feature = "std")]
extern crate std;

use zeroize::{Zeroize, ZeroizeOnDrop};

// --- Execution Geometry ---
pub const WARP_SIZE: usize = 32;
pub const WORDS_PER_BLOCK: usize = 4;
pub const BLOCK_BYTES: usize = 16;

/// One warp window: 32 blocks of 4 words, stored position-major.
pub const WINDOW_WORDS: usize = WARP_SIZE * WORDS_PER_BLOCK;
pub const WINDOW_BYTES: usize = WINDOW_WORDS * 4;

/// Hardware ceiling for a cooperative group.
pub const MAX_LANES_PER_GROUP: usize = 1024;

// --- AES-128 ---
pub const ROUNDS: usize = 10;
pub const ROUND_KEY_WORDS: usize = (ROUNDS + 1) * WORDS_PER_BLOCK;
pub const ROUND_KEY_BYTES: usize = ROUND_KEY_WORDS * 4;

/// 128 bits of cipher state. Word `k` is column `k`, row 0 in the low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroize)]
pub struct Block(pub [u32; WORDS_PER_BLOCK]);

impl Block {
    pub fn from_bytes(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let mut words = [0u32; WORDS_PER_BLOCK];
        for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_BYTES] {
        let mut out = [0u8; BLOCK_BYTES];
        for (chunk, w) in out.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
        out
    }
}

/// Expanded AES-128 key: 11 round-key quads, produced by the caller.
/// Read-only once built; wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeySchedule([u32; ROUND_KEY_WORDS]);

impl RoundKeySchedule {
    pub const fn new(words: [u32; ROUND_KEY_WORDS]) -> Self {
        Self(words)
    }

    pub fn from_words(words: &[u32]) -> AeswResult<Self> {
        let words: [u32; ROUND_KEY_WORDS] = words
            .try_into()
            .map_err(|_| AeswError::InvalidKeySchedule)?;
        Ok(Self(words))
    }

    /// 176 bytes, little-endian words in schedule order.
    pub fn from_bytes(bytes: &[u8]) -> AeswResult<Self> {
        if bytes.len() != ROUND_KEY_BYTES {
            return Err(AeswError::InvalidKeySchedule);
        }
        let mut words = [0u32; ROUND_KEY_WORDS];
        for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self(words))
    }

    #[inline(always)]
    pub fn words(&self) -> &[u32; ROUND_KEY_WORDS] {
        &self.0
    }

    /// Round-key quad `round` (0..=10).
    #[inline(always)]
    pub fn quad(&self, round: usize) -> [u32; WORDS_PER_BLOCK] {
        let base = round * WORDS_PER_BLOCK;
        [self.0[base], self.0[base + 1], self.0[base + 2], self.0[base + 3]]
    }
}

impl core::fmt::Debug for RoundKeySchedule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RoundKeySchedule([REDACTED])")
    }
}

pub type AeswResult<T> = Result<T, AeswError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeswError {
    /// Buffer is not a whole number of 512-byte warp windows.
    InvalidInputSize,
    OutputSizeMismatch,
    /// Group memory was read before staging completed.
    UninitializedTables,
    InvalidKeySchedule,
    InvalidLaunch,
    /// An explicit launch size cannot cover every window.
    InsufficientLanes,
    GroupMemoryExhausted,
    WorkerPanicked,
}

impl core::fmt::Display for AeswError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AeswError {}
