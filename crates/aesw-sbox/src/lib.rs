#![no_std]
#![forbid(unsafe_code)]

//! Table-free, constant-time AES SubBytes over 32 bytes at a time.
//!
//! Bytes are carried as eight bit-planes: plane `b` holds bit `b` of every
//! byte, byte `i` lives in bit `i` of each plane.

mod circuit;

pub use circuit::{sbox, sbox_planes};

use zeroize::Zeroize;

/// Bytes per circuit evaluation.
pub const LANES: usize = 32;
/// Bit-planes per register set.
pub const PLANES: usize = 8;

/// Register set of eight bit-planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroize)]
pub struct BitPlanes(pub [u32; PLANES]);

impl BitPlanes {
    /// Transpose 32 bytes into bit-planes.
    pub fn pack(bytes: &[u8; LANES]) -> Self {
        let mut planes = [0u32; PLANES];
        for (lane, &byte) in bytes.iter().enumerate() {
            for (bit, plane) in planes.iter_mut().enumerate() {
                *plane |= (((byte >> bit) & 1) as u32) << lane;
            }
        }
        Self(planes)
    }

    pub fn unpack(&self) -> [u8; LANES] {
        let mut bytes = [0u8; LANES];
        for (lane, byte) in bytes.iter_mut().enumerate() {
            for (bit, plane) in self.0.iter().enumerate() {
                *byte |= (((plane >> lane) & 1) as u8) << bit;
            }
        }
        bytes
    }

    /// The same byte in every lane.
    pub fn splat(byte: u8) -> Self {
        let mut planes = [0u32; PLANES];
        for (bit, plane) in planes.iter_mut().enumerate() {
            *plane = 0u32.wrapping_sub(((byte >> bit) & 1) as u32);
        }
        Self(planes)
    }

    #[inline]
    pub fn substitute(&mut self) {
        sbox_planes(&mut self.0);
    }
}

/// SubBytes over any slice. Each 32-byte batch costs one circuit evaluation;
/// a short final batch is zero-padded internally.
pub fn sub_bytes(bytes: &mut [u8]) {
    for chunk in bytes.chunks_mut(LANES) {
        let mut batch = [0u8; LANES];
        batch[..chunk.len()].copy_from_slice(chunk);

        let mut planes = BitPlanes::pack(&batch);
        planes.substitute();
        let out = planes.unpack();
        chunk.copy_from_slice(&out[..chunk.len()]);

        batch.zeroize();
        planes.zeroize();
    }
}

/// SubBytes of one state word.
pub fn sub_word(word: u32) -> u32 {
    let mut bytes = word.to_le_bytes();
    sub_bytes(&mut bytes);
    u32::from_le_bytes(bytes)
}
