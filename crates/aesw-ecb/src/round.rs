//! Per-lane AES-128 round protocol.
//!
//! ShiftRows is folded into which byte of which word feeds each lookup, so
//! the state never moves between words.

use aesw_core::{Block, RoundKeySchedule, ROUNDS, WORDS_PER_BLOCK};
use aesw_math::RoundTables;
use zeroize::Zeroize;

use crate::config::FinalRound;

#[inline(always)]
fn byte(w: u32, shift: u32) -> u8 {
    (w >> shift) as u8
}

/// One T-table round output word: column from `a`, rows 1..3 from `b`, `c`, `d`.
#[inline(always)]
fn t_column<T: RoundTables + ?Sized>(t: &T, a: u32, b: u32, c: u32, d: u32) -> u32 {
    t.te4(byte(d, 24)) ^ t.te3(byte(c, 16)) ^ t.te2(byte(b, 8)) ^ t.te1(byte(a, 0))
}

#[inline(always)]
fn s_column<T: RoundTables + ?Sized>(t: &T, a: u32, b: u32, c: u32, d: u32) -> u32 {
    (t.sbox(byte(a, 0)) as u32)
        | (t.sbox(byte(b, 8)) as u32) << 8
        | (t.sbox(byte(c, 16)) as u32) << 16
        | (t.sbox(byte(d, 24)) as u32) << 24
}

/// Byte `r` of the result comes from byte `r` of the `r`-th argument.
#[inline(always)]
fn shifted(a: u32, b: u32, c: u32, d: u32) -> u32 {
    (a & 0x0000_00ff) | (b & 0x0000_ff00) | (c & 0x00ff_0000) | (d & 0xff00_0000)
}

/// Encrypt one block: AddRoundKey, 9 table rounds, final round.
#[inline]
pub fn encrypt_block<T: RoundTables + ?Sized>(
    t: &T,
    keys: &RoundKeySchedule,
    block: Block,
    final_round: FinalRound,
) -> Block {
    let k = keys.words();
    let [mut w1, mut w2, mut w3, mut w4] = block.0;

    w1 ^= k[0];
    w2 ^= k[1];
    w3 ^= k[2];
    w4 ^= k[3];

    for round in 1..ROUNDS {
        let s1 = t_column(t, w1, w2, w3, w4);
        let s2 = t_column(t, w2, w3, w4, w1);
        let s3 = t_column(t, w3, w4, w1, w2);
        let s4 = t_column(t, w4, w1, w2, w3);

        let base = round * WORDS_PER_BLOCK;
        w1 = s1 ^ k[base];
        w2 = s2 ^ k[base + 1];
        w3 = s3 ^ k[base + 2];
        w4 = s4 ^ k[base + 3];
    }

    // No MixColumns in the last round
    let last = keys.quad(ROUNDS);
    let out = match final_round {
        FinalRound::Table => [
            s_column(t, w1, w2, w3, w4),
            s_column(t, w2, w3, w4, w1),
            s_column(t, w3, w4, w1, w2),
            s_column(t, w4, w1, w2, w3),
        ],
        FinalRound::Bitsliced => bitsliced_final(w1, w2, w3, w4),
    };

    Block([out[0] ^ last[0], out[1] ^ last[1], out[2] ^ last[2], out[3] ^ last[3]])
}

/// ShiftRows + SubBytes through one 32-lane circuit evaluation.
fn bitsliced_final(w1: u32, w2: u32, w3: u32, w4: u32) -> [u32; WORDS_PER_BLOCK] {
    let cols = [
        shifted(w1, w2, w3, w4),
        shifted(w2, w3, w4, w1),
        shifted(w3, w4, w1, w2),
        shifted(w4, w1, w2, w3),
    ];
    let mut bytes = Block(cols).to_bytes();
    aesw_sbox::sub_bytes(&mut bytes);
    let out = Block::from_bytes(&bytes).0;
    bytes.zeroize();
    out
}
