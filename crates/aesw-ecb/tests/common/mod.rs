#![allow(dead_code)]

use aesw_core::{RoundKeySchedule, ROUND_KEY_WORDS};
use aesw_math::{mul_gf8, sub_byte, xtime};

/// FIPS-197 Appendix C.1 key 000102...0f, expanded (little-endian words).
pub const FIPS_SCHEDULE: [u32; ROUND_KEY_WORDS] = [
    0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c,
    0xfd74aad6, 0xfa72afd2, 0xf178a6da, 0xfe76abd6,
    0x0bcf92b6, 0xf1bd3d64, 0x00c59bbe, 0xfeb33068,
    0x4e74ffb6, 0xbfc9c2d2, 0xbf0c596c, 0x41bf6904,
    0xbcf7f747, 0x033e3595, 0xbc326cf9, 0xfd8d05fd,
    0xe8a3aa3c, 0xeb9d9fa9, 0x57aff350, 0xaa22f6ad,
    0x7d0f395e, 0x9692a6f7, 0xc13d55a7, 0x6b1fa30a,
    0x1a70f914, 0x8ce25fe3, 0x4ddf0a44, 0x26c0a94e,
    0x35874347, 0xb9651ca4, 0xf4ba16e0, 0xd27abfae,
    0xd1329954, 0x685785f0, 0x9ced9310, 0x4e972cbe,
    0x7f1d1113, 0x174a94e3, 0x8ba707f3, 0xc5302b4d,
];

pub const FIPS_PLAINTEXT: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
    0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];

pub const FIPS_CIPHERTEXT: [u8; 16] = [
    0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30,
    0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
];

pub fn fips_keys() -> RoundKeySchedule {
    RoundKeySchedule::new(FIPS_SCHEDULE)
}

fn sub(b: u8) -> u8 {
    sub_byte(b)
}

/// Test-side AES-128 key expansion.
pub fn expand_key(key: &[u8; 16]) -> RoundKeySchedule {
    let mut w = [0u32; ROUND_KEY_WORDS];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        w[i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    let mut rcon = 1u8;
    for i in 4..ROUND_KEY_WORDS {
        let mut t = w[i - 1];
        if i % 4 == 0 {
            let b = t.rotate_right(8).to_le_bytes();
            t = u32::from_le_bytes([sub(b[0]), sub(b[1]), sub(b[2]), sub(b[3])]) ^ rcon as u32;
            rcon = xtime(rcon);
        }
        w[i] = w[i - 4] ^ t;
    }
    RoundKeySchedule::new(w)
}

/// Byte-oriented textbook AES-128, state column-major.
pub fn reference_encrypt(keys: &RoundKeySchedule, pt: &[u8; 16]) -> [u8; 16] {
    let mut s = *pt;
    add_round_key(&mut s, keys, 0);
    for round in 1..=10 {
        for b in s.iter_mut() {
            *b = sub(*b);
        }
        shift_rows(&mut s);
        if round != 10 {
            mix_columns(&mut s);
        }
        add_round_key(&mut s, keys, round);
    }
    s
}

fn add_round_key(s: &mut [u8; 16], keys: &RoundKeySchedule, round: usize) {
    for (c, w) in keys.quad(round).iter().enumerate() {
        for (r, kb) in w.to_le_bytes().iter().enumerate() {
            s[4 * c + r] ^= kb;
        }
    }
}

fn shift_rows(s: &mut [u8; 16]) {
    let old = *s;
    for c in 0..4 {
        for r in 0..4 {
            s[4 * c + r] = old[4 * ((c + r) % 4) + r];
        }
    }
}

fn mix_columns(s: &mut [u8; 16]) {
    for c in 0..4 {
        let a = [s[4 * c], s[4 * c + 1], s[4 * c + 2], s[4 * c + 3]];
        for r in 0..4 {
            s[4 * c + r] = mul_gf8(a[r], 2)
                ^ mul_gf8(a[(r + 1) % 4], 3)
                ^ a[(r + 2) % 4]
                ^ a[(r + 3) % 4];
        }
    }
}
