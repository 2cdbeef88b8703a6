//! AES-128 reference constants (FIPS-197).
//!
//! The forward S-box is derived from the field inverse plus the affine map;
//! the four T-tables are derived from the S-box. Everything is evaluated at
//! compile time and lives in `.rodata`.
//!
//! Words use the column convention of the ECB kernel: row 0 in the low byte.

use crate::scalar::{inv_gf8, xtime};

pub const TABLE_ENTRIES: usize = 256;

/// The S-box affine constant.
pub const AFFINE_CONST: u8 = 0x63;

/// b ^ rotl(b,1) ^ rotl(b,2) ^ rotl(b,3) ^ rotl(b,4) ^ 0x63
#[inline(always)]
pub const fn affine(b: u8) -> u8 {
    b ^ b.rotate_left(1) ^ b.rotate_left(2) ^ b.rotate_left(3) ^ b.rotate_left(4) ^ AFFINE_CONST
}

/// Forward S-box by definition: affine map of the field inverse.
pub const fn sub_byte(b: u8) -> u8 {
    affine(inv_gf8(b))
}

const fn gen_sbox() -> [u8; TABLE_ENTRIES] {
    let mut sbox = [0u8; TABLE_ENTRIES];
    let mut x = 0;
    while x < TABLE_ENTRIES {
        sbox[x] = sub_byte(x as u8);
        x += 1;
    }
    sbox
}

#[inline(always)]
const fn pack(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    (b0 as u32) | ((b1 as u32) << 8) | ((b2 as u32) << 16) | ((b3 as u32) << 24)
}

/// Reference dataset consumed by the kernel's staging phase.
pub struct TableSet {
    /// te[n][x]: SubBytes of `x` pushed through MixColumns column `n`.
    pub te: [[u32; TABLE_ENTRIES]; 4],
    pub sbox: [u8; TABLE_ENTRIES],
}

const fn gen_aes_tables() -> TableSet {
    let sbox = gen_sbox();
    let mut te = [[0u32; TABLE_ENTRIES]; 4];
    let mut x = 0;
    while x < TABLE_ENTRIES {
        let s1 = sbox[x];
        let s2 = xtime(s1);
        let s3 = s2 ^ s1;
        // MixColumns matrix columns: (2,1,1,3) (3,2,1,1) (1,3,2,1) (1,1,3,2)
        te[0][x] = pack(s2, s1, s1, s3);
        te[1][x] = pack(s3, s2, s1, s1);
        te[2][x] = pack(s1, s3, s2, s1);
        te[3][x] = pack(s1, s1, s3, s2);
        x += 1;
    }
    TableSet { te, sbox }
}

pub static AES_TABLES: TableSet = gen_aes_tables();

/// Read access to the round lookup tables, wherever they currently live.
pub trait RoundTables {
    fn te1(&self, index: u8) -> u32;
    fn te2(&self, index: u8) -> u32;
    fn te3(&self, index: u8) -> u32;
    fn te4(&self, index: u8) -> u32;
    fn sbox(&self, index: u8) -> u8;
}

impl RoundTables for TableSet {
    #[inline(always)]
    fn te1(&self, index: u8) -> u32 { self.te[0][index as usize] }
    #[inline(always)]
    fn te2(&self, index: u8) -> u32 { self.te[1][index as usize] }
    #[inline(always)]
    fn te3(&self, index: u8) -> u32 { self.te[2][index as usize] }
    #[inline(always)]
    fn te4(&self, index: u8) -> u32 { self.te[3][index as usize] }
    #[inline(always)]
    fn sbox(&self, index: u8) -> u8 { self.sbox[index as usize] }
}
