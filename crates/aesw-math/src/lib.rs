#![no_std]
#![forbid(unsafe_code)]

//! GF(2^8) arithmetic and the AES-128 lookup tables built from it.

pub mod scalar;
pub mod aes;

pub use aes::{sub_byte, RoundTables, TableSet, AES_TABLES};
pub use scalar::{inv_gf8, mul_gf8, xtime};
