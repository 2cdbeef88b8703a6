#![forbid(unsafe_code)]

//! Warp-layout AES-128 ECB.
//!
//! Lanes are grouped 32 to a warp and warps into execution groups. Each group
//! stages the AES tables into its own memory, meets at a single barrier, then
//! every lane encrypts one block through the T-table round loop. Every warp of
//! a group runs on its own thread; groups are launched in waves.

pub mod config;
pub mod layout;
pub mod round;
mod kernel;

pub use config::{FinalRound, LaunchConfig, TailPolicy, DEFAULT_LANES_PER_GROUP};
pub use kernel::{encrypt_ecb, EcbKernel, LaunchPlan, LaunchReport};
pub use round::encrypt_block;
