use aesw_core::{AeswError, AeswResult, MAX_LANES_PER_GROUP, WARP_SIZE};

/// What to do with words past the last whole 512-byte window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Fail with `InvalidInputSize`.
    #[default]
    Reject,
    /// Encrypt the aligned prefix, leave the output tail untouched.
    AlignedPrefix,
}

/// SubBytes strategy for round 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalRound {
    /// Lookups into the staged S-box.
    #[default]
    Table,
    /// Constant-time bitsliced circuit.
    Bitsliced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Lanes per execution group; a whole number of warps.
    pub lanes_per_group: usize,
    /// `None` sizes the launch to the buffer.
    pub groups: Option<usize>,
    /// Groups running concurrently; each warp of a group gets a thread.
    pub groups_in_flight: usize,
    pub tail: TailPolicy,
    pub final_round: FinalRound,
}

pub const DEFAULT_LANES_PER_GROUP: usize = 256;

impl Default for LaunchConfig {
    fn default() -> Self {
        let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let warps = DEFAULT_LANES_PER_GROUP / WARP_SIZE;
        Self {
            lanes_per_group: DEFAULT_LANES_PER_GROUP,
            groups: None,
            groups_in_flight: core::cmp::max(1, cores / warps),
            tail: TailPolicy::Reject,
            final_round: FinalRound::Table,
        }
    }
}

impl LaunchConfig {
    pub fn validate(&self) -> AeswResult<()> {
        let lanes = self.lanes_per_group;
        if lanes == 0 || lanes % WARP_SIZE != 0 || lanes > MAX_LANES_PER_GROUP {
            return Err(AeswError::InvalidLaunch);
        }
        if self.groups_in_flight == 0 || self.groups == Some(0) {
            return Err(AeswError::InvalidLaunch);
        }
        Ok(())
    }

    #[inline]
    pub fn warps_per_group(&self) -> usize {
        self.lanes_per_group / WARP_SIZE
    }
}
