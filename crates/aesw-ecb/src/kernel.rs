use aesw_core::{AeswError, AeswResult, RoundKeySchedule, WARP_SIZE, WINDOW_WORDS};
use aesw_math::TableSet;
use aesw_mem::{CacheLease, CachePool, GroupCache};
use log::{debug, trace, warn};
use std::sync::Barrier;
use zeroize::Zeroize;

use crate::config::{LaunchConfig, TailPolicy};
use crate::{layout, round};

/// Static work partition for one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchPlan {
    pub windows: usize,
    pub groups: usize,
    pub warps_per_group: usize,
    pub groups_in_flight: usize,
}

impl LaunchPlan {
    pub fn new(config: &LaunchConfig, windows: usize) -> AeswResult<Self> {
        config.validate()?;
        let warps_per_group = config.warps_per_group();
        let needed = windows.div_ceil(warps_per_group);
        let groups = match config.groups {
            None => needed,
            Some(g) if g >= needed => g,
            Some(_) => return Err(AeswError::InsufficientLanes),
        };
        Ok(Self {
            windows,
            groups,
            warps_per_group,
            groups_in_flight: config.groups_in_flight,
        })
    }

    pub fn total_warps(&self) -> usize {
        self.groups * self.warps_per_group
    }

    /// Groups owning at least one window.
    pub fn active_groups(&self) -> usize {
        self.windows.div_ceil(self.warps_per_group)
    }

    pub fn idle_warps(&self) -> usize {
        self.total_warps() - self.windows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchReport {
    pub groups: usize,
    pub active_groups: usize,
    pub warps: usize,
    pub active_warps: usize,
    pub blocks: usize,
    /// Trailing words left untouched under `TailPolicy::AlignedPrefix`.
    pub skipped_words: usize,
}

/// Table-based AES-128 ECB over window-layout buffers.
pub struct EcbKernel<'a> {
    keys: &'a RoundKeySchedule,
    tables: &'a TableSet,
    config: LaunchConfig,
}

impl<'a> EcbKernel<'a> {
    pub fn new(keys: &'a RoundKeySchedule, tables: &'a TableSet, config: LaunchConfig) -> AeswResult<Self> {
        config.validate()?;
        Ok(Self { keys, tables, config })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Encrypt `input` into `output`; both in the window layout.
    pub fn launch(&self, input: &[u32], output: &mut [u32]) -> AeswResult<LaunchReport> {
        if output.len() != input.len() {
            return Err(AeswError::OutputSizeMismatch);
        }

        let (windows, tail) = layout::split_windows(input.len());
        if tail != 0 {
            match self.config.tail {
                TailPolicy::Reject => return Err(AeswError::InvalidInputSize),
                TailPolicy::AlignedPrefix => {
                    warn!("[ECB] {} trailing words outside any window, left unprocessed", tail);
                }
            }
        }

        let plan = LaunchPlan::new(&self.config, windows)?;
        debug!(
            "[ECB] plan: {} windows -> {} groups x {} warps ({} idle), {} in flight",
            plan.windows, plan.groups, plan.warps_per_group, plan.idle_warps(), plan.groups_in_flight
        );

        let aligned = windows * WINDOW_WORDS;
        let blocks = self.run(&plan, &input[..aligned], &mut output[..aligned])?;

        Ok(LaunchReport {
            groups: plan.groups,
            active_groups: plan.active_groups(),
            warps: plan.total_warps(),
            active_warps: plan.windows,
            blocks,
            skipped_words: tail,
        })
    }

    fn run(&self, plan: &LaunchPlan, input: &[u32], output: &mut [u32]) -> AeswResult<usize> {
        let wpg = plan.warps_per_group;
        let group_span = WINDOW_WORDS * wpg;
        let in_flight = plan.groups_in_flight.min(plan.active_groups()).max(1);
        let pool = CachePool::new(in_flight);

        // Groups past active_groups own no window and have nothing to stage for.
        let mut work = input.chunks(group_span).zip(output.chunks_mut(group_span)).enumerate().peekable();
        let mut blocks = 0;

        while work.peek().is_some() {
            let wave: Vec<_> = work.by_ref().take(in_flight).collect();
            let caches = wave
                .iter()
                .map(|_| pool.alloc().ok_or(AeswError::GroupMemoryExhausted))
                .collect::<AeswResult<Vec<CacheLease>>>()?;
            let barriers: Vec<Barrier> = wave.iter().map(|_| Barrier::new(wpg)).collect();

            let results = std::thread::scope(|s| {
                let mut handles = Vec::with_capacity(wave.len() * wpg);
                for (((group, (src, dst)), cache), barrier) in wave.into_iter().zip(&caches).zip(&barriers) {
                    trace!("[ECB] group {} start", group);
                    let mut src_windows = src.chunks(WINDOW_WORDS);
                    let mut dst_windows = dst.chunks_mut(WINDOW_WORDS);
                    for warp in 0..wpg {
                        let window = src_windows.next().zip(dst_windows.next());
                        let cache: &GroupCache = cache;
                        handles.push(s.spawn(move || self.run_warp(cache, barrier, warp, window)));
                    }
                }
                // Join everything before judging, so no panic escapes the scope.
                handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
            });

            for result in results {
                blocks += result.map_err(|_| AeswError::WorkerPanicked)??;
            }
        }

        Ok(blocks)
    }

    /// One warp: stage its lanes' share, rendezvous, then 32 blocks.
    fn run_warp(
        &self,
        cache: &GroupCache,
        barrier: &Barrier,
        warp: usize,
        window: Option<(&[u32], &mut [u32])>,
    ) -> AeswResult<usize> {
        let lanes = self.config.lanes_per_group;
        let first_lane = warp * WARP_SIZE;
        for tid in first_lane..first_lane + WARP_SIZE {
            cache.stage_lane(self.tables, tid, lanes);
        }

        barrier.wait();

        // Idle guard: no window, no memory traffic.
        let Some((src, dst)) = window else {
            return Ok(0);
        };

        let tables = cache.view()?;
        for lane in 0..WARP_SIZE {
            let block = layout::load_block(src, lane);
            let mut out = round::encrypt_block(&tables, self.keys, block, self.config.final_round);
            layout::store_block(dst, lane, &out);
            out.zeroize();
        }
        Ok(WARP_SIZE)
    }
}

/// One-shot launch with a fresh kernel.
pub fn encrypt_ecb(
    keys: &RoundKeySchedule,
    tables: &TableSet,
    config: LaunchConfig,
    input: &[u32],
    output: &mut [u32],
) -> AeswResult<LaunchReport> {
    EcbKernel::new(keys, tables, config)?.launch(input, output)
}
