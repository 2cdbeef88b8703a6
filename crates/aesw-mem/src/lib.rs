#![no_std]
#![forbid(unsafe_code)]

//! Group-local table memory.
//!
//! Every execution group copies the global AES tables into its own
//! [`GroupCache`] before any lane performs a lookup. The copy is split across
//! the lanes of the group; completion is tracked so a lookup view can only be
//! taken from fully staged memory.

extern crate alloc;
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::{Deref, Range};
use core::sync::atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};

use aesw_core::{AeswError, AeswResult};
use aesw_math::aes::TABLE_ENTRIES;
use aesw_math::{RoundTables, TableSet};
use spin::Mutex;

/// Four T-tables plus the S-box.
pub const TABLES_PER_INDEX: usize = 5;
/// 4 x 256 words + 256 bytes.
pub const STAGED_ELEMENTS: usize = TABLES_PER_INDEX * TABLE_ENTRIES;

pub struct GroupCache {
    te: [[AtomicU32; TABLE_ENTRIES]; 4],
    sbox: [AtomicU8; TABLE_ENTRIES],
    staged: AtomicUsize,
}

impl Default for GroupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupCache {
    pub fn new() -> Self {
        Self {
            te: core::array::from_fn(|_| core::array::from_fn(|_| AtomicU32::new(0))),
            sbox: core::array::from_fn(|_| AtomicU8::new(0)),
            staged: AtomicUsize::new(0),
        }
    }

    /// Table indices copied by lane `tid` of a `lanes`-wide group.
    ///
    /// Indices are split evenly; the last lane also takes `256 % lanes`.
    /// With more lanes than indices, lanes `0..256` copy one index each.
    pub fn lane_share(tid: usize, lanes: usize) -> Range<usize> {
        if lanes == 0 || tid >= lanes {
            return 0..0;
        }
        let per_lane = TABLE_ENTRIES / lanes;
        if per_lane == 0 {
            return if tid < TABLE_ENTRIES { tid..tid + 1 } else { 0..0 };
        }
        let start = tid * per_lane;
        let mut end = start + per_lane;
        if tid == lanes - 1 {
            end += TABLE_ENTRIES % lanes;
        }
        start..end
    }

    /// Copy lane `tid`'s share of `src`. Each lane stages exactly once.
    pub fn stage_lane(&self, src: &TableSet, tid: usize, lanes: usize) {
        let share = Self::lane_share(tid, lanes);
        if share.is_empty() {
            return;
        }
        for idx in share.clone() {
            for (dst, table) in self.te.iter().zip(src.te.iter()) {
                dst[idx].store(table[idx], Ordering::Relaxed);
            }
            self.sbox[idx].store(src.sbox[idx], Ordering::Relaxed);
        }
        self.staged.fetch_add(share.len() * TABLES_PER_INDEX, Ordering::Release);
    }

    /// Elements copied so far.
    pub fn staged(&self) -> usize {
        self.staged.load(Ordering::Acquire)
    }

    pub fn is_ready(&self) -> bool {
        self.staged() == STAGED_ELEMENTS
    }

    /// Read-only lookup view. Fails until all 1280 elements are staged.
    pub fn view(&self) -> AeswResult<StagedTables<'_>> {
        if !self.is_ready() {
            return Err(AeswError::UninitializedTables);
        }
        Ok(StagedTables { cache: self })
    }

    /// Wipe contents; the next group has to stage again.
    pub fn reset(&self) {
        for table in self.te.iter() {
            for slot in table.iter() {
                slot.store(0, Ordering::Relaxed);
            }
        }
        for slot in self.sbox.iter() {
            slot.store(0, Ordering::Relaxed);
        }
        self.staged.store(0, Ordering::Release);
    }
}

/// Lookup view over fully staged group memory.
#[derive(Clone, Copy)]
pub struct StagedTables<'a> {
    cache: &'a GroupCache,
}

impl RoundTables for StagedTables<'_> {
    #[inline(always)]
    fn te1(&self, index: u8) -> u32 { self.cache.te[0][index as usize].load(Ordering::Relaxed) }
    #[inline(always)]
    fn te2(&self, index: u8) -> u32 { self.cache.te[1][index as usize].load(Ordering::Relaxed) }
    #[inline(always)]
    fn te3(&self, index: u8) -> u32 { self.cache.te[2][index as usize].load(Ordering::Relaxed) }
    #[inline(always)]
    fn te4(&self, index: u8) -> u32 { self.cache.te[3][index as usize].load(Ordering::Relaxed) }
    #[inline(always)]
    fn sbox(&self, index: u8) -> u8 { self.cache.sbox[index as usize].load(Ordering::Relaxed) }
}

/// Fixed set of group memories, one per group in flight.
///
/// Memories never leave the pool; a lease borrows one by slot index.
pub struct CachePool {
    caches: Box<[GroupCache]>,
    free: Mutex<Vec<usize>>,
}

pub struct CacheLease {
    slot: usize,
    pool: Arc<CachePool>,
}

impl CachePool {
    pub fn new(capacity: usize) -> Arc<Self> {
        let caches = (0..capacity).map(|_| GroupCache::new()).collect();
        let free = (0..capacity).rev().collect();
        Arc::new(Self { caches, free: Mutex::new(free) })
    }

    pub fn alloc(self: &Arc<Self>) -> Option<CacheLease> {
        let slot = self.free.lock().pop()?;
        Some(CacheLease { slot, pool: self.clone() })
    }

    fn release(&self, slot: usize) {
        self.caches[slot].reset();
        self.free.lock().push(slot);
    }

    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.caches.len()
    }
}

impl CacheLease {
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl Deref for CacheLease {
    type Target = GroupCache;
    fn deref(&self) -> &Self::Target {
        &self.pool.caches[self.slot]
    }
}

impl Drop for CacheLease {
    fn drop(&mut self) {
        self.pool.release(self.slot);
    }
}
