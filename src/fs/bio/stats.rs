use core::sync::atomic::{AtomicU64, Ordering};

/// Contadores do buffer cache (lock-free).
#[derive(Debug, Default)]
pub struct BcacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    disk_reads: AtomicU64,
    disk_writes: AtomicU64,
    rescans: AtomicU64,
}

/// Cópia pontual dos contadores.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BcacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Slots com identidade anterior que foram reaproveitados
    pub evictions: u64,
    pub disk_reads: u64,
    pub disk_writes: u64,
    /// Vítimas que mudaram entre a varredura e a revalidação
    pub rescans: u64,
}

macro_rules! counter {
    ($name:ident, $field:ident) => {
        #[inline]
        pub(super) fn $name(&self) {
            self.$field.fetch_add(1, Ordering::Relaxed);
        }
    };
}

impl BcacheStats {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            disk_reads: AtomicU64::new(0),
            disk_writes: AtomicU64::new(0),
            rescans: AtomicU64::new(0),
        }
    }

    counter!(hit, hits);
    counter!(miss, misses);
    counter!(eviction, evictions);
    counter!(disk_read, disk_reads);
    counter!(disk_write, disk_writes);
    counter!(rescan, rescans);

    pub fn snapshot(&self) -> BcacheStatsSnapshot {
        BcacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            disk_reads: self.disk_reads.load(Ordering::Relaxed),
            disk_writes: self.disk_writes.load(Ordering::Relaxed),
            rescans: self.rescans.load(Ordering::Relaxed),
        }
    }
}
