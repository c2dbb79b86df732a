use core::sync::atomic::{AtomicUsize, Ordering};

/// Contadores do alocador (lock-free).
#[derive(Debug, Default)]
pub struct KmemStats {
    allocs: AtomicUsize,
    frees: AtomicUsize,
    failed_allocs: AtomicUsize,
    steals: AtomicUsize,
    stolen_frames: AtomicUsize,
}

/// Cópia pontual dos contadores.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KmemStatsSnapshot {
    pub allocs: usize,
    pub frees: usize,
    pub failed_allocs: usize,
    /// Quantas vezes um core vazio roubou de outros
    pub steals: usize,
    /// Total de frames movidos por roubos
    pub stolen_frames: usize,
}

impl KmemStats {
    pub const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
            failed_allocs: AtomicUsize::new(0),
            steals: AtomicUsize::new(0),
            stolen_frames: AtomicUsize::new(0),
        }
    }

    pub fn inc_alloc(&self) {
        self.allocs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_free(&self) {
        self.frees.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.failed_allocs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_steal(&self, frames: usize) {
        self.steals.fetch_add(1, Ordering::Relaxed);
        self.stolen_frames.fetch_add(frames, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> KmemStatsSnapshot {
        KmemStatsSnapshot {
            allocs: self.allocs.load(Ordering::Relaxed),
            frees: self.frees.load(Ordering::Relaxed),
            failed_allocs: self.failed_allocs.load(Ordering::Relaxed),
            steals: self.steals.load(Ordering::Relaxed),
            stolen_frames: self.stolen_frames.load(Ordering::Relaxed),
        }
    }
}
