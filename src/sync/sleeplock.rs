//! SleepLock - lock que pode bloquear por tempo longo
//!
//! Protege o conteúdo dos buffers de disco durante I/O. Quem espera cede a
//! CPU (`CpuOps::sleep_wait`) em vez de girar com interrupções desligadas.
//!
//! # Diferença do Spinlock
//!
//! - SleepLock PODE ser retido durante I/O e entre chamadas
//! - Nunca adquira um SleepLock segurando um Spinlock

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use crate::arch::CpuOps;
use crate::sync::Spinlock;

const NO_HOLDER: usize = usize::MAX;

struct SleepState {
    locked: bool,
    /// Task que detém o lock (para `holding`)
    holder: usize,
}

/// Lock dormível com registro de dono.
pub struct SleepLock<T, C: CpuOps> {
    /// Estado interno, protegido por spinlock curto
    state: Spinlock<SleepState, C>,
    /// Dados protegidos
    data: UnsafeCell<T>,
}

// SAFETY: acesso a `data` só ocorre através de SleepLockGuard, que é único
unsafe impl<T: Send, C: CpuOps> Sync for SleepLock<T, C> {}

impl<T, C: CpuOps> SleepLock<T, C> {
    pub const fn new(name: &'static str, data: T) -> Self {
        Self {
            state: Spinlock::new(name, SleepState {
                locked: false,
                holder: NO_HOLDER,
            }),
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock (pode dormir)
    pub fn lock(&self) -> SleepLockGuard<'_, T, C> {
        loop {
            {
                let mut s = self.state.lock();
                if !s.locked {
                    s.locked = true;
                    s.holder = C::current_task_id();
                    break;
                }
            }
            // Spinlock já foi solto aqui
            C::sleep_wait();
        }
        SleepLockGuard { lock: self }
    }

    /// O contexto atual detém este lock?
    pub fn holding(&self) -> bool {
        let s = self.state.lock();
        s.locked && s.holder == C::current_task_id()
    }
}

/// Guard do sleep lock.
///
/// Pode atravessar contextos (Send), mas `holding()` só é verdadeiro para
/// a task que adquiriu.
pub struct SleepLockGuard<'a, T, C: CpuOps> {
    lock: &'a SleepLock<T, C>,
}

impl<T, C: CpuOps> SleepLockGuard<'_, T, C> {
    /// O contexto atual é quem adquiriu este guard?
    pub fn held_by_current(&self) -> bool {
        self.lock.holding()
    }
}

impl<T, C: CpuOps> Deref for SleepLockGuard<'_, T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, C: CpuOps> DerefMut for SleepLockGuard<'_, T, C> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, C: CpuOps> Drop for SleepLockGuard<'_, T, C> {
    fn drop(&mut self) {
        let mut s = self.lock.state.lock();
        s.locked = false;
        s.holder = NO_HOLDER;
        // Waiters re-testam no próximo sleep_wait
    }
}
