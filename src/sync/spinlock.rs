//! Spinlock - bloqueio com busy-wait
//!
//! Wrapper sobre `spin::Mutex` que acrescenta o que o kernel precisa:
//! desabilita interrupções durante a seção crítica (push_off/pop_off),
//! registra o dono para `holding()` e detecta aquisição recursiva.

use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::arch::{CpuOps, IrqGuard};

/// Valor de `owner` quando ninguém detém o lock.
const NO_OWNER: usize = usize::MAX;

/// Spinlock - usa busy-wait, NÃO pode dormir
///
/// # Quando usar
///
/// - Seções críticas MUITO curtas (buckets do cache, listas livres)
/// - Quando não pode chamar scheduler
///
/// # Quando NÃO usar
///
/// - Para proteger I/O lento (use `SleepLock`)
///
/// Adquirir o mesmo spinlock duas vezes no mesmo contexto é bug fatal:
/// `lock()` entra em pânico com `acquire: <nome>` em vez de travar.
pub struct Spinlock<T, C: CpuOps> {
    name: &'static str,
    owner: AtomicUsize,
    inner: spin::Mutex<T>,
    _cpu: PhantomData<fn() -> C>,
}

impl<T, C: CpuOps> Spinlock<T, C> {
    /// Cria novo spinlock
    pub const fn new(name: &'static str, data: T) -> Self {
        Self {
            name,
            owner: AtomicUsize::new(NO_OWNER),
            inner: spin::Mutex::new(data),
            _cpu: PhantomData,
        }
    }

    /// Adquire o lock
    pub fn lock(&self) -> SpinlockGuard<'_, T, C> {
        // Desabilitar interrupções antes de adquirir
        let irq = IrqGuard::<C>::new();

        if self.holding() {
            panic!("acquire: {}", self.name);
        }

        let guard = loop {
            if let Some(guard) = self.inner.try_lock() {
                break guard;
            }
            C::relax();
        };
        self.owner.store(C::current_task_id(), Ordering::Relaxed);

        SpinlockGuard {
            lock: self,
            guard,
            _irq: irq,
        }
    }

    /// O contexto atual detém este lock?
    pub fn holding(&self) -> bool {
        self.inner.is_locked() && self.owner.load(Ordering::Relaxed) == C::current_task_id()
    }

    /// Acesso sem lock via `&mut` (exclusividade garantida pelo borrow checker).
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }
}

/// Guard do spinlock - libera ao sair do escopo
///
/// Ordem de drop dos campos: primeiro o lock é solto, depois as interrupções
/// são restauradas.
pub struct SpinlockGuard<'a, T, C: CpuOps> {
    lock: &'a Spinlock<T, C>,
    guard: spin::MutexGuard<'a, T>,
    _irq: IrqGuard<C>,
}

impl<T, C: CpuOps> Deref for SpinlockGuard<'_, T, C> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T, C: CpuOps> DerefMut for SpinlockGuard<'_, T, C> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T, C: CpuOps> Drop for SpinlockGuard<'_, T, C> {
    fn drop(&mut self) {
        // Dono é limpo antes do unlock
        self.lock.owner.store(NO_OWNER, Ordering::Relaxed);
    }
}
