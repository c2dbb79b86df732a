//! Guard de interrupções (push_off/pop_off).
//!
//! Salva o estado de interrupções, desabilita, e restaura ao sair do escopo.
//! Guards aninhados funcionam em ordem LIFO: só o mais externo reabilita.

use core::marker::PhantomData;

use super::CpuOps;

/// Mantém as interrupções desabilitadas enquanto vivo.
///
/// Enquanto o guard existir, `C::current_core_id()` não muda: a task não
/// pode ser preemptada nem migrada.
pub struct IrqGuard<C: CpuOps> {
    were_enabled: bool,
    _cpu: PhantomData<fn() -> C>,
}

impl<C: CpuOps> IrqGuard<C> {
    /// Desabilita interrupções, lembrando o estado anterior.
    #[inline]
    pub fn new() -> Self {
        let were_enabled = C::are_interrupts_enabled();
        C::disable_interrupts();
        Self {
            were_enabled,
            _cpu: PhantomData,
        }
    }

    /// Retorna se as interrupções estavam habilitadas antes do guard.
    pub fn were_enabled(&self) -> bool {
        self.were_enabled
    }
}

impl<C: CpuOps> Default for IrqGuard<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CpuOps> Drop for IrqGuard<C> {
    #[inline]
    fn drop(&mut self) {
        if self.were_enabled {
            C::enable_interrupts();
        }
    }
}
