//! Arquivo: core/time/jiffies.rs
//!
//! Propósito: Jiffies (Contador de ticks do sistema).
//! Usado como relógio lógico padrão de `CpuOps::ticks`, que carimba os
//! buffers liberados para a política LRU do cache de blocos.
//!
//! Detalhes de Implementação:
//! - Usa AtomicU64 para ser thread-safe e lock-free.
//! - Incrementado pelo timer interrupt handler.
//! - Monotônico: nunca é decrementado nem zerado após o boot.

use core::sync::atomic::{AtomicU64, Ordering};

/// Ticks desde o boot.
static JIFFIES: AtomicU64 = AtomicU64::new(0);

/// Retorna o número atual de jiffies.
#[inline]
pub fn get_jiffies() -> u64 {
    JIFFIES.load(Ordering::Relaxed)
}

/// Incrementa o contador de jiffies e retorna o novo valor.
/// Deve ser chamado APENAS pelo handler de interrupção do timer.
#[inline]
pub fn inc_jiffies() -> u64 {
    JIFFIES.fetch_add(1, Ordering::Relaxed) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jiffies_monotonic() {
        let before = get_jiffies();
        let after = inc_jiffies();
        assert!(after > before);
        assert!(get_jiffies() >= after);
    }
}
