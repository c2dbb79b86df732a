//! # Configuração do Módulo de Memória
//!
//! Define constantes, feature flags e configurações globais do alocador de
//! páginas.

use crate::mm::pmm::PoisonFlags;

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Tamanho de uma página (4 KiB)
pub const PAGE_SIZE: usize = 4096;

// =============================================================================
// LAYOUT DE MEMÓRIA VIRTUAL
// =============================================================================

/// Base do Higher Half Direct Map (toda RAM física mapeada aqui)
/// Identity map por enquanto: físico == virtual.
pub const HHDM_BASE: usize = 0x0000_0000_0000_0000;

// =============================================================================
// CONFIGURAÇÃO SMP
// =============================================================================

/// Número máximo de CPUs suportadas
pub const NCPU: usize = 8;

// =============================================================================
// CONFIGURAÇÃO DO ALLOCATOR
// =============================================================================

/// Máximo de frames movidos de outros cores num único roubo
pub const STEAL_BATCH: usize = 64;

/// Padrão escrito numa página recém-alocada
pub const ALLOC_FILL: u8 = 0x05;

/// Padrão escrito numa página liberada
pub const FREE_FILL: u8 = 0x01;

/// Configuração em tempo de execução do `Kmem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmemConfig {
    /// Número de cores (uma lista livre por core)
    pub ncpu: usize,
    /// Quando preencher páginas com os padrões de debug
    pub poison: PoisonFlags,
}

impl Default for KmemConfig {
    fn default() -> Self {
        Self {
            ncpu: NCPU,
            poison: PoisonFlags::default(),
        }
    }
}

// =============================================================================
// FUNÇÕES UTILITÁRIAS
// =============================================================================

/// Alinha valor para cima ao múltiplo de align
#[inline(always)]
pub const fn align_up(val: usize, align: usize) -> usize {
    (val + align - 1) & !(align - 1)
}

/// Alinha valor para baixo ao múltiplo de align
#[inline(always)]
pub const fn align_down(val: usize, align: usize) -> usize {
    val & !(align - 1)
}

/// Verifica se valor está alinhado
#[inline(always)]
pub const fn is_aligned(val: usize, align: usize) -> bool {
    val & (align - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_helpers() {
        assert_eq!(align_up(1, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_up(PAGE_SIZE, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_down(PAGE_SIZE + 7, PAGE_SIZE), PAGE_SIZE);
        assert!(is_aligned(3 * PAGE_SIZE, PAGE_SIZE));
        assert!(!is_aligned(3 * PAGE_SIZE + 8, PAGE_SIZE));
    }
}
