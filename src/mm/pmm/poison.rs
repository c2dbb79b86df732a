//! Envenenamento de páginas (debug de memória).
//!
//! Páginas recém-alocadas recebem `ALLOC_FILL` e páginas liberadas recebem
//! `FREE_FILL`, expondo leitura de memória não inicializada e
//! use-after-free. A palavra de link da lista livre sobrescreve o início de
//! uma página liberada.

use bitflags::bitflags;

use crate::mm::config::PAGE_SIZE;

bitflags! {
    /// Quando preencher páginas com padrões de debug
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PoisonFlags: u8 {
        /// Preenche com ALLOC_FILL ao alocar
        const ON_ALLOC = 1 << 0;
        /// Preenche com FREE_FILL ao liberar (e no init)
        const ON_FREE  = 1 << 1;
    }
}

impl Default for PoisonFlags {
    fn default() -> Self {
        if cfg!(feature = "page_poison") {
            Self::all()
        } else {
            Self::empty()
        }
    }
}

/// Preenche uma página inteira com `byte`.
///
/// # Safety
///
/// `page` deve apontar para PAGE_SIZE bytes graváveis e exclusivos.
#[inline]
pub(crate) unsafe fn fill_page(page: *mut u8, byte: u8) {
    core::ptr::write_bytes(page, byte, PAGE_SIZE);
}
