use crate::mm::addr::PhysAddr;
use core::fmt;

/// Um frame de memória física (tamanho fixo PAGE_SIZE = 4KiB)
///
/// Devolvido por `Kmem::alloc`; a posse passa ao chamador até o `free`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysFrame {
    start_address: PhysAddr,
}

impl PhysFrame {
    /// Cria um frame a partir de um endereço já alinhado
    #[inline]
    pub(crate) const fn from_start_address(addr: PhysAddr) -> Self {
        Self {
            start_address: addr,
        }
    }

    /// Retorna o endereço inicial do frame
    #[inline]
    pub const fn start_address(&self) -> PhysAddr {
        self.start_address
    }

    /// Ponteiro para o conteúdo do frame via Direct Map
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut u8 {
        crate::mm::addr::phys_to_virt(self.start_address)
    }
}

impl fmt::Debug for PhysFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysFrame({:?})", self.start_address)
    }
}
