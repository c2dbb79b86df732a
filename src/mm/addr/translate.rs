use super::PhysAddr;
use crate::mm::config::HHDM_BASE;

/// Converte endereço físico para ponteiro virtual (Direct Map)
///
/// Assume que a memória física está mapeada linearmente em `HHDM_BASE`.
#[inline]
pub fn phys_to_virt(phys: PhysAddr) -> *mut u8 {
    (phys.as_usize() + HHDM_BASE) as *mut u8
}

/// Converte ponteiro do Direct Map de volta para endereço físico
#[inline]
pub fn virt_to_phys(ptr: *const u8) -> PhysAddr {
    PhysAddr::new((ptr as usize - HHDM_BASE) as u64)
}
