//! # Addr - Wrappers Type-Safe para Endereços

mod phys;
mod translate;

pub use phys::PhysAddr;
pub use translate::{phys_to_virt, virt_to_phys};
