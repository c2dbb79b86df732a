//! Forge Kernel Core.
//!
//! Núcleo concorrente de gerência de recursos do kernel Forge: o buffer
//! cache de blocos de disco (`fs::bio`) e o alocador de páginas físicas por
//! CPU (`mm::pmm`). Tudo o que depende da plataforma entra pelo trait
//! `arch::CpuOps` e pelo trait `drivers::block::BlockDevice`.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (necessário para Vec/Box/Arc)
extern crate alloc;

// --- Serviços Centrais (Logging, Tempo) ---
#[macro_use]
pub mod core;

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (IRQs, identidade do core, relógio)
pub mod drivers; // Dispositivos de bloco

// --- Primitivas e Subsistemas ---
pub mod fs; // Buffer cache de blocos
pub mod mm; // Alocador de páginas por CPU
pub mod sync; // Spinlock e SleepLock

#[cfg(test)]
pub mod testing;

pub use arch::{CpuOps, IrqGuard};
pub use drivers::block::{BlockDevice, BlockError, DeviceId, RamDisk};
pub use fs::{Bcache, BcacheConfig, Buf, BufId, PinnedBuf, BSIZE};
pub use mm::{Kmem, KmemConfig, MmError, MmResult, PhysAddr, PhysFrame, PoisonFlags};
