//! # Synchronization Primitives
//!
//! Primitivas de sincronização para ambiente SMP.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock   → Seções críticas curtas (não pode dormir, IRQs desligadas)
//! SleepLock  → Conteúdo de buffers durante I/O (pode dormir)
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: Nunca segure durante I/O nem ao adquirir um SleepLock
//! - **Ordem de Lock**: Sempre adquirir na mesma ordem para evitar deadlock

/// Spinlock (busy-wait, não dorme)
pub mod spinlock;

/// SleepLock (pode bloquear a task)
pub mod sleeplock;

pub use sleeplock::{SleepLock, SleepLockGuard};
pub use spinlock::{Spinlock, SpinlockGuard};
