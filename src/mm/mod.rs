//! # Memory Management Subsystem (MM)
//!
//! Gerência de páginas físicas do kernel Forge.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Alocação de frames:** `pmm::Kmem` entrega e recebe páginas de 4 KiB
//!   para stacks do kernel, page tables e crescimento de processos.
//! - **Escalabilidade:** uma lista livre por core; só o roubo entre cores
//!   toca a lista de outro core, e sempre um lock por vez.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo   | Responsabilidade |
//! |----------|------------------|
//! | `pmm`    | `Kmem`, listas livres intrusivas, envenenamento, estatísticas. |
//! | `addr`   | `PhysAddr` e tradução pelo Direct Map. |
//! | `config` | Constantes (PAGE_SIZE, STEAL_BATCH, padrões de fill). |
//! | `error`  | `MmError` / `MmResult`. |

pub mod addr;
pub mod config;
pub mod error;
pub mod pmm;

pub use addr::PhysAddr;
pub use config::KmemConfig;
pub use error::{MmError, MmResult};
pub use pmm::{Kmem, PhysFrame, PoisonFlags};
