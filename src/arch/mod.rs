//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a **única** ponte entre o núcleo (lógica agnóstica) e a
//! plataforma real. Controle de interrupções, identidade do core e o relógio
//! lógico passam por aqui.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Isolamento:** `fs::bio` e `mm::pmm` **não devem** saber em qual CPU estão rodando.
//! - **Abstração:** Define o trait `CpuOps` (em `traits/`) que a plataforma implementa.
//! - **Dispatch estático:** As estruturas recebem a plataforma como parâmetro de tipo,
//!   sem chamadas indiretas (dyn) no caminho quente.
//!
//! ## 🏗️ Fluxo
//! 1. O kernel implementa `CpuOps` para sua arquitetura (ex: `X64Cpu`).
//! 2. Instancia `Bcache<X64Cpu>` e `Kmem<X64Cpu>`.
//! 3. Spinlocks e o alocador usam `IrqGuard<X64Cpu>` para push_off/pop_off.

pub mod irq;
pub mod traits;

pub use irq::IrqGuard;
pub use traits::*;
