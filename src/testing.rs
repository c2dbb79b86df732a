//! Plataforma de testes no host.
//!
//! Implementa `CpuOps` sobre threads std: cada thread é uma "task", com
//! core id, flag de interrupções e relógio lógico próprios (thread-local).
//! `JiffiesCpu` é a mesma CPU, mas carimba pelo relógio global padrão.

use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::arch::CpuOps;

static NEXT_TASK: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CORE: Cell<usize> = const { Cell::new(0) };
    static IRQ_ON: Cell<bool> = const { Cell::new(true) };
    static TICKS: Cell<u64> = const { Cell::new(0) };
    static TASK: usize = NEXT_TASK.fetch_add(1, Ordering::Relaxed);
}

/// CPU simulada para testes.
pub struct HostCpu;

impl HostCpu {
    /// Fixa o core id da thread atual.
    pub fn set_core(id: usize) {
        CORE.with(|c| c.set(id));
    }

    /// Avança o relógio lógico da thread atual.
    pub fn tick() {
        TICKS.with(|t| t.set(t.get() + 1));
    }
}

impl CpuOps for HostCpu {
    fn disable_interrupts() {
        IRQ_ON.with(|f| f.set(false));
    }

    fn enable_interrupts() {
        IRQ_ON.with(|f| f.set(true));
    }

    fn are_interrupts_enabled() -> bool {
        IRQ_ON.with(|f| f.get())
    }

    fn current_core_id() -> usize {
        CORE.with(|c| c.get())
    }

    fn current_task_id() -> usize {
        TASK.with(|t| *t)
    }

    fn sleep_wait() {
        std::thread::yield_now();
    }

    fn relax() {
        std::thread::yield_now();
    }

    fn ticks() -> u64 {
        TICKS.with(|t| t.get())
    }
}

/// `HostCpu` com o `ticks()` padrão do trait (jiffies global).
///
/// O relógio é compartilhado por todos os testes em paralelo: só avança,
/// então a ordem relativa dos carimbos de um teste é preservada.
pub struct JiffiesCpu;

impl CpuOps for JiffiesCpu {
    fn disable_interrupts() {
        HostCpu::disable_interrupts();
    }

    fn enable_interrupts() {
        HostCpu::enable_interrupts();
    }

    fn are_interrupts_enabled() -> bool {
        HostCpu::are_interrupts_enabled()
    }

    fn current_core_id() -> usize {
        HostCpu::current_core_id()
    }

    fn current_task_id() -> usize {
        HostCpu::current_task_id()
    }

    fn sleep_wait() {
        HostCpu::sleep_wait();
    }

    fn relax() {
        HostCpu::relax();
    }
}
