//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura (x86, ARM, RISC-V) deve implementar
//! para hospedar o buffer cache e o alocador de páginas.

/// Contrato entre o núcleo concorrente e a plataforma.
///
/// Todas as operações são funções associadas (dispatch estático): o kernel
/// escolhe a implementação concreta como parâmetro de tipo de `Bcache<C>` e
/// `Kmem<C>`.
pub trait CpuOps: 'static {
    /// Desabilita interrupções globalmente no core atual (CLI).
    /// Crítico para seções atômicas no kernel.
    fn disable_interrupts();

    /// Habilita interrupções globalmente no core atual (STI).
    fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;

    /// ID do core que está executando.
    ///
    /// Só é estável enquanto as interrupções estiverem desabilitadas.
    fn current_core_id() -> usize;

    /// Identidade do contexto de execução atual (task/processo).
    ///
    /// Usada para verificar o dono de locks (`holding`). Deve ser única entre
    /// contextos vivos e nunca igual a `usize::MAX`.
    fn current_task_id() -> usize;

    /// Cede a CPU enquanto espera por um sleep lock.
    /// No kernel isso chama o scheduler; nunca é chamado com spinlock retido.
    fn sleep_wait();

    /// Hint de spin loop.
    #[inline(always)]
    fn relax() {
        core::hint::spin_loop();
    }

    /// Relógio lógico lido pelo buffer cache para carimbar buffers ociosos.
    #[inline]
    fn ticks() -> u64 {
        crate::core::time::jiffies::get_jiffies()
    }
}
