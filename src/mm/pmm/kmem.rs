//! # Kmem - Alocador de Frames por CPU
//!
//! Uma lista livre por core, cada uma com seu próprio spinlock. O caminho
//! comum (alloc/free no próprio core) nunca disputa lock com outros cores.
//!
//! ## Roubo de frames
//!
//! Quando a lista do core atual esvazia, o alocador solta o próprio lock e
//! percorre os outros cores em ordem de índice, travando um de cada vez e
//! movendo até `STEAL_BATCH` frames para um lote privado. Nunca há dois
//! locks de lista retidos ao mesmo tempo.
//!
//! ## Devolução
//!
//! `free` devolve o frame ao core de origem, calculado pela mesma
//! partição round-robin do init, e não ao core que está liberando.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ptr::NonNull;

use crate::arch::{CpuOps, IrqGuard};
use crate::mm::addr::{phys_to_virt, virt_to_phys, PhysAddr};
use crate::mm::config::{KmemConfig, ALLOC_FILL, FREE_FILL, PAGE_SIZE, STEAL_BATCH};
use crate::mm::error::{MmError, MmResult};
use crate::sync::Spinlock;

use super::freelist::FreeList;
use super::poison::{fill_page, PoisonFlags};
use super::stats::{KmemStats, KmemStatsSnapshot};
use super::PhysFrame;

/// Alocador de páginas físicas particionado por core.
pub struct Kmem<C: CpuOps> {
    /// Primeiro frame gerenciado (alinhado)
    start: PhysAddr,
    /// Fim exclusivo da faixa (alinhado)
    end: PhysAddr,
    lists: Box<[Spinlock<FreeList, C>]>,
    poison: PoisonFlags,
    stats: KmemStats,
}

impl<C: CpuOps> Kmem<C> {
    /// Assume a faixa física `[start, end)` e distribui as páginas entre os
    /// cores (página `i` vai para o core `i % ncpu`).
    ///
    /// `start` é arredondado para cima e `end` para baixo até a fronteira
    /// de página.
    ///
    /// # Safety
    ///
    /// A faixa deve ser RAM acessível via Direct Map, sem nenhum outro
    /// usuário, e continuar válida enquanto o `Kmem` existir.
    pub unsafe fn new(start: PhysAddr, end: PhysAddr, config: KmemConfig) -> MmResult<Self> {
        if config.ncpu == 0 {
            crate::kerror!("(Kmem) ncpu inválido");
            return Err(MmError::InvalidParameter);
        }

        let start = start.align_up(PAGE_SIZE as u64);
        let end = end.align_down(PAGE_SIZE as u64);
        let end = if end < start { start } else { end };

        let lists: Vec<_> = (0..config.ncpu)
            .map(|_| Spinlock::new("kmem", FreeList::new()))
            .collect();

        let mut kmem = Self {
            start,
            end,
            lists: lists.into_boxed_slice(),
            poison: config.poison,
            stats: KmemStats::new(),
        };

        let total = kmem.total_frames();
        for i in 0..total {
            let addr = start.add((i * PAGE_SIZE) as u64);
            let page = NonNull::new(phys_to_virt(addr)).ok_or(MmError::InvalidAddress)?;
            if kmem.poison.contains(PoisonFlags::ON_FREE) {
                fill_page(page.as_ptr(), FREE_FILL);
            }
            kmem.lists[i % config.ncpu].get_mut().push(page);
        }

        crate::kinfo!("(Kmem) Frames gerenciados=", total);
        crate::kdebug!("(Kmem) Listas por core=", config.ncpu);
        Ok(kmem)
    }

    /// Aloca um frame.
    ///
    /// Tenta a lista do core atual; se vazia, rouba de outros cores.
    /// Retorna `MmError::OutOfMemory` quando não há frame livre em lugar
    /// nenhum.
    pub fn alloc(&self) -> MmResult<PhysFrame> {
        let page = {
            // O core atual não muda enquanto as IRQs estão desligadas
            let _irq = IrqGuard::<C>::new();
            let core = C::current_core_id();
            assert!(core < self.lists.len(), "kalloc: core fora da faixa");

            let own = self.lists[core].lock().pop();
            match own {
                Some(page) => Some(page),
                None => self.steal(core),
            }
        };

        let Some(page) = page else {
            self.stats.inc_failed();
            crate::kwarn!("(Kmem) OOM: nenhum frame livre");
            return Err(MmError::OutOfMemory);
        };

        if self.poison.contains(PoisonFlags::ON_ALLOC) {
            // SAFETY: o frame acabou de sair da lista livre e é nosso
            unsafe { fill_page(page.as_ptr(), ALLOC_FILL) };
        }
        self.stats.inc_alloc();
        Ok(PhysFrame::from_start_address(virt_to_phys(page.as_ptr())))
    }

    /// Rouba até `STEAL_BATCH` frames dos outros cores para `core`.
    ///
    /// Chamado sem nenhum lock de lista retido. Devolve um frame e empilha o
    /// restante do lote na lista de `core`.
    fn steal(&self, core: usize) -> Option<NonNull<u8>> {
        let mut batch = FreeList::new();

        for peer in (0..self.lists.len()).filter(|&p| p != core) {
            let mut list = self.lists[peer].lock();
            while batch.len() < STEAL_BATCH {
                match list.pop() {
                    // SAFETY: o frame saiu da lista do peer; ninguém mais o vê
                    Some(page) => unsafe { batch.push(page) },
                    None => break,
                }
            }
            drop(list);

            if batch.len() == STEAL_BATCH {
                break;
            }
        }

        let stolen = batch.len();
        let page = batch.pop()?;
        self.stats.record_steal(stolen);
        crate::ktrace!("(Kmem) Frames roubados=", stolen);

        let mut own = self.lists[core].lock();
        while let Some(extra) = batch.pop() {
            // SAFETY: frames do lote privado
            unsafe { own.push(extra) };
        }
        Some(page)
    }

    /// Devolve um frame ao seu core de origem.
    ///
    /// Endereço desalinhado ou fora da faixa gerenciada é bug fatal.
    ///
    /// # Safety
    ///
    /// `addr` deve ter vindo de `alloc` deste `Kmem` e não pode mais ser
    /// usado pelo chamador.
    pub unsafe fn free(&self, addr: PhysAddr) {
        if let Err(err) = self.check_frame(addr) {
            crate::kerror!("(Kmem) free inválido addr=", addr.as_u64());
            panic!("kfree: {}", err);
        }

        let page = match NonNull::new(phys_to_virt(addr)) {
            Some(page) => page,
            None => panic!("kfree: {}", MmError::InvalidAddress),
        };
        if self.poison.contains(PoisonFlags::ON_FREE) {
            fill_page(page.as_ptr(), FREE_FILL);
        }

        self.lists[self.home_core(addr)].lock().push(page);
        self.stats.inc_free();
    }

    /// Valida um endereço antes de aceitá-lo de volta.
    pub fn check_frame(&self, addr: PhysAddr) -> MmResult<()> {
        if !addr.is_aligned(PAGE_SIZE as u64) {
            return Err(MmError::NotAligned);
        }
        if addr < self.start || addr >= self.end {
            return Err(MmError::InvalidAddress);
        }
        Ok(())
    }

    /// Core que recebeu este frame na partição inicial.
    #[inline]
    pub fn home_core(&self, addr: PhysAddr) -> usize {
        let index = (addr.as_u64() - self.start.as_u64()) as usize / PAGE_SIZE;
        index % self.lists.len()
    }

    /// Total de frames livres em todos os cores.
    ///
    /// Só é exato num ponto quiescente.
    pub fn free_frames(&self) -> usize {
        self.lists.iter().map(|l| l.lock().len()).sum()
    }

    /// Frames livres na lista de `core` (0 se o core não existe).
    pub fn free_frames_on(&self, core: usize) -> usize {
        self.lists.get(core).map_or(0, |l| l.lock().len())
    }

    /// Número de frames da faixa gerenciada.
    pub fn total_frames(&self) -> usize {
        (self.end.as_u64() - self.start.as_u64()) as usize / PAGE_SIZE
    }

    pub fn ncpu(&self) -> usize {
        self.lists.len()
    }

    /// Faixa gerenciada `[start, end)` após o alinhamento.
    pub fn range(&self) -> (PhysAddr, PhysAddr) {
        (self.start, self.end)
    }

    pub fn stats(&self) -> KmemStatsSnapshot {
        self.stats.snapshot()
    }
}
