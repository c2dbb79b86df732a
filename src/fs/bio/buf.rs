//! Handles de buffer entregues aos chamadores.

use core::fmt;

use crate::arch::CpuOps;
use crate::drivers::block::DeviceId;
use crate::fs::config::BSIZE;
use crate::sync::SleepLockGuard;

use super::Bcache;

/// Índice de um slot no pool fixo do cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufId(pub usize);

/// Buffer travado: acesso exclusivo ao conteúdo de um bloco.
///
/// Segura o sleep lock do slot e uma referência (`refcnt`). Soltar com
/// [`Buf::release`] (ou [`Bcache::release`]) verifica que o contexto atual é
/// o dono; o `Drop` faz o mesmo trabalho sem a verificação, para que um
/// pânico no meio de uma operação não deixe o slot preso.
pub struct Buf<'a, C: CpuOps> {
    pub(super) cache: &'a Bcache<C>,
    pub(super) id: BufId,
    pub(super) dev: DeviceId,
    pub(super) blockno: u32,
    pub(super) guard: Option<SleepLockGuard<'a, [u8; BSIZE], C>>,
}

impl<'a, C: CpuOps> Buf<'a, C> {
    pub fn id(&self) -> BufId {
        self.id
    }

    pub fn dev(&self) -> DeviceId {
        self.dev
    }

    pub fn blockno(&self) -> u32 {
        self.blockno
    }

    /// O conteúdo reflete o disco?
    pub fn is_valid(&self) -> bool {
        self.cache.slot_valid(self.id)
    }

    /// O contexto atual detém o sleep lock deste buffer?
    pub fn holding(&self) -> bool {
        self.guard.as_ref().map_or(false, |g| g.held_by_current())
    }

    pub fn data(&self) -> &[u8; BSIZE] {
        match &self.guard {
            Some(guard) => guard,
            None => unreachable!("buf: guard ausente"),
        }
    }

    pub fn data_mut(&mut self) -> &mut [u8; BSIZE] {
        match &mut self.guard {
            Some(guard) => guard,
            None => unreachable!("buf: guard ausente"),
        }
    }

    /// Escreve o conteúdo no disco (write-through).
    pub fn write(&self) {
        self.cache.write(self);
    }

    /// Solta o buffer. Pânico se o contexto atual não for o dono.
    pub fn release(mut self) {
        if !self.holding() {
            crate::kerror!("(Bcache) brelse sem o lock, bloco=", self.blockno);
            panic!("brelse: buffer não travado");
        }
        self.unlock();
    }

    /// Solta o sleep lock e devolve a referência ao bucket.
    fn unlock(&mut self) {
        if let Some(guard) = self.guard.take() {
            drop(guard);
            self.cache.unref(self.id, (self.dev, self.blockno));
        }
    }
}

impl<C: CpuOps> Drop for Buf<'_, C> {
    fn drop(&mut self) {
        self.unlock();
    }
}

impl<C: CpuOps> fmt::Debug for Buf<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf")
            .field("id", &self.id)
            .field("dev", &self.dev)
            .field("blockno", &self.blockno)
            .finish()
    }
}

/// Referência extra que impede a evicção do slot.
///
/// Não carrega o sleep lock. Deve voltar ao cache com [`Bcache::unpin`];
/// descartá-la sem isso deixa o slot preso no cache.
#[must_use = "um PinnedBuf descartado nunca devolve a referência"]
#[derive(Debug, PartialEq, Eq)]
pub struct PinnedBuf {
    pub(super) id: BufId,
    pub(super) dev: DeviceId,
    pub(super) blockno: u32,
}

impl PinnedBuf {
    pub fn id(&self) -> BufId {
        self.id
    }

    pub fn dev(&self) -> DeviceId {
        self.dev
    }

    pub fn blockno(&self) -> u32 {
        self.blockno
    }
}
