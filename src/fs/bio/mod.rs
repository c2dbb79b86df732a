//! # Buffer Cache (bio)
//!
//! Cache de blocos de disco com tabela hash particionada em buckets.
//!
//! ## 🏗️ Estrutura
//!
//! ```text
//! evict_lock ──── serializa misses (evicção/rehash)
//!
//! buckets[0] ─ Spinlock ─ [meta, meta, ...]   chave → slot, refcnt, carimbo
//! buckets[1] ─ Spinlock ─ [meta, ...]
//! ...
//!
//! slots[i]   ─ valid + SleepLock<[u8; BSIZE]>   conteúdo do bloco
//! ```
//!
//! ## Protocolo de locks
//!
//! - **Hit:** só o lock do bucket da chave.
//! - **Miss:** `evict_lock`, depois re-verifica o bucket da chave; se ainda
//!   não estiver lá, escolhe a vítima LRU global e a move para o bucket da
//!   chave. Só a movimentação segura dois locks de bucket, e só com o
//!   `evict_lock` retido.
//! - **Conteúdo:** o sleep lock do slot é adquirido sem nenhum spinlock
//!   retido.
//!
//! ## Política de evicção
//!
//! Vítima = slot com `refcnt == 0` e menor carimbo (ticks do último
//! release). Cada bucket é varrido sozinho e seu melhor candidato copiado;
//! a escolha global é feita sem lock e revalidada antes da movimentação.

mod bucket;
pub mod buf;
pub mod stats;


pub use buf::{Buf, BufId, PinnedBuf};
pub use stats::{BcacheStats, BcacheStatsSnapshot};

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::arch::CpuOps;
use crate::drivers::block::{BlockDevice, BlockError, DeviceId, DeviceTable};
use crate::fs::config::{BcacheConfig, BSIZE};
use crate::sync::{SleepLock, Spinlock, SpinlockGuard};

use bucket::{bucket_of, BlockKey, BufMeta, Bucket, Candidate};

/// Conteúdo de um slot.
struct BufSlot<C: CpuOps> {
    /// Conteúdo reflete o disco. Limpo só na evicção (com lock do bucket),
    /// ligado só pelo dono do sleep lock após a leitura.
    valid: AtomicBool,
    data: SleepLock<[u8; BSIZE], C>,
}

/// Buffer cache de blocos.
pub struct Bcache<C: CpuOps> {
    evict_lock: Spinlock<(), C>,
    buckets: Box<[Spinlock<Bucket, C>]>,
    slots: Box<[BufSlot<C>]>,
    devices: DeviceTable,
    stats: BcacheStats,
}

impl<C: CpuOps> Bcache<C> {
    /// Cria o pool fixo. O slot `i` começa no bucket `i % nbucket`, sem
    /// identidade de bloco.
    ///
    /// Configuração com tamanho zero é bug fatal.
    pub fn new(config: BcacheConfig) -> Self {
        if !config.is_valid() {
            crate::kerror!("(Bcache) Configuração inválida");
            panic!("binit: configuração inválida");
        }

        let mut buckets: Vec<Bucket> = (0..config.nbucket)
            .map(|_| Bucket::with_capacity(config.nbuf))
            .collect();
        let mut slots = Vec::with_capacity(config.nbuf);
        for i in 0..config.nbuf {
            buckets[i % config.nbucket].entries.push(BufMeta {
                id: BufId(i),
                key: None,
                refcnt: 0,
                stamp: 0,
            });
            slots.push(BufSlot {
                valid: AtomicBool::new(false),
                data: SleepLock::new("buffer", [0u8; BSIZE]),
            });
        }

        crate::kinfo!("(Bcache) Buffers=", config.nbuf);
        crate::kdebug!("(Bcache) Buckets=", config.nbucket);

        Self {
            evict_lock: Spinlock::new("bcache", ()),
            buckets: buckets
                .into_iter()
                .map(|b| Spinlock::new("bcache.bucket", b))
                .collect(),
            slots: slots.into_boxed_slice(),
            devices: DeviceTable::new(),
            stats: BcacheStats::new(),
        }
    }

    /// Registra um dispositivo para leitura/escrita pelo cache.
    pub fn register_device(&self, device: Arc<dyn BlockDevice>) -> Result<DeviceId, BlockError> {
        self.devices.register(device)
    }

    pub fn devices(&self) -> &DeviceTable {
        &self.devices
    }

    pub fn nbuf(&self) -> usize {
        self.slots.len()
    }

    pub fn nbucket(&self) -> usize {
        self.buckets.len()
    }

    // =========================================================================
    // ACQUIRE
    // =========================================================================

    /// Obtém o buffer do bloco com o sleep lock retido.
    ///
    /// Não faz I/O. Pânico (`bget: sem buffers`) se todo slot estiver em uso.
    pub fn acquire(&self, dev: DeviceId, blockno: u32) -> Buf<'_, C> {
        let key = (dev, blockno);
        let target = bucket_of(key, self.buckets.len());

        if let Some(id) = self.lookup(target, key) {
            self.stats.hit();
            return self.lock_slot(id, key);
        }

        let evict = self.evict_lock.lock();

        // Outro core pode ter inserido a chave entre o lookup e o evict_lock
        if let Some(id) = self.lookup(target, key) {
            drop(evict);
            self.stats.hit();
            return self.lock_slot(id, key);
        }

        let id = self.evict_into(&evict, target, key);
        drop(evict);
        self.stats.miss();
        self.lock_slot(id, key)
    }

    /// Procura a chave no bucket e, se achar, soma uma referência.
    fn lookup(&self, bucket: usize, key: BlockKey) -> Option<BufId> {
        let mut bucket = self.buckets[bucket].lock();
        let meta = bucket.find_mut(key)?;
        meta.refcnt += 1;
        Some(meta.id)
    }

    /// Espera o sleep lock do slot. Nenhum spinlock pode estar retido.
    fn lock_slot(&self, id: BufId, key: BlockKey) -> Buf<'_, C> {
        let guard = self.slots[id.0].data.lock();
        Buf {
            cache: self,
            id,
            dev: key.0,
            blockno: key.1,
            guard: Some(guard),
        }
    }

    /// Escolhe a vítima LRU e a reatribui a `key` no bucket `target`.
    fn evict_into(&self, evict: &SpinlockGuard<'_, (), C>, target: usize, key: BlockKey) -> BufId {
        self.evict_from(evict, self.find_victim(), target, key)
    }

    /// Tenta mover `victim`; se ela não passar na revalidação, varre de novo.
    fn evict_from(
        &self,
        evict: &SpinlockGuard<'_, (), C>,
        mut victim: Option<Candidate>,
        target: usize,
        key: BlockKey,
    ) -> BufId {
        loop {
            let Some(candidate) = victim else {
                crate::kerror!("(Bcache) Todos os buffers em uso, bloco=", key.1);
                panic!("bget: sem buffers");
            };

            if self.move_victim(evict, candidate, target, key) {
                return candidate.id;
            }

            // Vítima foi tocada entre a varredura e a revalidação
            self.stats.rescan();
            crate::ktrace!("(Bcache) Revarrendo vítima, slot=", candidate.id.0);
            victim = self.find_victim();
        }
    }

    /// Menor carimbo entre os slots ociosos de todos os buckets.
    ///
    /// Cada bucket é travado sozinho; empate fica com o primeiro encontrado
    /// (ordem de bucket, depois ordem na lista).
    fn find_victim(&self) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (index, bucket) in self.buckets.iter().enumerate() {
            let candidate = bucket.lock().lru_candidate(index);
            if let Some(c) = candidate {
                if best.map_or(true, |b| c.stamp < b.stamp) {
                    best = Some(c);
                }
            }
        }
        best
    }

    /// Revalida a vítima e a move para o bucket `target`.
    ///
    /// Exige o `evict_lock` (único ponto com dois locks de bucket).
    /// Retorna `false` se a vítima não está mais ociosa com o mesmo carimbo.
    fn move_victim(
        &self,
        _evict: &SpinlockGuard<'_, (), C>,
        victim: Candidate,
        target: usize,
        key: BlockKey,
    ) -> bool {
        let mut src = self.buckets[victim.bucket].lock();
        let Some(pos) = src.position(victim.id) else {
            return false;
        };
        let meta = &mut src.entries[pos];
        if meta.refcnt != 0 || meta.stamp != victim.stamp {
            return false;
        }

        if let Some(old) = meta.key {
            self.stats.eviction();
            crate::ktrace!("(Bcache) Evictando bloco=", old.1);
        }

        // Conteúdo antigo deixa de valer antes da nova chave ficar visível
        self.slots[victim.id.0].valid.store(false, Ordering::Release);
        meta.key = Some(key);
        meta.refcnt = 1;

        if victim.bucket != target {
            let moved = src.entries.remove(pos);
            let mut dst = self.buckets[target].lock();
            dst.entries.push(moved);
        }
        true
    }

    // =========================================================================
    // READ / WRITE
    // =========================================================================

    /// Obtém o buffer com conteúdo válido, lendo do disco se preciso.
    ///
    /// Falha do dispositivo é fatal.
    pub fn read(&self, dev: DeviceId, blockno: u32) -> Buf<'_, C> {
        let mut buf = self.acquire(dev, blockno);
        if !self.slot_valid(buf.id) {
            let device = self.device(dev);
            if let Err(err) = device.read_block(blockno as u64, buf.data_mut()) {
                crate::kerror!("(Bcache) Falha de leitura, bloco=", blockno);
                panic!("bread: {}", err);
            }
            self.stats.disk_read();
            self.slots[buf.id.0].valid.store(true, Ordering::Release);
        }
        buf
    }

    /// Escreve o buffer no disco imediatamente.
    ///
    /// Pânico se o contexto atual não detém o buffer.
    pub fn write(&self, buf: &Buf<'_, C>) {
        debug_assert!(core::ptr::eq(buf.cache, self), "bwrite: buffer de outro cache");
        if !buf.holding() {
            crate::kerror!("(Bcache) bwrite sem o lock, bloco=", buf.blockno);
            panic!("bwrite: buffer não travado");
        }
        let device = self.device(buf.dev);
        if device.is_read_only() {
            crate::kerror!("(Bcache) Dispositivo somente leitura id=", buf.dev.as_u32());
            panic!("bwrite: {}", BlockError::ReadOnly);
        }
        if let Err(err) = device.write_block(buf.blockno as u64, buf.data()) {
            crate::kerror!("(Bcache) Falha de escrita, bloco=", buf.blockno);
            panic!("bwrite: {}", err);
        }
        self.stats.disk_write();
    }

    /// Solta o buffer (ver [`Buf::release`]).
    pub fn release(&self, buf: Buf<'_, C>) {
        buf.release();
    }

    fn device(&self, dev: DeviceId) -> Arc<dyn BlockDevice> {
        match self.devices.get(dev) {
            Some(device) => device,
            None => {
                crate::kerror!("(Bcache) Dispositivo desconhecido id=", dev.as_u32());
                panic!("bio: {}", BlockError::NotFound);
            }
        }
    }

    pub(super) fn slot_valid(&self, id: BufId) -> bool {
        self.slots[id.0].valid.load(Ordering::Acquire)
    }

    /// Devolve uma referência; o carimbo LRU é gravado quando chega a zero.
    ///
    /// Slot ausente do bucket da sua chave, ou sem referência, é bug fatal.
    pub(super) fn unref(&self, id: BufId, key: BlockKey) {
        let mut bucket = self.buckets[bucket_of(key, self.buckets.len())].lock();
        match bucket.entry_mut(id) {
            Some(meta) if meta.refcnt > 0 => {
                meta.refcnt -= 1;
                if meta.refcnt == 0 {
                    meta.stamp = C::ticks();
                }
            }
            _ => {
                crate::kerror!("(Bcache) brelse em slot perdido=", id.0);
                panic!("brelse: slot fora do bucket");
            }
        }
    }

    // =========================================================================
    // PIN / UNPIN
    // =========================================================================

    /// Impede a evicção do buffer até o `unpin`.
    pub fn pin(&self, buf: &Buf<'_, C>) -> PinnedBuf {
        let key = (buf.dev, buf.blockno);
        let mut bucket = self.buckets[bucket_of(key, self.buckets.len())].lock();
        match bucket.entry_mut(buf.id) {
            Some(meta) => meta.refcnt += 1,
            None => panic!("bpin: slot fora do bucket"),
        }
        PinnedBuf {
            id: buf.id,
            dev: buf.dev,
            blockno: buf.blockno,
        }
    }

    /// Devolve a referência de um `pin`.
    pub fn unpin(&self, pinned: PinnedBuf) {
        let key = (pinned.dev, pinned.blockno);
        let mut bucket = self.buckets[bucket_of(key, self.buckets.len())].lock();
        match bucket.entry_mut(pinned.id) {
            Some(meta) if meta.refcnt > 0 => {
                meta.refcnt -= 1;
                if meta.refcnt == 0 {
                    meta.stamp = C::ticks();
                }
            }
            _ => panic!("bunpin: refcnt zero"),
        }
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    /// O bloco está residente (válido ou não)?
    pub fn is_cached(&self, dev: DeviceId, blockno: u32) -> bool {
        let key = (dev, blockno);
        self.buckets[bucket_of(key, self.buckets.len())]
            .lock()
            .contains(key)
    }

    pub fn stats(&self) -> BcacheStatsSnapshot {
        self.stats.snapshot()
    }
}
