//! Testes do alocador por CPU sobre memória do host.

use std::alloc::{alloc, dealloc, Layout};
use std::collections::HashSet;
use std::thread;
use std::vec::Vec;

use super::*;
use crate::mm::addr::PhysAddr;
use crate::mm::config::{KmemConfig, ALLOC_FILL, FREE_FILL, PAGE_SIZE, STEAL_BATCH};
use crate::mm::error::MmError;
use crate::testing::HostCpu;

/// Região alinhada a página emprestada do heap do host.
struct Arena {
    ptr: *mut u8,
    layout: Layout,
}

impl Arena {
    fn new(pages: usize) -> Self {
        let layout = Layout::from_size_align(pages * PAGE_SIZE, PAGE_SIZE).unwrap();
        let ptr = unsafe { alloc(layout) };
        assert!(!ptr.is_null());
        Self { ptr, layout }
    }

    fn start(&self) -> PhysAddr {
        PhysAddr::new(self.ptr as u64)
    }

    fn end(&self) -> PhysAddr {
        PhysAddr::new(self.ptr as u64 + self.layout.size() as u64)
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr, self.layout) };
    }
}

fn kmem(arena: &Arena, ncpu: usize) -> Kmem<HostCpu> {
    let config = KmemConfig {
        ncpu,
        poison: PoisonFlags::all(),
    };
    unsafe { Kmem::new(arena.start(), arena.end(), config).unwrap() }
}

fn page_bytes(frame: PhysFrame) -> &'static [u8] {
    unsafe { std::slice::from_raw_parts(frame.as_mut_ptr(), PAGE_SIZE) }
}

#[test]
fn test_init_partitions_round_robin() {
    let arena = Arena::new(10);
    let km = kmem(&arena, 3);
    assert_eq!(km.total_frames(), 10);
    assert_eq!(km.free_frames(), 10);
    assert_eq!(km.free_frames_on(0), 4);
    assert_eq!(km.free_frames_on(1), 3);
    assert_eq!(km.free_frames_on(2), 3);
    assert_eq!(km.free_frames_on(3), 0);

    let second = arena.start().add(PAGE_SIZE as u64);
    assert_eq!(km.home_core(arena.start()), 0);
    assert_eq!(km.home_core(second), 1);
}

#[test]
fn test_init_rounds_range_to_page_boundaries() {
    let arena = Arena::new(4);
    let start = arena.start().add(1);
    let km: Kmem<HostCpu> =
        unsafe { Kmem::new(start, arena.end(), KmemConfig::default()).unwrap() };
    assert_eq!(km.total_frames(), 3);
    assert_eq!(km.range().0, arena.start().add(PAGE_SIZE as u64));
}

#[test]
fn test_init_rejects_zero_cpus() {
    let arena = Arena::new(1);
    let config = KmemConfig {
        ncpu: 0,
        poison: PoisonFlags::empty(),
    };
    let res: Result<Kmem<HostCpu>, _> = unsafe { Kmem::new(arena.start(), arena.end(), config) };
    assert_eq!(res.err(), Some(MmError::InvalidParameter));
}

#[test]
fn test_steal_moves_one_batch() {
    // 200 frames em 2 cores: 100 em cada
    let arena = Arena::new(200);
    let km = kmem(&arena, 2);
    HostCpu::set_core(0);

    // Esvazia o core 0 sem roubar
    let drained: Vec<_> = (0..100).map(|_| km.alloc().unwrap()).collect();
    assert_eq!(km.free_frames_on(0), 0);
    assert_eq!(km.stats().steals, 0);

    let frame = km.alloc().unwrap();
    assert_eq!(km.free_frames_on(0), STEAL_BATCH - 1);
    assert_eq!(km.free_frames_on(1), 100 - STEAL_BATCH);
    assert_eq!(km.home_core(frame.start_address()), 1);

    let stats = km.stats();
    assert_eq!(stats.steals, 1);
    assert_eq!(stats.stolen_frames, STEAL_BATCH);
    assert_eq!(stats.allocs, 101);
    drop(drained);
}

#[test]
fn test_steal_takes_what_is_left() {
    let arena = Arena::new(6);
    let km = kmem(&arena, 3);
    HostCpu::set_core(0);
    km.alloc().unwrap();
    km.alloc().unwrap();

    // Core 0 vazio; peers têm 2 + 2
    km.alloc().unwrap();
    assert_eq!(km.free_frames_on(0), 3);
    assert_eq!(km.free_frames_on(1), 0);
    assert_eq!(km.free_frames_on(2), 0);
    assert_eq!(km.stats().stolen_frames, 4);
}

#[test]
fn test_fill_patterns() {
    let arena = Arena::new(2);
    let km = kmem(&arena, 1);
    HostCpu::set_core(0);

    let frame = km.alloc().unwrap();
    assert!(page_bytes(frame).iter().all(|&b| b == ALLOC_FILL));

    unsafe { km.free(frame.start_address()) };
    // A palavra de link fica no início da página
    let link = core::mem::size_of::<usize>();
    assert!(page_bytes(frame)[link..].iter().all(|&b| b == FREE_FILL));
}

#[test]
fn test_no_poison_leaves_content() {
    let arena = Arena::new(1);
    let config = KmemConfig {
        ncpu: 1,
        poison: PoisonFlags::empty(),
    };
    let km: Kmem<HostCpu> = unsafe { Kmem::new(arena.start(), arena.end(), config).unwrap() };
    HostCpu::set_core(0);

    let frame = km.alloc().unwrap();
    unsafe { core::ptr::write_bytes(frame.as_mut_ptr(), 0x77, PAGE_SIZE) };
    unsafe { km.free(frame.start_address()) };
    let frame = km.alloc().unwrap();
    let link = core::mem::size_of::<usize>();
    assert!(page_bytes(frame)[link..].iter().all(|&b| b == 0x77));
}

#[test]
fn test_out_of_memory_is_recoverable() {
    let arena = Arena::new(3);
    let km = kmem(&arena, 2);
    HostCpu::set_core(1);

    let frames: Vec<_> = (0..3).map(|_| km.alloc().unwrap()).collect();
    assert_eq!(km.alloc(), Err(MmError::OutOfMemory));
    assert_eq!(km.stats().failed_allocs, 1);

    unsafe { km.free(frames[0].start_address()) };
    assert!(km.alloc().is_ok());
}

#[test]
fn test_free_returns_to_home_core() {
    let arena = Arena::new(4);
    let km = kmem(&arena, 2);
    HostCpu::set_core(0);

    let frames: Vec<_> = (0..4).map(|_| km.alloc().unwrap()).collect();
    assert_eq!(km.free_frames(), 0);

    for f in &frames {
        unsafe { km.free(f.start_address()) };
    }
    assert_eq!(km.free_frames_on(0), 2);
    assert_eq!(km.free_frames_on(1), 2);
    assert_eq!(km.stats().frees, 4);
}

#[test]
fn test_allocated_frames_are_distinct() {
    let arena = Arena::new(32);
    let km = kmem(&arena, 4);
    HostCpu::set_core(2);

    let addrs: HashSet<u64> = (0..32)
        .map(|_| km.alloc().unwrap().start_address().as_u64())
        .collect();
    assert_eq!(addrs.len(), 32);
    assert!(addrs.iter().all(|a| a % PAGE_SIZE as u64 == 0));
}

#[test]
#[should_panic(expected = "kfree")]
fn test_free_misaligned_panics() {
    let arena = Arena::new(2);
    let km = kmem(&arena, 1);
    unsafe { km.free(arena.start().add(8)) };
}

#[test]
#[should_panic(expected = "kfree")]
fn test_free_out_of_range_panics() {
    let arena = Arena::new(2);
    let km = kmem(&arena, 1);
    unsafe { km.free(arena.end()) };
}

#[test]
fn test_check_frame_errors() {
    let arena = Arena::new(2);
    let km = kmem(&arena, 1);
    assert_eq!(km.check_frame(arena.start()), Ok(()));
    assert_eq!(km.check_frame(arena.start().add(1)), Err(MmError::NotAligned));
    assert_eq!(km.check_frame(arena.end()), Err(MmError::InvalidAddress));
}

#[test]
fn test_concurrent_alloc_free_conserves_frames() {
    let arena = Arena::new(64);
    let km = kmem(&arena, 4);

    thread::scope(|s| {
        for core in 0..4 {
            let km = &km;
            s.spawn(move || {
                HostCpu::set_core(core);
                for round in 0..200 {
                    let mut held = Vec::new();
                    for _ in 0..(round % 24 + 1) {
                        match km.alloc() {
                            Ok(f) => held.push(f),
                            Err(MmError::OutOfMemory) => break,
                            Err(e) => panic!("erro inesperado: {}", e),
                        }
                    }
                    for f in held {
                        unsafe { km.free(f.start_address()) };
                    }
                }
            });
        }
    });

    assert_eq!(km.free_frames(), km.total_frames());
    let stats = km.stats();
    assert_eq!(stats.allocs, stats.frees);
}
