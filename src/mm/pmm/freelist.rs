//! Lista livre intrusiva.
//!
//! O nó vive dentro do próprio frame livre: a primeira palavra da página
//! guarda o ponteiro para o próximo frame. Frames alocados não têm nenhuma
//! representação aqui.

use core::ptr::NonNull;

#[repr(C)]
struct Run {
    next: Option<NonNull<Run>>,
}

/// Pilha LIFO de frames livres.
pub struct FreeList {
    head: Option<NonNull<Run>>,
    len: usize,
}

// SAFETY: os frames encadeados pertencem exclusivamente à lista
unsafe impl Send for FreeList {}

impl FreeList {
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Empilha um frame livre.
    ///
    /// # Safety
    ///
    /// `page` deve apontar para um frame inteiro, alinhado a página,
    /// acessível para escrita e que ninguém mais referencia.
    pub unsafe fn push(&mut self, page: NonNull<u8>) {
        let run = page.cast::<Run>();
        run.as_ptr().write(Run { next: self.head });
        self.head = Some(run);
        self.len += 1;
    }

    /// Desempilha o frame do topo.
    pub fn pop(&mut self) -> Option<NonNull<u8>> {
        let run = self.head?;
        // SAFETY: todo nó da lista foi escrito por `push`
        self.head = unsafe { (*run.as_ptr()).next };
        self.len -= 1;
        Some(run.cast())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl Default for FreeList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::boxed::Box;
    use std::vec::Vec;

    #[repr(align(64))]
    struct Slot([u8; 64]);

    #[test]
    fn test_lifo_order_and_len() {
        let mut slots: Vec<Box<Slot>> = (0..3).map(|_| Box::new(Slot([0; 64]))).collect();
        let ptrs: Vec<NonNull<u8>> = slots
            .iter_mut()
            .map(|s| NonNull::new(s.0.as_mut_ptr()).unwrap())
            .collect();

        let mut list = FreeList::new();
        assert!(list.is_empty());
        for p in &ptrs {
            unsafe { list.push(*p) };
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.pop(), Some(ptrs[2]));
        assert_eq!(list.pop(), Some(ptrs[1]));
        assert_eq!(list.pop(), Some(ptrs[0]));
        assert_eq!(list.pop(), None);
        assert_eq!(list.len(), 0);
    }
}
