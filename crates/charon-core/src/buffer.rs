//! Buffer extensible à capacité explicite.
//!
//! Sert à la fois au flux d'instructions d'un [`Chunk`](crate::Chunk) et à sa
//! table de constantes. Le stockage est une slice boxée dont la longueur est
//! toujours la capacité ; `len` compte le préfixe vivant.

use core::fmt;

/// Capacité initiale de tout buffer.
pub const INITIAL_CAPACITY: usize = 8;

/// Buffer contigu possédé qui double sa capacité quand il est plein.
///
/// Invariant après chaque mutation : `len <= capacity == storage.len()`.
#[derive(Clone, PartialEq)]
pub struct GrowBuffer<T> {
    len: usize,
    storage: Box<[T]>,
}

impl<T: Copy + Default> Default for GrowBuffer<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Copy + Default> GrowBuffer<T> {
    /// Buffer vide de [`INITIAL_CAPACITY`] cases.
    pub fn new() -> Self { Self::with_capacity(INITIAL_CAPACITY) }

    /// Buffer vide d'au moins une case.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { len: 0, storage: vec![T::default(); capacity.max(1)].into_boxed_slice() }
    }

    /// Ajoute `value`, en doublant d'abord la capacité si le buffer est plein.
    ///
    /// Renvoie l'indice écrit, toujours `len() - 1`.
    pub fn write(&mut self, value: T) -> usize {
        if self.len == self.storage.len() {
            self.grow();
        }
        let idx = self.len;
        self.storage[idx] = value;
        self.len += 1;
        idx
    }

    /// Déplace le préfixe vivant dans une allocation deux fois plus grande.
    fn grow(&mut self) {
        let capacity = self.storage.len() * 2;
        let mut next = vec![T::default(); capacity].into_boxed_slice();
        next[..self.len].copy_from_slice(&self.storage[..self.len]);
        self.storage = next;
    }
}

impl<T> GrowBuffer<T> {
    /// Nombre d'éléments vivants.
    pub fn len(&self) -> usize { self.len }

    /// Vrai si rien n'a été écrit.
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Cases allouées.
    pub fn capacity(&self) -> usize { self.storage.len() }

    /// Les éléments vivants `[0, len)`.
    pub fn as_slice(&self) -> &[T] { &self.storage[..self.len] }

    /// Élément vivant à l'indice `idx`.
    pub fn get(&self, idx: usize) -> Option<&T> { self.as_slice().get(idx) }
}

impl<T: fmt::Debug> fmt::Debug for GrowBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrowBuffer")
            .field("len", &self.len)
            .field("capacity", &self.storage.len())
            .field("live", &self.as_slice())
            .finish()
    }
}
