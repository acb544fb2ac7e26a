//! Packed storage of the successor and predecessor relations.

use core::mem;

use crate::state_set::{Iter, StateSet, WORD_BITS};
use crate::utils::words_for;
use crate::StateId;

/// One bit row per `(state, symbol)` pair, all rows in a single allocation.
///
/// Row `(st, sym)` starts at word `(st * alphabet_size + sym) * stride`, where `stride` is the
/// number of words of a row. The stride depends on the capacity, so growing the matrix moves
/// every live row to a new offset (see [`TransitionMatrix::reflow`]).
#[derive(Debug, Default)]
pub struct TransitionMatrix {
    words: Vec<u64>,
    alphabet_size: usize,
    stride: usize,
}

impl Clone for TransitionMatrix {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            alphabet_size: self.alphabet_size,
            stride: self.stride,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.words.clone_from(&source.words);
        self.alphabet_size = source.alphabet_size;
        self.stride = source.stride;
    }
}

impl TransitionMatrix {
    /// Number of words of a matrix with `capacity` states, or `None` on overflow.
    pub const fn table_words(alphabet_size: usize, capacity: usize) -> Option<usize> {
        match capacity.checked_mul(alphabet_size) {
            Some(rows) => rows.checked_mul(words_for(capacity)),
            None => None,
        }
    }

    fn zeroed(alphabet_size: usize, capacity: usize) -> Vec<u64> {
        let Some(len) = Self::table_words(alphabet_size, capacity) else {
            panic!("transition matrix too large: {capacity} states, {alphabet_size} symbols");
        };
        vec![0; len]
    }

    pub fn new(alphabet_size: usize, capacity: usize) -> Self {
        let stride = words_for(capacity);
        Self {
            words: Self::zeroed(alphabet_size, capacity),
            alphabet_size,
            stride,
        }
    }

    #[inline(always)]
    fn offset(&self, state: StateId, sym: usize) -> usize {
        debug_assert!(sym < self.alphabet_size);
        (state * self.alphabet_size + sym) * self.stride
    }

    #[inline(always)]
    pub fn row(&self, state: StateId, sym: usize) -> &[u64] {
        let start = self.offset(state, sym);
        &self.words[start..start + self.stride]
    }

    #[inline(always)]
    fn row_mut(&mut self, state: StateId, sym: usize) -> &mut [u64] {
        let start = self.offset(state, sym);
        &mut self.words[start..start + self.stride]
    }

    #[inline(always)]
    pub fn iter_row(&self, state: StateId, sym: usize) -> Iter<'_> {
        Iter::new(self.row(state, sym))
    }

    #[inline(always)]
    pub fn contains(&self, state: StateId, sym: usize, n: StateId) -> bool {
        self.row(state, sym)[n / WORD_BITS] & (1 << (n % WORD_BITS)) != 0
    }

    /// Adds `n` to row `(state, sym)`, returning whether it was already present.
    #[inline(always)]
    pub fn insert(&mut self, state: StateId, sym: usize, n: StateId) -> bool {
        let word = &mut self.row_mut(state, sym)[n / WORD_BITS];
        let mask = 1 << (n % WORD_BITS);
        let prev = *word & mask != 0;
        *word |= mask;
        prev
    }

    /// Replaces `from` by `to` in row `(state, sym)`.
    #[inline(always)]
    pub fn redirect(&mut self, state: StateId, sym: usize, from: StateId, to: StateId) {
        let row = self.row_mut(state, sym);
        row[to / WORD_BITS] |= 1 << (to % WORD_BITS);
        row[from / WORD_BITS] &= !(1 << (from % WORD_BITS));
    }

    /// Row `(dst, sym)` |= row `(src, sym)`.
    pub fn union_rows(&mut self, sym: usize, dst: StateId, src: StateId) {
        assert_ne!(dst, src);
        let dst_start = self.offset(dst, sym);
        let src_start = self.offset(src, sym);
        let stride = self.stride;
        let (dst_row, src_row) = if dst_start < src_start {
            let (lo, hi) = self.words.split_at_mut(src_start);
            (&mut lo[dst_start..dst_start + stride], &hi[..stride])
        } else {
            let (lo, hi) = self.words.split_at_mut(dst_start);
            (&mut hi[..stride], &lo[src_start..src_start + stride])
        };
        dst_row.iter_mut().zip(src_row).for_each(|(a, b)| *a |= b);
    }

    /// Empties every row of `state`.
    pub fn clear_state(&mut self, state: StateId) {
        let start = self.offset(state, 0);
        let end = start + self.alphabet_size * self.stride;
        self.words[start..end].fill(0);
    }

    /// Re-lays the matrix out for `capacity` states, moving the rows of every state in `live` to
    /// their new offsets. Rows of other states are dropped.
    pub fn reflow(&mut self, capacity: usize, live: &StateSet) {
        let stride = words_for(capacity);
        let mut words = Self::zeroed(self.alphabet_size, capacity);
        for state in live.iter() {
            for sym in 0..self.alphabet_size {
                let old = self.offset(state, sym);
                let new = (state * self.alphabet_size + sym) * stride;
                words[new..new + self.stride].copy_from_slice(&self.words[old..old + self.stride]);
            }
        }
        self.words = words;
        self.stride = stride;
    }

    pub fn heap_bytes(&self) -> usize {
        self.words.len() * mem::size_of::<u64>()
    }
}
