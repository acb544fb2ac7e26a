//! Fixed-capacity bit vectors over state indices.

use crate::utils::words_for;
use crate::StateId;

/// Number of bits in one storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// A set of states represented as a bit vector.
///
/// Bit `n` is set iff state `n` belongs to the set. The capacity is fixed at construction and is
/// always a multiple of [`WORD_BITS`]; accessing an index beyond it is a programming error and
/// panics.
///
/// # Examples
///
/// ```
/// use fastoil::StateSet;
///
/// let mut set = StateSet::with_capacity(128);
/// assert!(!set.set(3));
/// assert!(set.set(3));
/// set.set(70);
///
/// assert_eq!(vec![3, 70], set.iter().collect::<Vec<_>>());
/// ```
#[derive(Default, Debug, Eq, Hash, PartialEq)]
pub struct StateSet {
    words: Vec<u64>,
}

impl Clone for StateSet {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.words.clone_from(&source.words);
    }
}

impl StateSet {
    /// Creates an empty set able to hold states `0..capacity`, rounded up to a multiple of
    /// [`WORD_BITS`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; words_for(capacity)],
        }
    }

    /// Number of states this set can hold.
    #[inline(always)]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    #[inline(always)]
    fn locate(&self, n: StateId) -> (usize, u64) {
        assert!(
            n < self.capacity(),
            "state out of range: {} >= {}",
            n,
            self.capacity()
        );
        (n / WORD_BITS, 1 << (n % WORD_BITS))
    }

    /// Sets bit `n`, returning its previous value.
    #[inline(always)]
    pub fn set(&mut self, n: StateId) -> bool {
        let (w, mask) = self.locate(n);
        let prev = self.words[w] & mask != 0;
        self.words[w] |= mask;
        prev
    }

    /// Clears bit `n`, returning its previous value.
    #[inline(always)]
    pub fn clear(&mut self, n: StateId) -> bool {
        let (w, mask) = self.locate(n);
        let prev = self.words[w] & mask != 0;
        self.words[w] &= !mask;
        prev
    }

    /// Returns the value of bit `n`.
    #[inline(always)]
    #[must_use]
    pub fn test(&self, n: StateId) -> bool {
        let (w, mask) = self.locate(n);
        self.words[w] & mask != 0
    }

    /// Clears every bit.
    #[inline(always)]
    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /// In-place intersection.
    pub fn and(&mut self, other: &Self) {
        self.check_capacity(other);
        self.words
            .iter_mut()
            .zip(&other.words)
            .for_each(|(a, b)| *a &= b);
    }

    /// In-place union.
    pub fn or(&mut self, other: &Self) {
        self.check_capacity(other);
        or_words(&mut self.words, &other.words);
    }

    /// In-place symmetric difference.
    pub fn xor(&mut self, other: &Self) {
        self.check_capacity(other);
        self.words
            .iter_mut()
            .zip(&other.words)
            .for_each(|(a, b)| *a ^= b);
    }

    /// Checks if at least one bit is set.
    #[inline(always)]
    #[must_use]
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Checks if no bit is set.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Checks if `self & other` would have at least one bit set, without modifying either set.
    #[must_use]
    pub fn test_and(&self, other: &Self) -> bool {
        self.check_capacity(other);
        any_and_words(&self.words, &other.words)
    }

    /// Checks if `self | other` would have at least one bit set, without modifying either set.
    #[must_use]
    pub fn test_or(&self, other: &Self) -> bool {
        self.check_capacity(other);
        self.words.iter().zip(&other.words).any(|(a, b)| a | b != 0)
    }

    /// Checks if `self ^ other` would have at least one bit set, without modifying either set.
    #[must_use]
    pub fn test_xor(&self, other: &Self) -> bool {
        self.check_capacity(other);
        self.words.iter().zip(&other.words).any(|(a, b)| a ^ b != 0)
    }

    /// Sets bit `n1` if either `n1` or `n2` was set, then clears `n2`.
    ///
    /// Used to fold the flags of a state being merged away into the surviving state.
    pub fn or_then_clear_second(&mut self, n1: StateId, n2: StateId) {
        let first = self.test(n1);
        let second = self.clear(n2);
        if first || second {
            self.set(n1);
        }
    }

    /// Population count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the lowest index whose bit is clear, or `None` if the set is full.
    #[must_use]
    pub fn first_clear(&self) -> Option<StateId> {
        self.words
            .iter()
            .position(|&w| w != u64::MAX)
            .map(|i| i * WORD_BITS + (!self.words[i]).trailing_zeros() as usize)
    }

    /// Creates an iterator over the set bits in ascending order.
    #[inline(always)]
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.words)
    }

    /// Extends the capacity to hold states `0..capacity`. Existing bits are kept.
    pub(crate) fn grow(&mut self, capacity: usize) {
        let words = words_for(capacity);
        if words > self.words.len() {
            self.words.resize(words, 0);
        }
    }

    #[inline(always)]
    pub(crate) fn as_words(&self) -> &[u64] {
        &self.words
    }

    #[inline(always)]
    pub(crate) fn as_words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    #[inline(always)]
    fn check_capacity(&self, other: &Self) {
        assert_eq!(
            self.words.len(),
            other.words.len(),
            "state sets of different capacities"
        );
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        self.words.len() * core::mem::size_of::<u64>()
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = StateId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `dst |= src`, word by word.
#[inline(always)]
pub(crate) fn or_words(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    dst.iter_mut().zip(src).for_each(|(a, b)| *a |= b);
}

/// Checks if `a & b` has at least one bit set.
#[inline(always)]
pub(crate) fn any_and_words(a: &[u64], b: &[u64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).any(|(x, y)| x & y != 0)
}

/// Iterator over the set bits of a [`StateSet`] (or of a transition row), in ascending order.
///
/// The iterator only moves forward; [`Iter::rewind`] restarts it from the lowest bit.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    words: &'a [u64],
    word_idx: usize,
    fetch: u64,
}

impl<'a> Iter<'a> {
    #[inline(always)]
    pub(crate) fn new(words: &'a [u64]) -> Self {
        Self {
            words,
            word_idx: 0,
            fetch: words.first().copied().unwrap_or(0),
        }
    }

    /// Restarts the iteration from the lowest bit.
    pub fn rewind(&mut self) {
        *self = Self::new(self.words);
    }
}

impl Iterator for Iter<'_> {
    type Item = StateId;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        while self.fetch == 0 {
            self.word_idx += 1;
            self.fetch = *self.words.get(self.word_idx)?;
        }
        let bit = self.fetch.trailing_zeros() as usize;
        // Clears the lowest set bit.
        self.fetch &= self.fetch - 1;
        Some(self.word_idx * WORD_BITS + bit)
    }
}
