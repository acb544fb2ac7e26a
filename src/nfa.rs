//! Nondeterministic finite automaton over a bit-matrix representation.

use core::mem;

use crate::matrix::TransitionMatrix;
use crate::state_set::{any_and_words, or_words, Iter, StateSet};
use crate::utils::{aligned_capacity, grown_capacity, FromU32, STATE_BLOCK};
use crate::{StateId, Symbol};

/// Largest number of state slots an [`Nfa`] may grow to.
///
/// Each direction of the transition relation takes `capacity * alphabet_size * capacity / 8`
/// bytes, so an automaton this large needs `2^37` bytes per symbol and direction. Readers of
/// untrusted input bound the footprint with [`MAX_MATRIX_BYTES`] instead.
pub const MAX_STATES: usize = 1 << 20;

/// Largest size in bytes of one direction of the transition relation accepted when an automaton
/// or a sample set is read from text.
///
/// With two symbols this admits up to 65536 states.
pub const MAX_MATRIX_BYTES: usize = 1 << 30;

/// Nondeterministic finite automaton with a fixed alphabet and a growable set of states.
///
/// States are slots `0..max_states()`. A slot becomes *active* the first time it is referenced
/// by [`Nfa::set_transition`], [`Nfa::set_initial`], [`Nfa::set_final`] or [`Nfa::add_state`],
/// and becomes inactive again only when [`Nfa::merge`] absorbs it into another state.
///
/// For every pair `(state, symbol)` the automaton keeps both the set of successors and the set
/// of predecessors, and every mutation updates both sides.
///
/// # Examples
///
/// ```
/// use fastoil::Nfa;
///
/// let mut nfa = Nfa::new(5);
/// nfa.set_transition(0, 1, 3);
/// nfa.set_initial(0);
/// nfa.set_final(1);
///
/// assert!(nfa.is_match([3]));
/// assert!(!nfa.is_match([1]));
/// assert!(!nfa.is_match([1, 2, 3, 4]));
/// ```
#[derive(Debug)]
pub struct Nfa {
    alphabet_size: usize,
    max_states: usize,
    active: StateSet,
    initial: StateSet,
    finals: StateSet,
    predecessors: TransitionMatrix,
    successors: TransitionMatrix,
}

impl Clone for Nfa {
    fn clone(&self) -> Self {
        Self {
            alphabet_size: self.alphabet_size,
            max_states: self.max_states,
            active: self.active.clone(),
            initial: self.initial.clone(),
            finals: self.finals.clone(),
            predecessors: self.predecessors.clone(),
            successors: self.successors.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.alphabet_size = source.alphabet_size;
        self.max_states = source.max_states;
        self.active.clone_from(&source.active);
        self.initial.clone_from(&source.initial);
        self.finals.clone_from(&source.finals);
        self.predecessors.clone_from(&source.predecessors);
        self.successors.clone_from(&source.successors);
    }
}

impl Nfa {
    /// Creates an empty automaton over the alphabet `0..alphabet_size`.
    ///
    /// The alphabet size cannot be changed afterwards.
    #[must_use]
    pub fn new(alphabet_size: usize) -> Self {
        let max_states = STATE_BLOCK;
        Self {
            alphabet_size,
            max_states,
            active: StateSet::with_capacity(max_states),
            initial: StateSet::with_capacity(max_states),
            finals: StateSet::with_capacity(max_states),
            predecessors: TransitionMatrix::new(alphabet_size, max_states),
            successors: TransitionMatrix::new(alphabet_size, max_states),
        }
    }

    /// Size of the alphabet.
    #[inline(always)]
    #[must_use]
    pub const fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Current number of state slots. Always a multiple of 256.
    #[inline(always)]
    #[must_use]
    pub const fn max_states(&self) -> usize {
        self.max_states
    }

    /// Number of active states.
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.active.len()
    }

    #[inline(always)]
    fn symbol_index(&self, sym: Symbol) -> usize {
        let sym = usize::from_u32(sym);
        assert!(
            sym < self.alphabet_size,
            "symbol out of range: {} >= {}",
            sym,
            self.alphabet_size
        );
        sym
    }

    /// Checks if `st` is active.
    #[inline(always)]
    #[must_use]
    pub fn is_active(&self, st: StateId) -> bool {
        st < self.max_states && self.active.test(st)
    }

    /// Checks if `st` is an initial state.
    #[inline(always)]
    #[must_use]
    pub fn is_initial(&self, st: StateId) -> bool {
        st < self.max_states && self.initial.test(st)
    }

    /// Checks if `st` is a final state.
    #[inline(always)]
    #[must_use]
    pub fn is_final(&self, st: StateId) -> bool {
        st < self.max_states && self.finals.test(st)
    }

    /// Checks if the transition `src --sym--> dst` exists.
    ///
    /// # Panics
    ///
    /// Panics if `sym` is outside the alphabet.
    #[must_use]
    pub fn has_transition(&self, src: StateId, dst: StateId, sym: Symbol) -> bool {
        let sym = self.symbol_index(sym);
        self.is_active(src) && self.is_active(dst) && self.successors.contains(src, sym, dst)
    }

    /// Iterator over the active states in ascending order.
    #[must_use]
    pub fn states(&self) -> Iter<'_> {
        self.active.iter()
    }

    /// Iterator over the initial states in ascending order.
    #[must_use]
    pub fn initial_states(&self) -> Iter<'_> {
        self.initial.iter()
    }

    /// Iterator over the final states in ascending order.
    #[must_use]
    pub fn final_states(&self) -> Iter<'_> {
        self.finals.iter()
    }

    /// Iterator over the states reached from `st` by `sym`.
    ///
    /// # Panics
    ///
    /// Panics if `st` is inactive or `sym` is outside the alphabet.
    #[must_use]
    pub fn successors(&self, st: StateId, sym: Symbol) -> Iter<'_> {
        assert!(self.is_active(st), "inactive state: {st}");
        self.successors.iter_row(st, self.symbol_index(sym))
    }

    /// Iterator over the states reaching `st` by `sym`.
    ///
    /// # Panics
    ///
    /// Panics if `st` is inactive or `sym` is outside the alphabet.
    #[must_use]
    pub fn predecessors(&self, st: StateId, sym: Symbol) -> Iter<'_> {
        assert!(self.is_active(st), "inactive state: {st}");
        self.predecessors.iter_row(st, self.symbol_index(sym))
    }

    /// Iterator over all transitions as `(src, dst, sym)`, ordered by source, then symbol, then
    /// destination.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, StateId, Symbol)> + '_ {
        self.states().flat_map(move |src| {
            (0..self.alphabet_size).flat_map(move |sym| {
                self.successors
                    .iter_row(src, sym)
                    .map(move |dst| (src, dst, sym as Symbol))
            })
        })
    }

    /// Bytes taken by one direction of the transition relation once `num_states` slots are in
    /// use, or `None` if the size overflows `usize`.
    #[must_use]
    pub const fn matrix_bytes(alphabet_size: usize, num_states: usize) -> Option<usize> {
        if num_states > MAX_STATES {
            return None;
        }
        match TransitionMatrix::table_words(alphabet_size, grown_capacity(num_states)) {
            Some(words) => words.checked_mul(mem::size_of::<u64>()),
            None => None,
        }
    }

    /// Returns the lowest inactive slot. If every slot is in use, returns [`Nfa::max_states`],
    /// which grows the automaton once it is activated.
    #[must_use]
    pub fn inactive_state(&self) -> StateId {
        self.active.first_clear().unwrap_or(self.max_states)
    }

    fn grow_for(&mut self, st: StateId) {
        assert!(st < MAX_STATES, "state out of range: {st} >= {MAX_STATES}");
        let mut capacity = self.max_states;
        while st >= capacity {
            capacity *= 2;
        }
        let capacity = aligned_capacity(capacity);
        // Rows are relocated before the new state is marked active.
        self.predecessors.reflow(capacity, &self.active);
        self.successors.reflow(capacity, &self.active);
        self.active.grow(capacity);
        self.initial.grow(capacity);
        self.finals.grow(capacity);
        self.max_states = capacity;
    }

    fn activate(&mut self, st: StateId) {
        if st >= self.max_states {
            self.grow_for(st);
        }
        if !self.active.set(st) {
            // Initial and final bits are already clear: merge() resets them on deactivation.
            self.predecessors.clear_state(st);
            self.successors.clear_state(st);
        }
    }

    /// Activates `st` without adding transitions or flags. Does nothing if it is already active.
    pub fn add_state(&mut self, st: StateId) {
        self.activate(st);
    }

    /// Adds the transition `src --sym--> dst`, activating both states if needed.
    ///
    /// # Panics
    ///
    /// Panics if `sym` is outside the alphabet.
    pub fn set_transition(&mut self, src: StateId, dst: StateId, sym: Symbol) {
        let sym = self.symbol_index(sym);
        self.activate(src);
        self.activate(dst);
        if !self.successors.insert(src, sym, dst) {
            self.predecessors.insert(dst, sym, src);
        }
    }

    /// Marks `st` as initial, activating it if needed.
    pub fn set_initial(&mut self, st: StateId) {
        self.activate(st);
        self.initial.set(st);
    }

    /// Marks `st` as final, activating it if needed.
    pub fn set_final(&mut self, st: StateId) {
        self.activate(st);
        self.finals.set(st);
    }

    /// Merges `s2` into `s1`.
    ///
    /// `s1` inherits the initial/final flags and every incoming and outgoing transition of
    /// `s2`; `s2` is deactivated and its slot can be reused.
    ///
    /// # Panics
    ///
    /// Panics if either state is inactive or if `s1 == s2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastoil::Nfa;
    ///
    /// let mut nfa = Nfa::new(2);
    /// nfa.set_transition(0, 1, 0);
    /// nfa.set_transition(0, 0, 1);
    /// nfa.set_initial(0);
    /// nfa.set_final(1);
    /// nfa.merge(0, 1);
    ///
    /// assert_eq!(1, nfa.num_states());
    /// assert!(nfa.has_transition(0, 0, 0));
    /// assert!(nfa.has_transition(0, 0, 1));
    /// assert!(nfa.is_match([0, 1, 1, 0]));
    /// assert!(nfa.is_match(Vec::new()));
    /// ```
    pub fn merge(&mut self, s1: StateId, s2: StateId) {
        assert!(self.is_active(s1), "merge on inactive state: {s1}");
        assert!(self.is_active(s2), "merge on inactive state: {s2}");
        assert_ne!(s1, s2, "merge of a state with itself");

        self.initial.or_then_clear_second(s1, s2);
        self.finals.or_then_clear_second(s1, s2);
        self.active.clear(s2);

        for sym in 0..self.alphabet_size {
            self.predecessors.union_rows(sym, s1, s2);
            for p in self.predecessors.iter_row(s2, sym) {
                self.successors.redirect(p, sym, s2, s1);
            }

            // A loop on s2 has just been redirected to s1 above, so s2 is no longer in its own
            // successor row.
            self.successors.union_rows(sym, s1, s2);
            for q in self.successors.iter_row(s2, sym) {
                self.predecessors.redirect(q, sym, s2, s1);
            }
        }
    }

    /// Checks if the automaton accepts `sequence`, by simulating all paths at once.
    ///
    /// # Panics
    ///
    /// Panics if `sequence` contains a symbol outside the alphabet.
    pub fn is_match<P>(&self, sequence: P) -> bool
    where
        P: AsRef<[Symbol]>,
    {
        let mut current = self.initial.clone();
        let mut next = StateSet::with_capacity(self.max_states);
        for &sym in sequence.as_ref() {
            let sym = self.symbol_index(sym);
            if current.is_empty() {
                return false;
            }
            next.clear_all();
            for st in current.iter() {
                or_words(next.as_words_mut(), self.successors.row(st, sym));
            }
            mem::swap(&mut current, &mut next);
        }
        any_and_words(current.as_words(), self.finals.as_words())
    }

    /// Checks that the successor and predecessor relations mirror each other, that every
    /// transition connects active states, and that only active states carry flags.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let flags_ok = self
            .initial
            .iter()
            .chain(self.finals.iter())
            .all(|st| self.active.test(st));
        flags_ok
            && self.states().all(|st| {
                (0..self.alphabet_size).all(|sym| {
                    self.successors.iter_row(st, sym).all(|dst| {
                        self.active.test(dst) && self.predecessors.contains(dst, sym, st)
                    }) && self.predecessors.iter_row(st, sym).all(|src| {
                        self.active.test(src) && self.successors.contains(src, sym, st)
                    })
                })
            })
    }

    /// Returns the total amount of heap used by this automaton in bytes.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        self.active.heap_bytes()
            + self.initial.heap_bytes()
            + self.finals.heap_bytes()
            + self.predecessors.heap_bytes()
            + self.successors.heap_bytes()
    }
}
