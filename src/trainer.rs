//! Order Independent Language (OIL) induction.

use core::mem;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::errors::{FastOilError, Result};
use crate::nfa::Nfa;
use crate::samples::SampleSet;
use crate::{Sample, StateId, Symbol};

/// Trainer inferring an [`Nfa`] from positive and negative samples.
///
/// Positive samples are processed shortest first. A sample the current hypothesis does not
/// accept is *coerced*: a fresh path spelling it is added from a new initial state to a new
/// final state. Each new state is then merged, if possible, into another state such that no
/// negative sample becomes accepted, preferring the merge that accepts the most of the remaining
/// positive samples.
///
/// # Examples
///
/// ```
/// use fastoil::{OilTrainer, SampleSet};
/// use rand::SeedableRng;
///
/// let mut samples = SampleSet::new(
///     2,
///     vec![vec![0], vec![0, 0], vec![0, 0, 0]],
///     vec![vec![1], vec![0, 1]],
/// )
/// .unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let nfa = OilTrainer::new().train(&mut samples, &mut rng).unwrap();
///
/// assert!(nfa.is_match([0, 0]));
/// assert!(!nfa.is_match([0, 1]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct OilTrainer {
    show_progress: bool,
    show_merges: bool,
    show_possible_merges: bool,
    skip_best_search: bool,
    deterministic: bool,
}

impl OilTrainer {
    /// Creates a trainer with the default configuration: thorough merge search, randomized merge
    /// order and no diagnostics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            show_progress: false,
            show_merges: false,
            show_possible_merges: false,
            skip_best_search: false,
            deterministic: false,
        }
    }

    /// Emits an `info` event after each positive sample.
    #[must_use]
    pub const fn show_progress(mut self, yes: bool) -> Self {
        self.show_progress = yes;
        self
    }

    /// Emits an `info` event for every committed merge.
    #[must_use]
    pub const fn show_merges(mut self, yes: bool) -> Self {
        self.show_merges = yes;
        self
    }

    /// Emits a `debug` event for every merge that keeps all negative samples rejected.
    #[must_use]
    pub const fn show_possible_merges(mut self, yes: bool) -> Self {
        self.show_possible_merges = yes;
        self
    }

    /// Commits the first merge that keeps all negative samples rejected instead of searching for
    /// the one accepting the most remaining positive samples.
    ///
    /// No score is computed in this mode.
    #[must_use]
    pub const fn skip_best_search(mut self, yes: bool) -> Self {
        self.skip_best_search = yes;
        self
    }

    /// Visits new states in creation order instead of shuffling them.
    #[must_use]
    pub const fn deterministic(mut self, yes: bool) -> Self {
        self.deterministic = yes;
        self
    }

    /// Trains an automaton accepting every positive sample and rejecting every negative one.
    ///
    /// Both sets of `samples` are sorted in place. `rng` decides the order in which new states
    /// are considered for merging, unless [`OilTrainer::deterministic`] is set.
    ///
    /// # Errors
    ///
    /// [`FastOilError::ConflictingSample`] is returned when a sequence is both positive and
    /// negative.
    pub fn train<R>(&self, samples: &mut SampleSet, rng: &mut R) -> Result<Nfa>
    where
        R: Rng + ?Sized,
    {
        let mut session = self.session(samples, rng)?;
        while session.step().is_some() {}
        Ok(session.finish())
    }

    /// Starts a training run that processes one positive sample per [`TrainingSession::step`].
    ///
    /// # Errors
    ///
    /// [`FastOilError::ConflictingSample`] is returned when a sequence is both positive and
    /// negative.
    pub fn session<'a, R>(
        &self,
        samples: &'a mut SampleSet,
        rng: &'a mut R,
    ) -> Result<TrainingSession<'a, R>>
    where
        R: Rng + ?Sized,
    {
        samples.sort();
        if let Some(sample) = samples.find_conflict() {
            return Err(FastOilError::conflicting_sample(sample.clone()));
        }
        let alphabet_size = samples.alphabet_size();
        Ok(TrainingSession {
            config: *self,
            positives: samples.positives(),
            negatives: samples.negatives(),
            next: 0,
            hypothesis: Nfa::new(alphabet_size),
            candidate: Nfa::new(alphabet_size),
            best: Nfa::new(alphabet_size),
            states: vec![],
            rng,
        })
    }
}

/// Outcome of one [`TrainingSession::step`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Step {
    /// Index of the processed sample among the sorted positive samples.
    pub index: usize,

    /// Whether a path had to be added for the sample.
    pub coerced: bool,

    /// Number of merges committed after the coercion.
    pub merges: usize,
}

/// Merge chosen for a new state during the search.
#[derive(Clone, Copy, Debug)]
struct MergeChoice {
    position: usize,
    score: Option<usize>,
}

/// A training run in progress. Created by [`OilTrainer::session`].
pub struct TrainingSession<'a, R: ?Sized> {
    config: OilTrainer,
    positives: &'a [Sample],
    negatives: &'a [Sample],
    next: usize,
    hypothesis: Nfa,
    // Scratch automata for speculative merges. Their contents are meaningless between steps.
    candidate: Nfa,
    best: Nfa,
    // Live states in merge-search order; the states of the latest coercion form the tail.
    states: Vec<StateId>,
    rng: &'a mut R,
}

impl<'a, R> TrainingSession<'a, R>
where
    R: Rng + ?Sized,
{
    /// The current hypothesis.
    #[must_use]
    pub const fn hypothesis(&self) -> &Nfa {
        &self.hypothesis
    }

    /// Number of positive samples processed so far.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.next
    }

    /// Positive samples in processing order.
    #[must_use]
    pub const fn positives(&self) -> &'a [Sample] {
        self.positives
    }

    /// Negative samples, sorted.
    #[must_use]
    pub const fn negatives(&self) -> &'a [Sample] {
        self.negatives
    }

    /// Processes the next positive sample. Returns `None` once every sample has been processed.
    pub fn step(&mut self) -> Option<Step> {
        let index = self.next;
        let positives = self.positives;
        let sample = positives.get(index)?;
        self.next += 1;

        let mut step = Step {
            index,
            coerced: false,
            merges: 0,
        };
        if !self.hypothesis.is_match(sample) {
            let pending = self.coerce(sample);
            step.coerced = true;
            step.merges = self.merge_pending(pending);
        }

        debug_assert!(self.positives[..self.next]
            .iter()
            .all(|p| self.hypothesis.is_match(p)));
        debug_assert!(!self.negatives.iter().any(|n| self.hypothesis.is_match(n)));

        if self.config.show_progress {
            let total = self.positives.len();
            info!(
                processed = self.next,
                total,
                percent = self.next * 100 / total,
                states = self.hypothesis.num_states(),
                "processed positive sample"
            );
        }
        Some(step)
    }

    /// Consumes the session, returning the hypothesis.
    #[must_use]
    pub fn finish(self) -> Nfa {
        info!(
            states = self.hypothesis.num_states(),
            positives = self.positives.len(),
            negatives = self.negatives.len(),
            "training finished"
        );
        self.hypothesis
    }

    /// Adds a fresh path spelling `sample` and returns where its states start in `self.states`.
    fn coerce(&mut self, sample: &[Symbol]) -> usize {
        let pending = self.states.len();

        let mut last = self.hypothesis.inactive_state();
        self.hypothesis.set_initial(last);
        self.states.push(last);
        for &sym in sample {
            let next = self.hypothesis.inactive_state();
            self.hypothesis.set_transition(last, next, sym);
            self.states.push(next);
            last = next;
        }
        self.hypothesis.set_final(last);

        debug_assert!(self.hypothesis.is_match(sample));
        pending
    }

    fn accepts_any_negative(&self, nfa: &Nfa) -> bool {
        self.negatives.iter().any(|n| nfa.is_match(n))
    }

    /// Number of positive samples after the current one accepted by `nfa`.
    fn score(&self, nfa: &Nfa) -> usize {
        self.positives[self.next..]
            .iter()
            .filter(|p| nfa.is_match(p))
            .count()
    }

    /// Searches a safe merge partner among `self.states[..i]` for `self.states[i]`, leaving the
    /// merged automaton in `self.best`.
    fn search_partner(&mut self, i: usize) -> Option<MergeChoice> {
        let s1 = self.states[i];
        let mut choice: Option<MergeChoice> = None;
        for j in 0..i {
            let s2 = self.states[j];
            self.candidate.clone_from(&self.hypothesis);
            self.candidate.merge(s2, s1);
            if self.accepts_any_negative(&self.candidate) {
                continue;
            }

            if self.config.skip_best_search {
                mem::swap(&mut self.best, &mut self.candidate);
                return Some(MergeChoice {
                    position: j,
                    score: None,
                });
            }

            let score = self.score(&self.candidate);
            if self.config.show_possible_merges {
                debug!(j, i, s2, s1, score, "possible merge");
            }
            if choice.map_or(true, |c| c.score.map_or(true, |best| score > best)) {
                mem::swap(&mut self.best, &mut self.candidate);
                choice = Some(MergeChoice {
                    position: j,
                    score: Some(score),
                });
            }
        }
        choice
    }

    /// Merges the states `self.states[pending..]` wherever it is safe, returning the number of
    /// committed merges.
    fn merge_pending(&mut self, pending: usize) -> usize {
        if !self.config.deterministic {
            self.states[pending..].shuffle(self.rng);
        }

        let mut merges = 0;
        let mut i = pending;
        while i < self.states.len() {
            let Some(choice) = self.search_partner(i) else {
                i += 1;
                continue;
            };
            let s1 = self.states[i];
            let s2 = self.states[choice.position];
            if self.config.show_merges {
                info!(
                    j = choice.position,
                    i,
                    s2,
                    s1,
                    score = ?choice.score,
                    "merge"
                );
            }

            mem::swap(&mut self.hypothesis, &mut self.best);
            debug_assert!(self.hypothesis.is_consistent());
            merges += 1;

            // The next pending state takes position i, which is examined again.
            if self.config.deterministic {
                self.states.remove(i);
            } else {
                self.states.swap_remove(i);
            }
        }
        merges
    }
}
