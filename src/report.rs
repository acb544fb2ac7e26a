//! Evaluation of trained automata on labeled samples.

use crate::errors::{FastOilError, Result};
use crate::nfa::Nfa;
use crate::samples::{Label, SampleSet};
use crate::Symbol;

/// Anything deciding membership of symbol sequences.
pub trait Classifier {
    /// Returns `true` if `sample` is classified as positive.
    fn accepts(&self, sample: &[Symbol]) -> bool;
}

impl Classifier for Nfa {
    #[inline(always)]
    fn accepts(&self, sample: &[Symbol]) -> bool {
        self.is_match(sample)
    }
}

/// Majority vote over several automata.
///
/// A sample is accepted when strictly more than half of the members accept it.
///
/// # Examples
///
/// ```
/// use fastoil::report::{Classifier, Committee};
/// use fastoil::Nfa;
///
/// let mut a = Nfa::new(2);
/// a.set_transition(0, 1, 0);
/// a.set_initial(0);
/// a.set_final(1);
///
/// let mut b = Nfa::new(2);
/// b.set_transition(0, 1, 1);
/// b.set_initial(0);
/// b.set_final(1);
///
/// let committee = Committee::new(vec![a.clone(), a, b]).unwrap();
/// assert!(committee.accepts(&[0]));
/// assert!(!committee.accepts(&[1]));
/// ```
#[derive(Clone, Debug)]
pub struct Committee {
    members: Vec<Nfa>,
}

impl Committee {
    /// Creates a committee.
    ///
    /// # Errors
    ///
    /// [`FastOilError::InvalidArgument`] is returned when `members` is empty.
    pub fn new(members: Vec<Nfa>) -> Result<Self> {
        if members.is_empty() {
            return Err(FastOilError::invalid_argument("members.len()", ">=", 1));
        }
        Ok(Self { members })
    }

    /// Members of the committee.
    #[must_use]
    pub fn members(&self) -> &[Nfa] {
        &self.members
    }

    /// Number of members accepting `sample`.
    #[must_use]
    pub fn votes(&self, sample: &[Symbol]) -> usize {
        self.members.iter().filter(|m| m.is_match(sample)).count()
    }
}

impl Classifier for Committee {
    fn accepts(&self, sample: &[Symbol]) -> bool {
        self.votes(sample) > self.members.len() / 2
    }
}

/// Confusion counts of a classifier over a [`SampleSet`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Evaluation {
    /// Accepted positive samples.
    pub true_positives: usize,

    /// Number of positive samples.
    pub positives: usize,

    /// Rejected negative samples.
    pub true_negatives: usize,

    /// Number of negative samples.
    pub negatives: usize,
}

impl Evaluation {
    /// Classifies every sample, positives first, calling `on_decision(label, index, accepted)`
    /// for each one. `index` counts samples of the same label from zero.
    pub fn run<C, F>(classifier: &C, samples: &SampleSet, mut on_decision: F) -> Self
    where
        C: Classifier + ?Sized,
        F: FnMut(Label, usize, bool),
    {
        let mut eval = Self::default();
        for (label, sample) in samples.labeled() {
            let accepted = classifier.accepts(sample);
            match label {
                Label::Positive => {
                    on_decision(label, eval.positives, accepted);
                    eval.positives += 1;
                    eval.true_positives += usize::from(accepted);
                }
                Label::Negative => {
                    on_decision(label, eval.negatives, accepted);
                    eval.negatives += 1;
                    eval.true_negatives += usize::from(!accepted);
                }
            }
        }
        eval
    }

    /// Number of evaluated samples.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.positives + self.negatives
    }

    /// Number of correctly classified samples.
    #[must_use]
    pub const fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }

    /// Fraction of correctly classified samples, or `None` without samples.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct(), self.total())
    }

    /// Fraction of accepted positive samples, or `None` without positive samples.
    #[must_use]
    pub fn true_positive_rate(&self) -> Option<f64> {
        ratio(self.true_positives, self.positives)
    }

    /// Fraction of rejected negative samples, or `None` without negative samples.
    #[must_use]
    pub fn true_negative_rate(&self) -> Option<f64> {
        ratio(self.true_negatives, self.negatives)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(n: usize, d: usize) -> Option<f64> {
    (d != 0).then(|| n as f64 / d as f64)
}
