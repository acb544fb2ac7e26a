//! Labeled sample sets and the sample file reader.
//!
//! A sample file starts with a header `<count> <alphabet size>` followed by one sample per line,
//! `<label> <length> <sym_1> ... <sym_length>`. Label `1` marks a positive sample; any other
//! value marks a negative one.
//!
//! ```
//! use fastoil::SampleSet;
//!
//! let text = "3 4\n1 2 0 1\n0 1 3\n1 0\n";
//! let samples = SampleSet::from_reader(text.as_bytes()).unwrap();
//!
//! assert_eq!(4, samples.alphabet_size());
//! assert_eq!(&[vec![0, 1], vec![]], samples.positives());
//! assert_eq!(&[vec![3]], samples.negatives());
//! ```

use core::cmp::Ordering;
use core::str::FromStr;
use std::io::BufRead;

use tracing::warn;

use crate::errors::{FastOilError, InvalidArgumentError, Result};
use crate::nfa::{Nfa, MAX_MATRIX_BYTES};
use crate::utils::FromU32;
use crate::{Sample, Symbol};

/// Positive and negative symbol sequences over a common alphabet.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleSet {
    alphabet_size: usize,
    positives: Vec<Sample>,
    negatives: Vec<Sample>,
}

/// Whether a sample is expected to be accepted or rejected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Label {
    /// The sample belongs to the language.
    Positive,

    /// The sample does not belong to the language.
    Negative,
}

/// Order used by training: shorter samples first, then lexicographic.
pub fn sample_order(a: &[Symbol], b: &[Symbol]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl SampleSet {
    /// Creates a sample set from its parts.
    ///
    /// # Errors
    ///
    /// [`FastOilError`] is returned when a sample contains a symbol `>= alphabet_size`.
    pub fn new(alphabet_size: usize, positives: Vec<Sample>, negatives: Vec<Sample>) -> Result<Self> {
        for sample in positives.iter().chain(&negatives) {
            if let Some(&sym) = sample
                .iter()
                .find(|&&sym| usize::from_u32(sym) >= alphabet_size)
            {
                return Err(FastOilError::InvalidArgument(InvalidArgumentError {
                    arg: "samples",
                    msg: format!("symbol {sym} in {sample:?} must be < {alphabet_size}"),
                }));
            }
        }
        Ok(Self {
            alphabet_size,
            positives,
            negatives,
        })
    }

    /// Size of the alphabet every sample is drawn from.
    #[must_use]
    pub const fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Positive samples, in their current order.
    #[must_use]
    pub fn positives(&self) -> &[Sample] {
        &self.positives
    }

    /// Negative samples, in their current order.
    #[must_use]
    pub fn negatives(&self) -> &[Sample] {
        &self.negatives
    }

    /// Iterator over every sample with its label, positives first.
    pub fn labeled(&self) -> impl Iterator<Item = (Label, &[Symbol])> + '_ {
        self.positives
            .iter()
            .map(|s| (Label::Positive, s.as_slice()))
            .chain(self.negatives.iter().map(|s| (Label::Negative, s.as_slice())))
    }

    /// Sorts both sets with [`sample_order`].
    pub fn sort(&mut self) {
        self.positives.sort_by(|a, b| sample_order(a, b));
        self.negatives.sort_by(|a, b| sample_order(a, b));
    }

    /// Returns a sample present in both sets, if any. Both sets must be sorted.
    pub(crate) fn find_conflict(&self) -> Option<&Sample> {
        self.positives.iter().find(|p| {
            self.negatives
                .binary_search_by(|n| sample_order(n, p))
                .is_ok()
        })
    }

    /// Reads a sample file.
    ///
    /// # Errors
    ///
    /// [`FastOilError::InvalidFormat`] is returned with the offending line number when the
    /// header or a sample line is malformed, the alphabet is too large for an [`Nfa`] to fit in
    /// [`MAX_MATRIX_BYTES`], or a symbol is outside the alphabet, and
    /// [`FastOilError::Io`] when reading fails.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut header: Option<(usize, usize)> = None;
        let mut positives = vec![];
        let mut negatives = vec![];

        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((_, alphabet_size)) = header else {
                let fields: Vec<&str> = line.split_whitespace().collect();
                if fields.len() != 2 {
                    return Err(FastOilError::invalid_format(
                        line_no,
                        "header must be `<count> <alphabet size>`",
                    ));
                }
                let count: usize = parse_field(fields[0], line_no, "sample count")?;
                let alphabet_size: usize = parse_field(fields[1], line_no, "alphabet size")?;
                if !Nfa::matrix_bytes(alphabet_size, 0).is_some_and(|b| b <= MAX_MATRIX_BYTES) {
                    return Err(FastOilError::invalid_format(line_no, "alphabet size too large"));
                }
                header = Some((count, alphabet_size));
                continue;
            };

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(FastOilError::invalid_format(line_no, "incomplete sample line"));
            }
            let label: i64 = parse_field(fields[0], line_no, "label")?;
            let len: usize = parse_field(fields[1], line_no, "sample length")?;
            if fields.len() - 2 != len {
                return Err(FastOilError::invalid_format(
                    line_no,
                    format!(
                        "declared length {} but found {} symbols",
                        len,
                        fields.len() - 2
                    ),
                ));
            }
            let mut sample = Vec::with_capacity(len);
            for field in &fields[2..] {
                let sym: Symbol = parse_field(field, line_no, "symbol")?;
                if usize::from_u32(sym) >= alphabet_size {
                    return Err(FastOilError::invalid_format(
                        line_no,
                        format!("symbol {sym} outside alphabet of size {alphabet_size}"),
                    ));
                }
                sample.push(sym);
            }
            if label == 1 {
                positives.push(sample);
            } else {
                negatives.push(sample);
            }
        }

        let Some((declared, alphabet_size)) = header else {
            return Err(FastOilError::invalid_format(1, "missing header"));
        };
        let found = positives.len() + negatives.len();
        if declared != found {
            warn!(declared, found, "sample count in header does not match");
        }

        Ok(Self {
            alphabet_size,
            positives,
            negatives,
        })
    }
}

impl FromStr for SampleSet {
    type Err = FastOilError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

/// Parses one whitespace-separated field, reporting `what` on failure.
pub(crate) fn parse_field<T>(field: &str, line: usize, what: &str) -> Result<T>
where
    T: FromStr,
{
    field
        .parse()
        .map_err(|_| FastOilError::invalid_format(line, format!("invalid {what}: {field:?}")))
}
