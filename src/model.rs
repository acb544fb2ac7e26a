//! Plain-text model format and graph export.
//!
//! A model file lists, one item per line, the alphabet size, the number of states, the initial
//! states, the final states, the number of transitions and then one `<src> <dst> <symbol>` line
//! per transition. Lines starting with `#` are comments.
//!
//! ```text
//! # Alphabet
//! 2
//! # States
//! 2
//! # Initial states
//! 0
//! # Final states
//! 1
//! # Transitions
//! 2
//! 0 1 0
//! 1 1 1
//! ```
//!
//! States are renumbered densely on export, so slot numbers are not preserved by a round trip.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use crate::errors::{FastOilError, Result};
use crate::nfa::{Nfa, MAX_MATRIX_BYTES, MAX_STATES};
use crate::samples::parse_field;
use crate::state_set::Iter;
use crate::utils::FromU32;
use crate::{StateId, Symbol};

const INITIAL_STYLE: &str = "filled";
const FINAL_STYLE: &str = "bold,dashed";
const INITIAL_FINAL_STYLE: &str = "filled,bold,dashed";

impl Nfa {
    /// Maps every active slot to its dense index, in ascending slot order.
    fn dense_ids(&self) -> BTreeMap<StateId, usize> {
        self.states().enumerate().map(|(i, st)| (st, i)).collect()
    }

    /// Transitions grouped by `(src, dst)`, with the symbols of each pair in ascending order.
    fn edges(&self) -> BTreeMap<(StateId, StateId), Vec<Symbol>> {
        let mut edges: BTreeMap<_, Vec<Symbol>> = BTreeMap::new();
        for (src, dst, sym) in self.transitions() {
            edges.entry((src, dst)).or_default().push(sym);
        }
        edges
    }

    /// Writes the automaton in the plain-text model format.
    ///
    /// # Errors
    ///
    /// Errors from `wtr` are propagated.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastoil::Nfa;
    ///
    /// let mut nfa = Nfa::new(2);
    /// nfa.set_transition(5, 9, 1);
    /// nfa.set_initial(5);
    /// nfa.set_final(9);
    ///
    /// let mut bytes = vec![];
    /// nfa.serialize(&mut bytes).unwrap();
    ///
    /// let other = Nfa::deserialize(bytes.as_slice()).unwrap();
    /// assert_eq!(2, other.num_states());
    /// assert!(other.has_transition(0, 1, 1));
    /// assert!(other.is_match([1]));
    /// ```
    pub fn serialize<W>(&self, mut wtr: W) -> io::Result<()>
    where
        W: Write,
    {
        let ids = self.dense_ids();
        let join = |states: Iter<'_>| {
            states
                .map(|st| ids[&st].to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        writeln!(wtr, "# Alphabet")?;
        writeln!(wtr, "{}", self.alphabet_size())?;
        writeln!(wtr, "# States")?;
        writeln!(wtr, "{}", ids.len())?;
        writeln!(wtr, "# Initial states")?;
        writeln!(wtr, "{}", join(self.initial_states()))?;
        writeln!(wtr, "# Final states")?;
        writeln!(wtr, "{}", join(self.final_states()))?;

        let edges = self.edges();
        writeln!(wtr, "# Transitions")?;
        writeln!(wtr, "{}", edges.values().map(Vec::len).sum::<usize>())?;
        for ((src, dst), syms) in &edges {
            for sym in syms {
                writeln!(wtr, "{} {} {}", ids[src], ids[dst], sym)?;
            }
        }
        Ok(())
    }

    /// Reads an automaton in the plain-text model format.
    ///
    /// Every state in `0..<number of states>` is activated, even if no transition or flag
    /// references it.
    ///
    /// # Errors
    ///
    /// [`FastOilError::InvalidFormat`] is returned with the offending line number when a section
    /// is missing or malformed, a state or symbol is out of range, or the number of transition
    /// lines differs from the declared count. Automata whose transition relation would take more
    /// than [`MAX_MATRIX_BYTES`] per direction are rejected at the alphabet or state count line. [`FastOilError::Io`] is returned when reading
    /// fails.
    pub fn deserialize<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut reader = ModelReader {
            lines: rdr.lines(),
            line_no: 0,
        };

        let (line_no, line) = reader.section("alphabet size")?;
        let alphabet_size: usize =
            parse_field(single_field(&line, line_no)?, line_no, "alphabet size")?;
        if !fits(alphabet_size, 0) {
            return Err(FastOilError::invalid_format(line_no, "alphabet size too large"));
        }

        let (line_no, line) = reader.section("number of states")?;
        let num_states: usize =
            parse_field(single_field(&line, line_no)?, line_no, "number of states")?;
        if num_states > MAX_STATES {
            return Err(FastOilError::invalid_format(
                line_no,
                format!("number of states must be <= {MAX_STATES}"),
            ));
        }
        if !fits(alphabet_size, num_states) {
            return Err(FastOilError::invalid_format(
                line_no,
                format!("transition relation would exceed {MAX_MATRIX_BYTES} bytes"),
            ));
        }

        let mut nfa = Self::new(alphabet_size);
        for st in 0..num_states {
            nfa.add_state(st);
        }

        // Flag lines are positional and may be empty.
        let (line_no, line) = reader.flag_line("initial states")?;
        for field in line.split_whitespace() {
            nfa.set_initial(parse_state(field, line_no, num_states)?);
        }
        let (line_no, line) = reader.flag_line("final states")?;
        for field in line.split_whitespace() {
            nfa.set_final(parse_state(field, line_no, num_states)?);
        }

        let (line_no, line) = reader.section("number of transitions")?;
        let declared: usize =
            parse_field(single_field(&line, line_no)?, line_no, "number of transitions")?;

        let mut found = 0;
        while let Some((line_no, line)) = reader.next_content()? {
            found += 1;
            if found > declared {
                return Err(FastOilError::invalid_format(
                    line_no,
                    format!("more than {declared} transitions"),
                ));
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(FastOilError::invalid_format(
                    line_no,
                    "transition must be `<src> <dst> <symbol>`",
                ));
            }
            let src = parse_state(fields[0], line_no, num_states)?;
            let dst = parse_state(fields[1], line_no, num_states)?;
            let sym: Symbol = parse_field(fields[2], line_no, "symbol")?;
            if usize::from_u32(sym) >= alphabet_size {
                return Err(FastOilError::invalid_format(
                    line_no,
                    format!("symbol {sym} outside alphabet of size {alphabet_size}"),
                ));
            }
            nfa.set_transition(src, dst, sym);
        }
        if found < declared {
            return Err(FastOilError::invalid_format(
                reader.line_no,
                format!("expected {declared} transitions but found {found}"),
            ));
        }

        Ok(nfa)
    }

    /// Writes the automaton as a Graphviz digraph.
    ///
    /// Initial states are filled, final states are drawn bold and dashed, and each pair of
    /// connected states gets a single edge labeled with its symbols. States are numbered densely
    /// as in [`Nfa::serialize`].
    ///
    /// # Errors
    ///
    /// Errors from `wtr` are propagated.
    pub fn write_dot<W>(&self, mut wtr: W) -> io::Result<()>
    where
        W: Write,
    {
        writeln!(wtr, "digraph \"NFA\" {{")?;
        writeln!(wtr, "  rankdir=LR")?;
        writeln!(wtr, "  node [shape=box width=0.1 height=0.1 fontname=Arial]")?;
        writeln!(wtr, "  edge [fontname=Arial]")?;
        let ids = self.dense_ids();
        for (&st, id) in &ids {
            let style = match (self.is_initial(st), self.is_final(st)) {
                (true, true) => Some(INITIAL_FINAL_STYLE),
                (true, false) => Some(INITIAL_STYLE),
                (false, true) => Some(FINAL_STYLE),
                (false, false) => None,
            };
            match style {
                Some(style) => writeln!(wtr, "  s{id} [label=\"{id}\" style=\"{style}\"]")?,
                None => writeln!(wtr, "  s{id} [label=\"{id}\"]")?,
            }
        }
        for ((src, dst), syms) in self.edges() {
            let label = syms
                .iter()
                .map(Symbol::to_string)
                .collect::<Vec<_>>()
                .join(",");
            writeln!(wtr, "  s{} -> s{} [label=\"{label}\"]", ids[&src], ids[&dst])?;
        }
        writeln!(wtr, "}}")
    }
}

struct ModelReader<L> {
    lines: L,
    line_no: usize,
}

impl<L> ModelReader<L>
where
    L: Iterator<Item = io::Result<String>>,
{
    /// Next non-comment line, trimmed, with its 1-based number.
    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            let line = line.trim();
            if !line.starts_with('#') {
                return Ok(Some((self.line_no, line.to_string())));
            }
        }
        Ok(None)
    }

    /// Next non-comment, non-blank line.
    fn next_content(&mut self) -> Result<Option<(usize, String)>> {
        while let Some((line_no, line)) = self.next_line()? {
            if !line.is_empty() {
                return Ok(Some((line_no, line)));
            }
        }
        Ok(None)
    }

    fn section(&mut self, what: &str) -> Result<(usize, String)> {
        self.next_content()?.ok_or_else(|| {
            FastOilError::invalid_format(self.line_no + 1, format!("missing {what}"))
        })
    }

    fn flag_line(&mut self, what: &str) -> Result<(usize, String)> {
        self.next_line()?.ok_or_else(|| {
            FastOilError::invalid_format(self.line_no + 1, format!("missing {what}"))
        })
    }
}

fn fits(alphabet_size: usize, num_states: usize) -> bool {
    Nfa::matrix_bytes(alphabet_size, num_states).is_some_and(|b| b <= MAX_MATRIX_BYTES)
}

fn single_field(line: &str, line_no: usize) -> Result<&str> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(field), None) => Ok(field),
        _ => Err(FastOilError::invalid_format(line_no, "expected a single value")),
    }
}

fn parse_state(field: &str, line_no: usize, num_states: usize) -> Result<StateId> {
    let st: StateId = parse_field(field, line_no, "state")?;
    if st >= num_states {
        return Err(FastOilError::invalid_format(
            line_no,
            format!("state {st} must be < {num_states}"),
        ));
    }
    Ok(st)
}
