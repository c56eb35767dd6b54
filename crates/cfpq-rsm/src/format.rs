// Grammar text format: line-oriented RSM description and its validation.
//
// Layout:
//
//   line 1: terminal symbols, space-separated
//   line 2: nonterminal symbols, space-separated (box order)
//   line 3: N, the total number of states
//   then, per nonterminal in line-2 order, a box block:
//     states of the box
//     initial state
//     final states (the line may be empty)
//     K, the number of transitions
//     K lines of `<from> <to> <label>`
//
// Lines are significant, including empty ones: an empty final-states line is
// a box without final states, not a separator.

use std::iter::Enumerate;
use std::str::Lines;

use crate::boxes::RsmBox;
use crate::machine::RecursiveStateMachine;
use crate::symbols::{EPSILON_SYMBOL, Symbol, SymbolTable};
use crate::{FormatError, StateId};

/// Line cursor that remembers 1-based line numbers for error reporting.
struct LineReader<'a> {
    lines: Enumerate<Lines<'a>>,
    last_line: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_line(&mut self, expected: &'static str) -> Result<(usize, &'a str), FormatError> {
        match self.lines.next() {
            Some((idx, line)) => {
                self.last_line = idx + 1;
                Ok((idx + 1, line))
            }
            None => Err(FormatError::UnexpectedEof {
                line: self.last_line + 1,
                expected,
            }),
        }
    }

    /// Fail on the first non-blank line left in the input.
    fn expect_end(&mut self) -> Result<(), FormatError> {
        for (idx, line) in self.lines.by_ref() {
            if !line.trim().is_empty() {
                return Err(FormatError::TrailingContent { line: idx + 1 });
            }
        }
        Ok(())
    }
}

/// Parse and validate a grammar.
///
/// Validation rules, each a fatal [`FormatError`]:
/// - every state must lie in `[0, N)`;
/// - every state must belong to exactly one box;
/// - a box's initial state, final states and transition endpoints must be
///   among the box's own states;
/// - every transition label must be a declared terminal, nonterminal or `eps`;
/// - an `eps` transition must go from the box's initial state to one of its
///   final states;
/// - symbol names must be unique and must not be `eps`.
pub fn parse_grammar(text: &str) -> Result<RecursiveStateMachine, FormatError> {
    let mut reader = LineReader::new(text);
    let mut symbols = SymbolTable::new();

    let (line, terminals) = reader.next_line("terminal symbols")?;
    for name in terminals.split_whitespace() {
        symbols
            .add_terminal(name)
            .ok_or_else(|| duplicate(line, name))?;
    }

    let (line, nonterminals) = reader.next_line("nonterminal symbols")?;
    let mut box_symbols = Vec::new();
    for name in nonterminals.split_whitespace() {
        let symbol = symbols
            .add_nonterminal(name)
            .ok_or_else(|| duplicate(line, name))?;
        box_symbols.push(symbol);
    }

    let (line, count) = reader.next_line("number of states")?;
    let states_number = parse_single(count, line)?;

    let mut owners: Vec<Option<Symbol>> = vec![None; states_number];
    let mut boxes = Vec::with_capacity(box_symbols.len());
    for nonterminal in box_symbols {
        let b = parse_box(&mut reader, &symbols, nonterminal, &mut owners)?;
        boxes.push(b);
    }
    reader.expect_end()?;

    let mut state_to_box = Vec::with_capacity(states_number);
    for (state, owner) in owners.into_iter().enumerate() {
        state_to_box.push(owner.ok_or(FormatError::UnownedState { state })?);
    }

    tracing::debug!(
        states = states_number,
        boxes = boxes.len(),
        symbols = symbols.len(),
        "parsed grammar"
    );

    Ok(RecursiveStateMachine::new(
        symbols,
        states_number,
        boxes,
        state_to_box,
    ))
}

fn parse_box(
    reader: &mut LineReader<'_>,
    symbols: &SymbolTable,
    nonterminal: Symbol,
    owners: &mut [Option<Symbol>],
) -> Result<RsmBox, FormatError> {
    let states_number = owners.len();

    let (line, text) = reader.next_line("box states")?;
    let states = parse_states(text, line, states_number)?;
    for &state in &states {
        if owners[state].replace(nonterminal).is_some() {
            return Err(FormatError::StateClaimedTwice { line, state });
        }
    }

    let (line, text) = reader.next_line("initial state")?;
    let initial_state = parse_single(text, line)?;
    check_state(initial_state, line, states_number)?;
    check_owner(owners, nonterminal, initial_state, line)?;

    let (line, text) = reader.next_line("final states")?;
    let final_states = parse_states(text, line, states_number)?;
    for &state in &final_states {
        check_owner(owners, nonterminal, state, line)?;
    }

    let (line, text) = reader.next_line("number of transitions")?;
    let transition_count = parse_single(text, line)?;

    let mut b = RsmBox::new(nonterminal, states, initial_state, final_states);
    for _ in 0..transition_count {
        let (line, text) = reader.next_line("transition")?;
        let (from, to, label) = parse_transition(text, line, symbols, states_number)?;
        check_owner(owners, nonterminal, from, line)?;
        check_owner(owners, nonterminal, to, line)?;
        if label == EPSILON_SYMBOL && (from != b.initial_state() || !b.is_final(to)) {
            return Err(FormatError::MisplacedEpsilon { line, from, to });
        }
        b.add_edge(label, from, to);
    }
    Ok(b)
}

fn parse_transition(
    text: &str,
    line: usize,
    symbols: &SymbolTable,
    states_number: usize,
) -> Result<(StateId, StateId, Symbol), FormatError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [from, to, label] = tokens[..] else {
        return Err(FormatError::MalformedTransition {
            line,
            content: text.trim().to_string(),
        });
    };
    let from = parse_int(from, line)?;
    check_state(from, line, states_number)?;
    let to = parse_int(to, line)?;
    check_state(to, line, states_number)?;
    let label = symbols
        .lookup(label)
        .ok_or_else(|| FormatError::UnknownLabel {
            line,
            label: label.to_string(),
        })?;
    Ok((from, to, label))
}

fn parse_states(text: &str, line: usize, states_number: usize) -> Result<Vec<StateId>, FormatError> {
    text.split_whitespace()
        .map(|token| {
            let state = parse_int(token, line)?;
            check_state(state, line, states_number)?;
            Ok(state)
        })
        .collect()
}

/// A line holding exactly one integer.
fn parse_single(text: &str, line: usize) -> Result<usize, FormatError> {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => parse_int(token, line),
        _ => Err(FormatError::InvalidInteger {
            line,
            token: text.trim().to_string(),
        }),
    }
}

fn parse_int(token: &str, line: usize) -> Result<usize, FormatError> {
    token.parse().map_err(|_| FormatError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

fn check_state(state: StateId, line: usize, states_number: usize) -> Result<(), FormatError> {
    if state < states_number {
        Ok(())
    } else {
        Err(FormatError::StateOutOfRange {
            line,
            state,
            states_number,
        })
    }
}

/// `state` must be one of the states claimed by the box being parsed.
fn check_owner(
    owners: &[Option<Symbol>],
    nonterminal: Symbol,
    state: StateId,
    line: usize,
) -> Result<(), FormatError> {
    if owners[state] == Some(nonterminal) {
        Ok(())
    } else {
        Err(FormatError::StateOutsideBox { line, state })
    }
}

fn duplicate(line: usize, name: &str) -> FormatError {
    FormatError::DuplicateSymbol {
        line,
        symbol: name.to_string(),
    }
}
