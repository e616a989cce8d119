use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use crate::definition::{Definition, Grammar};
use crate::error::FsaError;

/// Position of a state in declaration order.
pub type StateId = usize;
/// Position of a symbol in the declared alphabet.
pub type SymbolId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub label: SymbolId,
}

/// A finite automaton built from one definition.
///
/// States and symbols are interned as indices in declaration order, so the
/// adjacency tables below are plain vectors indexed by `StateId`.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub start: StateId,
    pub accept: Vec<StateId>,
    pub transitions: Vec<Transition>,
    // neighbours in either direction, ignoring labels
    undirected: Vec<BTreeSet<StateId>>,
    // state -> symbol -> destinations
    directed: Vec<Vec<BTreeSet<StateId>>>,
}

fn index_of(names: &HashMap<&str, usize>, name: &str) -> Option<usize> {
    names.get(name).copied()
}

impl Automaton {
    /// Interns a parsed definition. `Definition::from_lines` already rejects
    /// undeclared names; the fields are public, so a hand-built definition is
    /// checked again here and reported the same way.
    pub fn from_definition(def: &Definition) -> Result<Automaton, FsaError> {
        let state_ids: HashMap<&str, StateId> = def
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let symbol_ids: HashMap<&str, SymbolId> = def
            .alphabet
            .iter()
            .enumerate()
            .map(|(i, a)| (a.as_str(), i))
            .collect();
        let state = |name: &str| {
            index_of(&state_ids, name).ok_or_else(|| FsaError::UnknownState(name.to_string()))
        };

        let start = state(def.initial.as_str())?;
        let accept = def
            .accepting
            .iter()
            .map(|s| state(s.as_str()))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unique()
            .collect_vec();

        let mut transitions = vec![];
        for t in &def.transitions {
            let from = state(t.from.as_str())?;
            let label = index_of(&symbol_ids, &t.label)
                .ok_or_else(|| FsaError::UnknownSymbol(t.label.clone()))?;
            let to = state(t.to.as_str())?;
            transitions.push(Transition { from, to, label });
        }

        let mut automaton = Automaton {
            states: def.states.clone(),
            alphabet: def.alphabet.clone(),
            start,
            accept,
            transitions: vec![],
            undirected: vec![BTreeSet::new(); def.states.len()],
            directed: vec![vec![BTreeSet::new(); def.alphabet.len()]; def.states.len()],
        };
        for transition in transitions.into_iter().unique() {
            automaton.add_transition(transition);
        }
        Ok(automaton)
    }

    /// Parses, builds and validates an automaton in one go.
    pub fn parse(input: &str, grammar: Grammar) -> Result<Automaton, FsaError> {
        let automaton = Automaton::from_definition(&Definition::parse(input, grammar)?)?;
        automaton.validate()?;
        Ok(automaton)
    }

    fn add_transition(&mut self, transition: Transition) {
        self.undirected[transition.from].insert(transition.to);
        self.undirected[transition.to].insert(transition.from);
        self.directed[transition.from][transition.label].insert(transition.to);
        self.transitions.push(transition);
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn state_name(&self, id: StateId) -> &str {
        &self.states[id]
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.alphabet[id]
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.alphabet.iter().position(|a| a == name)
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accept.contains(&state)
    }

    pub fn neighbours(&self, state: StateId) -> &BTreeSet<StateId> {
        &self.undirected[state]
    }

    pub fn destinations(&self, state: StateId, label: SymbolId) -> &BTreeSet<StateId> {
        &self.directed[state][label]
    }

    /// The state reached from `state` on `label`, if any. On a
    /// nondeterministic pair this is the lowest-numbered destination.
    pub fn successor(&self, state: StateId, label: SymbolId) -> Option<StateId> {
        self.directed[state][label].iter().next().copied()
    }

    /// Runs the automaton over a word given as symbol names. Unknown symbols
    /// and missing transitions reject.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut cur = self.start;
        for symbol in word {
            let next = self
                .symbol_id(symbol.as_ref())
                .and_then(|label| self.successor(cur, label));
            match next {
                Some(next) => cur = next,
                None => return false,
            }
        }
        self.is_accepting(cur)
    }
}

#[cfg(test)]
pub(crate) fn build_unchecked(lines: [&str; 5]) -> Automaton {
    Automaton::from_definition(&Definition::from_lines(&lines, Grammar::Standard).unwrap()).unwrap()
}

#[test]
fn test_adjacency() {
    let aut = build_unchecked([
        "states=[s0,s1,s2,s3]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[s2]",
        "trans=[s0>a>s1,s1>b>s2,s2>a>s2,s0>a>s2]",
    ]);
    assert_eq!(aut.num_states(), 4);
    assert_eq!(aut.neighbours(0), &BTreeSet::from([1, 2]));
    assert_eq!(aut.neighbours(1), &BTreeSet::from([0, 2]));
    assert_eq!(aut.neighbours(2), &BTreeSet::from([0, 1, 2]));
    // declared but untouched states still get an entry
    assert!(aut.neighbours(3).is_empty());
    assert_eq!(aut.destinations(0, 0), &BTreeSet::from([1, 2]));
    assert!(aut.destinations(0, 1).is_empty());
    assert_eq!(aut.destinations(2, 0), &BTreeSet::from([2]));
}

#[test]
fn test_accepts() {
    let aut = build_unchecked([
        "states=[even,odd]",
        "alpha=[one,zero]",
        "initial=[even]",
        "accepting=[odd]",
        "trans=[even>one>odd,odd>one>even,even>zero>even,odd>zero>odd]",
    ]);
    assert!(aut.accepts(&["one"]));
    assert!(aut.accepts(&["zero", "one", "zero"]));
    assert!(!aut.accepts(&["one", "one"]));
    assert!(!aut.accepts::<&str>(&[]));
    assert!(!aut.accepts(&["two"]));
}

#[test]
fn test_partial_automaton_rejects_missing_transition() {
    let aut = build_unchecked([
        "states=[s0,s1]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>a>s1]",
    ]);
    assert!(aut.accepts(&["a"]));
    assert!(!aut.accepts(&["b"]));
    assert!(!aut.accepts(&["a", "a"]));
}

#[test]
fn test_undeclared_names_in_handmade_definition() {
    let mut def = Definition::from_lines(
        &["states=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        Grammar::Standard,
    )
    .unwrap();
    def.accepting.push("s9".to_string());
    assert_eq!(
        Automaton::from_definition(&def).unwrap_err(),
        FsaError::UnknownState("s9".to_string())
    );
}
