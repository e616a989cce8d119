use std::collections::{HashSet, VecDeque};

use crate::automaton::{Automaton, StateId};
use crate::error::FsaError;

impl Automaton {
    /// States reachable from the start state when every transition is read as
    /// an undirected edge. The start state is always included.
    pub fn connected_states(&self) -> HashSet<StateId> {
        let mut reachable: HashSet<StateId> = HashSet::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(self.start);
        reachable.insert(self.start);
        while let Some(cur) = queue.pop_front() {
            for &next in self.neighbours(cur) {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        reachable
    }

    pub fn check_connected(&self) -> Result<(), FsaError> {
        let reachable = self.connected_states();
        log::debug!(
            "{} of {} states connected to {}",
            reachable.len(),
            self.num_states(),
            self.state_name(self.start)
        );
        if reachable.len() < self.num_states() {
            return Err(FsaError::Disjoint);
        }
        Ok(())
    }

    /// Every (state, symbol) pair may lead to at most one state. Pairs with no
    /// transition at all are fine.
    pub fn check_deterministic(&self) -> Result<(), FsaError> {
        for state in 0..self.num_states() {
            for label in 0..self.alphabet.len() {
                if self.destinations(state, label).len() > 1 {
                    log::debug!(
                        "{} branches on {}",
                        self.state_name(state),
                        self.symbol_name(label)
                    );
                    return Err(FsaError::Nondeterministic);
                }
            }
        }
        Ok(())
    }

    /// Connectivity first, then determinism.
    pub fn validate(&self) -> Result<(), FsaError> {
        self.check_connected()?;
        self.check_deterministic()
    }
}

#[cfg(test)]
use crate::automaton::build_unchecked;

#[test]
fn test_nondeterministic() {
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s2]",
        "trans=[s0>a>s1,s0>a>s2]",
    ]);
    assert_eq!(aut.check_deterministic(), Err(FsaError::Nondeterministic));
    assert_eq!(aut.validate(), Err(FsaError::Nondeterministic));
}

#[test]
fn test_deterministic() {
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[s2]",
        "trans=[s0>a>s1,s0>b>s2,s1>a>s1,s0>a>s1]",
    ]);
    assert_eq!(aut.validate(), Ok(()));
}

#[test]
fn test_isolated_state() {
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>a>s1]",
    ]);
    assert_eq!(aut.connected_states(), [0, 1].into_iter().collect::<HashSet<_>>());
    assert_eq!(aut.validate(), Err(FsaError::Disjoint));
}

#[test]
fn test_connectivity_ignores_direction() {
    // s0 cannot reach s2 by following transitions, but they are joined through s1
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>a>s1,s2>a>s1]",
    ]);
    assert_eq!(aut.validate(), Ok(()));
}

#[test]
fn test_single_state_without_transitions() {
    let aut = build_unchecked(["states=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"]);
    assert_eq!(aut.validate(), Ok(()));
}

#[test]
fn test_disjoint_reported_before_nondeterminism() {
    let aut = build_unchecked([
        "states=[s0,s1,s2,s3]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>a>s1,s0>a>s2]",
    ]);
    assert_eq!(aut.validate(), Err(FsaError::Disjoint));
}

#[test]
fn test_parse_validates() {
    let err = Automaton::parse(
        "states=[s0,s1]\nalpha=[a]\ninitial=[s0]\naccepting=[]\ntrans=[]\n",
        crate::definition::Grammar::Standard,
    )
    .unwrap_err();
    assert_eq!(err, FsaError::Disjoint);
}
