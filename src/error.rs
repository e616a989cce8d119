use thiserror::Error;

/// Everything that can go wrong while turning a definition into an automaton.
///
/// Processing stops at the first violation found, so exactly one of these is
/// ever reported for a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsaError {
    #[error("E0: Input file is malformed")]
    Malformed,
    #[error("E1: A state '{0}' is not in the set of states")]
    UnknownState(String),
    #[error("E2: Some states are disjoint")]
    Disjoint,
    #[error("E3: A transition '{0}' is not represented in the alphabet")]
    UnknownSymbol(String),
    #[error("E4: Initial state is not defined")]
    MissingInitial,
    #[error("E5: FSA is nondeterministic")]
    Nondeterministic,
}

impl FsaError {
    pub fn code(&self) -> &'static str {
        match self {
            FsaError::Malformed => "E0",
            FsaError::UnknownState(_) => "E1",
            FsaError::Disjoint => "E2",
            FsaError::UnknownSymbol(_) => "E3",
            FsaError::MissingInitial => "E4",
            FsaError::Nondeterministic => "E5",
        }
    }
}

#[test]
fn test_messages() {
    assert_eq!(
        FsaError::UnknownState("q9".to_string()).to_string(),
        "E1: A state 'q9' is not in the set of states"
    );
    assert_eq!(
        FsaError::UnknownSymbol("b".to_string()).to_string(),
        "E3: A transition 'b' is not represented in the alphabet"
    );
    assert_eq!(FsaError::Malformed.to_string(), "E0: Input file is malformed");
    assert_eq!(FsaError::Nondeterministic.code(), "E5");
}
