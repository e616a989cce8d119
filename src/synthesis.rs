//! Kleene's state elimination over the interned automaton.
//!
//! Cell `[i][j]` of the matrix holds an expression for the words leading from
//! state `i` to state `j`. Step `k` folds every path through state `k` into
//! every cell, `[k][k]` included, and the old cell strings are substituted
//! verbatim. Nothing is simplified afterwards, so the result grows quickly with
//! the number of states.

use itertools::Itertools;

use crate::automaton::{Automaton, StateId};

/// The expression matching no word at all.
pub const EMPTY: &str = "{}";
/// The expression matching only the empty word.
pub const EPSILON: &str = "eps";

pub type Matrix = Vec<Vec<String>>;

/// Direct transitions between every ordered pair of states. The diagonal also
/// gets `eps` for the zero-length path.
pub fn seed_matrix(automaton: &Automaton) -> Matrix {
    let n = automaton.num_states();
    (0..n)
        .map(|i| (0..n).map(|j| seed_cell(automaton, i, j)).collect())
        .collect()
}

fn seed_cell(automaton: &Automaton, from: StateId, to: StateId) -> String {
    let mut labels = automaton
        .transitions
        .iter()
        .filter(|t| t.from == from && t.to == to)
        .map(|t| automaton.symbol_name(t.label))
        .collect_vec();
    if from == to {
        labels.push(EPSILON);
    }
    if labels.is_empty() {
        EMPTY.to_string()
    } else {
        labels.join("|")
    }
}

/// One elimination step through state `k`. Every cell of the result is built
/// from the previous matrix only.
pub fn eliminate(matrix: &Matrix, k: StateId) -> Matrix {
    let n = matrix.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    format!(
                        "({})({})*({})|({})",
                        matrix[i][k], matrix[k][k], matrix[k][j], matrix[i][j]
                    )
                })
                .collect()
        })
        .collect()
}

/// The matrix after eliminating every state in declaration order.
pub fn closure_matrix(automaton: &Automaton) -> Matrix {
    let mut matrix = seed_matrix(automaton);
    for k in 0..automaton.num_states() {
        matrix = eliminate(&matrix, k);
        log::trace!(
            "eliminated {}: longest cell {} bytes",
            automaton.state_name(k),
            matrix.iter().flatten().map(|c| c.len()).max().unwrap_or(0)
        );
    }
    matrix
}

/// A regular expression for the language of a validated automaton: the union
/// of the start row over the accepting states, or `{}` when nothing is
/// accepted.
pub fn to_regex(automaton: &Automaton) -> String {
    let matrix = closure_matrix(automaton);
    let terms = automaton
        .accept
        .iter()
        .map(|&f| matrix[automaton.start][f].as_str())
        .filter(|cell| *cell != EMPTY)
        .collect_vec();
    let regex = if terms.is_empty() {
        EMPTY.to_string()
    } else {
        terms.join("|")
    };
    log::debug!(
        "synthesized {} bytes from {} states",
        regex.len(),
        automaton.num_states()
    );
    regex
}

#[cfg(test)]
use crate::automaton::build_unchecked;
#[cfg(test)]
use crate::expression::Expression;

#[test]
fn test_seed_matrix() {
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a,b,c]",
        "initial=[s0]",
        "accepting=[s2]",
        "trans=[s0>b>s1,s0>a>s1,s1>c>s1,s1>a>s2]",
    ]);
    let seed = seed_matrix(&aut);
    assert_eq!(
        seed,
        vec![
            vec!["eps", "b|a", "{}"],
            vec!["{}", "c|eps", "a"],
            vec!["{}", "{}", "eps"],
        ]
    );
    for i in 0..aut.num_states() {
        assert!(seed[i][i].split('|').any(|alt| alt == EPSILON));
    }
}

#[test]
fn test_self_loop() {
    let aut = build_unchecked([
        "states=[s0]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s0]",
        "trans=[s0>a>s0]",
    ]);
    let regex = to_regex(&aut);
    assert_eq!(regex, "(a|eps)(a|eps)*(a|eps)|(a|eps)");

    let matcher = Expression::parse(&regex).unwrap().matcher().unwrap();
    assert!(matcher.accepts::<&str>(&[]));
    assert!(matcher.accepts(&["a"]));
    assert!(matcher.accepts(&["a", "a", "a", "a"]));
}

#[test]
fn test_single_transition() {
    let aut = build_unchecked([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>a>s1]",
    ]);
    let regex = to_regex(&aut);
    assert_eq!(
        regex,
        "((eps)(eps)*(a)|(a))(({})(eps)*(a)|(eps))*(({})(eps)*(a)|(eps))|((eps)(eps)*(a)|(a))"
    );

    let matcher = Expression::parse(&regex).unwrap().matcher().unwrap();
    assert!(matcher.accepts(&["a"]));
    assert!(!matcher.accepts::<&str>(&[]));
    assert!(!matcher.accepts(&["a", "a"]));
}

#[test]
fn test_no_accepting_states() {
    let aut = build_unchecked([
        "states=[s0,s1]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>a>s1,s1>b>s0]",
    ]);
    assert_eq!(to_regex(&aut), EMPTY);
}

#[test]
fn test_union_follows_accepting_order() {
    let aut = build_unchecked([
        "states=[s0,s1,s2]",
        "alpha=[a,b]",
        "initial=[s0]",
        "accepting=[s2,s1]",
        "trans=[s0>a>s1,s0>b>s2]",
    ]);
    let matrix = closure_matrix(&aut);
    assert_eq!(
        to_regex(&aut),
        format!("{}|{}", matrix[0][2], matrix[0][1])
    );
}

#[test]
fn test_matches_automaton_on_random_dfas() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let alphabet = ["a", "b"];
    for _ in 0..40 {
        let n = rng.gen_range(1..=3);
        let states = (0..n).map(|i| format!("q{}", i)).collect_vec();
        let mut transitions = vec![];
        for from in &states {
            for symbol in alphabet {
                if rng.gen_bool(0.7) {
                    let to = &states[rng.gen_range(0..n)];
                    transitions.push(format!("{}>{}>{}", from, symbol, to));
                }
            }
        }
        let accepting = states.iter().filter(|_| rng.gen_bool(0.5)).join(",");
        let lines = [
            format!("states=[{}]", states.join(",")),
            format!("alpha=[{}]", alphabet.join(",")),
            format!("initial=[{}]", states[0]),
            format!("accepting=[{}]", accepting),
            format!("trans=[{}]", transitions.join(",")),
        ];
        let def = crate::definition::Definition::from_lines(
            &lines,
            crate::definition::Grammar::Standard,
        )
        .unwrap();
        let aut = Automaton::from_definition(&def).unwrap();
        assert_eq!(aut.check_deterministic(), Ok(()));

        let regex = to_regex(&aut);
        let matcher = Expression::parse(&regex).unwrap().matcher().unwrap();
        assert_eq!(matcher.accepts::<&str>(&[]), aut.accepts::<&str>(&[]));
        for len in 1..=5 {
            for word in itertools::repeat_n(alphabet, len).multi_cartesian_product() {
                assert_eq!(
                    matcher.accepts(&word),
                    aut.accepts(&word),
                    "{:?} on {:?} with {}",
                    lines,
                    word,
                    regex
                );
            }
        }
    }
}
