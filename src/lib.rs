pub mod automaton;
pub mod definition;
pub mod dot;
pub mod error;
pub mod expression;
pub mod synthesis;
pub mod token;
pub mod validate;

pub use automaton::Automaton;
pub use definition::{Definition, Grammar};
pub use error::FsaError;

use wasm_bindgen::prelude::*;

/// Parses and validates a five-line definition and returns a regular
/// expression for its language.
pub fn convert(input: &str, grammar: Grammar) -> Result<String, FsaError> {
    let automaton = Automaton::parse(input, grammar)?;
    Ok(synthesis::to_regex(&automaton))
}

/// The text written to the result sink: the expression, or an `Error:` header
/// followed by the message.
pub fn render_outcome(outcome: &Result<String, FsaError>) -> String {
    match outcome {
        Ok(regex) => format!("{}\n", regex),
        Err(e) => format!("Error:\n{}\n", e),
    }
}

#[wasm_bindgen]
pub fn fsa_to_regex(input: &str) -> String {
    render_outcome(&convert(input, Grammar::Standard))
}

#[test]
fn test_end_to_end() {
    let out = fsa_to_regex(
        "states=[s0,s1]\nalpha=[a]\ninitial=[s0]\naccepting=[s1]\ntrans=[s0>a>s1]\n",
    );
    assert_eq!(
        out,
        "((eps)(eps)*(a)|(a))(({})(eps)*(a)|(eps))*(({})(eps)*(a)|(eps))|((eps)(eps)*(a)|(a))\n"
    );
}

#[test]
fn test_error_block() {
    let out = fsa_to_regex(
        "states=[s0,s1]\nalpha=[a]\ninitial=[s0]\naccepting=[s1]\ntrans=[s0>a>s1,s0>a>s0]\n",
    );
    assert_eq!(out, "Error:\nE5: FSA is nondeterministic\n");

    let out = fsa_to_regex("states=[s0]\nalpha=[a]\ninitial=[s0]\naccepting=[]\ntrans=[s0>b>s0]\n");
    assert_eq!(
        out,
        "Error:\nE3: A transition 'b' is not represented in the alphabet\n"
    );
}

#[test]
fn test_no_accepting_states_is_empty_language() {
    let regex = convert(
        "states=[s0,s1]\nalpha=[a]\ninitial=[s0]\naccepting=[]\ntrans=[s0>a>s1,s1>a>s0]\n",
        Grammar::Standard,
    )
    .unwrap();
    assert_eq!(regex, synthesis::EMPTY);
}

#[test]
fn test_first_failure_stops_the_pipeline() {
    // disjoint and nondeterministic, but the definition itself is malformed
    let err = convert(
        "states=[s0,s1,s2,s3]\nalpha=[a]\ninitial=[s0,s1]\naccepting=[]\ntrans=[s0>a>s1,s0>a>s2]\n",
        Grammar::Standard,
    )
    .unwrap_err();
    assert_eq!(err.code(), "E0");
}
