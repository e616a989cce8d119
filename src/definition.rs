use itertools::Itertools;
use nom::{
    bytes::complete::{tag, take_while},
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::FsaError;
use crate::token::{is_valid_state_token, is_valid_symbol_token};

/// Which keyword literals the five definition lines start with.
///
/// Only one grammar is active for a given parse; a line written for the other
/// grammar is malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grammar {
    /// `states= alpha= initial= accepting= trans=`
    #[default]
    Standard,
    /// `states= alpha= init.st= fin.st= trans=`
    Legacy,
}

struct Keywords {
    states: &'static str,
    alpha: &'static str,
    initial: &'static str,
    accepting: &'static str,
    trans: &'static str,
}

impl Grammar {
    fn keywords(&self) -> Keywords {
        match self {
            Grammar::Standard => Keywords {
                states: "states=",
                alpha: "alpha=",
                initial: "initial=",
                accepting: "accepting=",
                trans: "trans=",
            },
            Grammar::Legacy => Keywords {
                states: "states=",
                alpha: "alpha=",
                initial: "init.st=",
                accepting: "fin.st=",
                trans: "trans=",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionDef {
    pub from: String,
    pub label: String,
    pub to: String,
}

/// The five definition lines after parsing and referential checks.
///
/// States, alphabet and accepting states are deduplicated and keep the order of
/// their first declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub initial: String,
    pub accepting: Vec<String>,
    pub transitions: Vec<TransitionDef>,
}

fn bracketed_list<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(
        tag(keyword),
        delimited(char('['), take_while(|c: char| c != ']'), char(']')),
    )
}

fn list_body<'a>(line: &'a str, keyword: &'static str) -> Result<&'a str, FsaError> {
    all_consuming(bracketed_list(keyword))(line)
        .map(|(_, body)| body)
        .map_err(|_| FsaError::Malformed)
}

fn list_items(body: &str) -> impl Iterator<Item = &str> {
    body.split(',').filter(|item| !item.is_empty())
}

fn triple_fields(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(char('>'), take_while(|c: char| c != '>'))(input)
}

fn parse_states(line: &str, keyword: &'static str) -> Result<Vec<String>, FsaError> {
    let mut states = vec![];
    for item in list_items(list_body(line, keyword)?) {
        if !is_valid_state_token(item) {
            return Err(FsaError::Malformed);
        }
        states.push(item.to_string());
    }
    Ok(states.into_iter().unique().collect())
}

fn parse_alphabet(line: &str, keyword: &'static str) -> Result<Vec<String>, FsaError> {
    let mut alphabet = vec![];
    for item in list_items(list_body(line, keyword)?) {
        if !is_valid_symbol_token(item) {
            return Err(FsaError::Malformed);
        }
        alphabet.push(item.to_string());
    }
    Ok(alphabet.into_iter().unique().collect())
}

fn declared_state(states: &[String], name: &str) -> Result<String, FsaError> {
    if states.iter().any(|s| s == name) {
        Ok(name.to_string())
    } else {
        Err(FsaError::UnknownState(name.to_string()))
    }
}

fn declared_symbol(alphabet: &[String], name: &str) -> Result<String, FsaError> {
    if alphabet.iter().any(|a| a == name) {
        Ok(name.to_string())
    } else {
        Err(FsaError::UnknownSymbol(name.to_string()))
    }
}

fn parse_initial(
    line: &str,
    keyword: &'static str,
    states: &[String],
) -> Result<String, FsaError> {
    let mut initial = list_items(list_body(line, keyword)?)
        .map(|item| declared_state(states, item))
        .collect::<Result<Vec<_>, _>>()?;
    match initial.len() {
        0 => Err(FsaError::MissingInitial),
        1 => Ok(initial.remove(0)),
        _ => Err(FsaError::Malformed),
    }
}

fn parse_accepting(
    line: &str,
    keyword: &'static str,
    states: &[String],
) -> Result<Vec<String>, FsaError> {
    let accepting = list_items(list_body(line, keyword)?)
        .map(|item| declared_state(states, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(accepting.into_iter().unique().collect())
}

fn parse_transitions(
    line: &str,
    keyword: &'static str,
    states: &[String],
    alphabet: &[String],
) -> Result<Vec<TransitionDef>, FsaError> {
    let mut transitions = vec![];
    for item in list_items(list_body(line, keyword)?) {
        let (_, fields) = all_consuming(triple_fields)(item).map_err(|_| FsaError::Malformed)?;
        // names are checked before the field count, so `x>a` reports `x`
        let from = fields.first().map(|f| declared_state(states, f)).transpose()?;
        let label = fields.get(1).map(|f| declared_symbol(alphabet, f)).transpose()?;
        let to = fields.get(2).map(|f| declared_state(states, f)).transpose()?;
        match (from, label, to) {
            (Some(from), Some(label), Some(to)) if fields.len() == 3 => {
                transitions.push(TransitionDef { from, label, to });
            }
            _ => return Err(FsaError::Malformed),
        }
    }
    Ok(transitions.into_iter().unique().collect())
}

fn line_at<S: AsRef<str>>(lines: &[S], i: usize) -> &str {
    lines[i].as_ref().trim_end_matches('\r')
}

impl Definition {
    /// Parses the five definition lines in their fixed order.
    ///
    /// States and alphabet are read first because every other line is checked
    /// against them. Lines past the fifth are ignored.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], grammar: Grammar) -> Result<Self, FsaError> {
        if lines.len() < 5 {
            return Err(FsaError::Malformed);
        }
        let keywords = grammar.keywords();

        let states = parse_states(line_at(lines, 0), keywords.states)?;
        let alphabet = parse_alphabet(line_at(lines, 1), keywords.alpha)?;
        let initial = parse_initial(line_at(lines, 2), keywords.initial, &states)?;
        let accepting = parse_accepting(line_at(lines, 3), keywords.accepting, &states)?;
        let transitions = parse_transitions(line_at(lines, 4), keywords.trans, &states, &alphabet)?;

        log::debug!(
            "parsed definition: {} states, {} symbols, {} accepting, {} transitions",
            states.len(),
            alphabet.len(),
            accepting.len(),
            transitions.len()
        );

        Ok(Definition {
            states,
            alphabet,
            initial,
            accepting,
            transitions,
        })
    }

    pub fn parse(input: &str, grammar: Grammar) -> Result<Self, FsaError> {
        Definition::from_lines(&input.lines().collect_vec(), grammar)
    }
}

#[cfg(test)]
fn parse_standard(lines: [&str; 5]) -> Result<Definition, FsaError> {
    Definition::from_lines(&lines, Grammar::Standard)
}

#[test]
fn test_parse_definition() {
    let def = parse_standard([
        "states=[s0,s1,,s2,s1]",
        "alpha=[a,b_c]",
        "initial=[s0]",
        "accepting=[s2,s1,s2]",
        "trans=[s0>a>s1,s1>b_c>s2,,s0>a>s1]",
    ])
    .unwrap();
    assert_eq!(def.states, vec!["s0", "s1", "s2"]);
    assert_eq!(def.alphabet, vec!["a", "b_c"]);
    assert_eq!(def.initial, "s0");
    assert_eq!(def.accepting, vec!["s2", "s1"]);
    assert_eq!(
        def.transitions,
        vec![
            TransitionDef {
                from: "s0".to_string(),
                label: "a".to_string(),
                to: "s1".to_string()
            },
            TransitionDef {
                from: "s1".to_string(),
                label: "b_c".to_string(),
                to: "s2".to_string()
            },
        ]
    );
}

#[test]
fn test_line_shape() {
    let bad_lines = [
        ["state=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=s0", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=[s0", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=[s0]]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=[s0]", "alpha=[a]", "init.st=[s0]", "accepting=[]", "trans=[]"],
        ["states=[S0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=[s0]", "alpha=[a-b]", "initial=[s0]", "accepting=[]", "trans=[]"],
        ["states=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[s0>a]"],
        ["states=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[s0>a>s0>a]"],
        [" states=[s0]", "alpha=[a]", "initial=[s0]", "accepting=[]", "trans=[]"],
    ];
    for lines in bad_lines {
        assert_eq!(parse_standard(lines), Err(FsaError::Malformed), "{:?}", lines);
    }
}

#[test]
fn test_initial_state_count() {
    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0,s1]",
        "accepting=[]",
        "trans=[]",
    ]);
    assert_eq!(err, Err(FsaError::Malformed));

    let err = parse_standard(["states=[s0,s1]", "alpha=[a]", "initial=[]", "accepting=[]", "trans=[]"]);
    assert_eq!(err, Err(FsaError::MissingInitial));

    let err = parse_standard(["states=[s0,s1]", "alpha=[a]", "initial=[,]", "accepting=[]", "trans=[]"]);
    assert_eq!(err, Err(FsaError::MissingInitial));

    let err = parse_standard(["states=[s0,s1]", "alpha=[a]", "initial=[s7,s0]", "accepting=[]", "trans=[]"]);
    assert_eq!(err, Err(FsaError::UnknownState("s7".to_string())));
}

#[test]
fn test_referential_integrity() {
    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>a>s1,s1>a>s5]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownState("s5".to_string())));

    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s1]",
        "trans=[s0>b>s1]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownSymbol("b".to_string())));

    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[s2]",
        "trans=[]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownState("s2".to_string())));

    // names come before the field count
    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>b>s1>x]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownSymbol("b".to_string())));
    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[x>a]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownState("x".to_string())));
    let err = parse_standard([
        "states=[s0,s1]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>>s1]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownSymbol("".to_string())));

    // from is checked before the symbol, the symbol before to
    let err = parse_standard([
        "states=[s0]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[x>b>y]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownState("x".to_string())));
    let err = parse_standard([
        "states=[s0]",
        "alpha=[a]",
        "initial=[s0]",
        "accepting=[]",
        "trans=[s0>b>y]",
    ]);
    assert_eq!(err, Err(FsaError::UnknownSymbol("b".to_string())));
}

#[test]
fn test_first_error_wins() {
    // the initial line fails before the malformed transitions line is looked at
    let err = parse_standard(["states=[s0]", "alpha=[a]", "initial=[]", "accepting=[]", "trans=[s0>a]"]);
    assert_eq!(err, Err(FsaError::MissingInitial));
}

#[test]
fn test_legacy_grammar() {
    let input = "states=[s0]\r\nalpha=[a]\r\ninit.st=[s0]\r\nfin.st=[s0]\r\ntrans=[s0>a>s0]\r\n";
    let def = Definition::parse(input, Grammar::Legacy).unwrap();
    assert_eq!(def.initial, "s0");
    assert_eq!(def.accepting, vec!["s0"]);
    assert_eq!(Definition::parse(input, Grammar::Standard), Err(FsaError::Malformed));
}

#[test]
fn test_missing_lines() {
    assert_eq!(
        Definition::parse("states=[s0]\nalpha=[a]\ninitial=[s0]\n", Grammar::Standard),
        Err(FsaError::Malformed)
    );
}
