//! Reading synthesized expressions back so their language can be queried.
//!
//! Symbols may be several characters long, so a symbol `s` is matched as the
//! framed literal `<s>` and a word is framed the same way before matching.

use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{map, value},
    multi::many0,
    IResult,
};
use regex::Regex;
use thiserror::Error;

use crate::synthesis::{EMPTY, EPSILON};

#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("unexpected input at byte {0}")]
    UnexpectedToken(usize),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    Alt,
    Star,
    Empty,
    Epsilon,
    Symbol(String),
}

fn word(input: &str) -> IResult<&str, Token> {
    map(
        take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
        |w: &str| {
            if w == EPSILON {
                Token::Epsilon
            } else {
                Token::Symbol(w.to_string())
            }
        },
    )(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Empty, tag(EMPTY)),
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
        value(Token::Alt, char('|')),
        value(Token::Star, char('*')),
        word,
    ))(input)
}

// never matches, not even the empty word
const EMPTY_CLASS: &str = r"[^\x00-\x{10FFFF}]";

fn frame(symbol: &str) -> String {
    format!("<{}>", symbol)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub tokens: Vec<Token>,
}

impl Expression {
    pub fn parse(s: &str) -> Result<Expression, ExpressionError> {
        let (rest, tokens) =
            many0(token)(s).map_err(|_| ExpressionError::UnexpectedToken(0))?;
        if !rest.is_empty() {
            return Err(ExpressionError::UnexpectedToken(s.len() - rest.len()));
        }
        Ok(Expression { tokens })
    }

    /// An anchored pattern for the `regex` crate over framed symbols.
    pub fn to_regex_pattern(&self) -> String {
        let body = self
            .tokens
            .iter()
            .map(|t| match t {
                Token::Open => "(?:".to_string(),
                Token::Close => ")".to_string(),
                Token::Alt => "|".to_string(),
                Token::Star => "*".to_string(),
                Token::Empty => EMPTY_CLASS.to_string(),
                Token::Epsilon => "(?:)".to_string(),
                Token::Symbol(s) => regex::escape(&frame(s)),
            })
            .join("");
        format!("^(?:{})$", body)
    }

    pub fn matcher(&self) -> Result<Matcher, ExpressionError> {
        Ok(Matcher {
            regex: Regex::new(&self.to_regex_pattern())?,
        })
    }
}

pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Whether the expression denotes the word, given as symbol names.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let framed = word.iter().map(|s| frame(s.as_ref())).join("");
        self.regex.is_match(&framed)
    }
}

#[test]
fn test_tokens() {
    let e = Expression::parse("(ab_1|eps)*{}").unwrap();
    assert_eq!(
        e.tokens,
        vec![
            Token::Open,
            Token::Symbol("ab_1".to_string()),
            Token::Alt,
            Token::Epsilon,
            Token::Close,
            Token::Star,
            Token::Empty,
        ]
    );
}

#[test]
fn test_unexpected_token() {
    match Expression::parse("a|b+c") {
        Err(ExpressionError::UnexpectedToken(at)) => assert_eq!(at, 3),
        other => panic!("{:?}", other),
    }
    assert!(matches!(
        Expression::parse("{"),
        Err(ExpressionError::UnexpectedToken(0))
    ));
}

#[test]
fn test_unbalanced_is_a_regex_error() {
    let e = Expression::parse("(a|b").unwrap();
    assert!(matches!(e.matcher(), Err(ExpressionError::Regex(_))));
}

#[test]
fn test_empty_and_epsilon() {
    let empty = Expression::parse(EMPTY).unwrap().matcher().unwrap();
    assert!(!empty.accepts::<&str>(&[]));
    assert!(!empty.accepts(&["a"]));

    let eps = Expression::parse(EPSILON).unwrap().matcher().unwrap();
    assert!(eps.accepts::<&str>(&[]));
    assert!(!eps.accepts(&["a"]));

    let star = Expression::parse("({})*").unwrap().matcher().unwrap();
    assert!(star.accepts::<&str>(&[]));
}

#[test]
fn test_multi_character_symbols() {
    let m = Expression::parse("(ab)(a)*|(b_)").unwrap().matcher().unwrap();
    assert!(m.accepts(&["ab"]));
    assert!(m.accepts(&["ab", "a", "a"]));
    assert!(m.accepts(&["b_"]));
    assert!(!m.accepts(&["a", "b"]));
    assert!(!m.accepts(&["a"]));
}
