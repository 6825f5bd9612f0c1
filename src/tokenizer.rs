//! Tokenizer for BrainrotSQL text, using nom.
//!
//! Splits on whitespace and on the punctuation `,` `(` `)`, which are kept
//! as tokens of their own. A single-quoted run is one token, quotes
//! included, so `'Frullì Frullà'` reaches the parser intact.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::{char, one_of},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{pair, preceded, tuple},
};

/// Split raw input into tokens.
///
/// Total over any UTF-8 input: empty or all-whitespace input yields no tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    match many0(preceded(whitespace, token))(input) {
        Ok((_, tokens)) => tokens,
        Err(_) => Vec::new(),
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    alt((quoted, punctuation, word))(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace)(input)
}

fn punctuation(input: &str) -> IResult<&str, &str> {
    recognize(one_of(",()"))(input)
}

/// `'...'` with `''` as an escaped quote. An unterminated quote runs to the
/// end of input.
fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('\''),
        many0(alt((tag("''"), is_not("'")))),
        opt(char('\'')),
    )))(input)
}

/// A quote in the middle of a word (`O'Brien`) does not open a literal.
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_word_char),
        many0(pair(char('\''), take_while(is_word_char))),
    ))(input)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '(' | ')' | '\'')
}
