pub mod iccad;

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("token {position}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },
    #[error("token {position}: '{token}' is not a valid number")]
    InvalidNumber { token: String, position: usize },
    #[error("token {position}: unknown {kind} '{name}'")]
    UnknownName {
        kind: &'static str,
        name: String,
        position: usize,
    },
    #[error("token {position}: {kind} declared out of order, expected '{expected}', found '{found}'")]
    OutOfOrder {
        kind: &'static str,
        expected: String,
        found: String,
        position: usize,
    },
    #[error("token {position}: route of net '{net}' must change exactly one of row, column or layer")]
    MalformedRoute { net: String, position: usize },
    #[error("token {position}: {reason}")]
    Invalid { reason: String, position: usize },
    #[error("token {position}: trailing input after the last route")]
    TrailingInput { position: usize },
}

/// Whitespace token stream that remembers how far it got, so errors can
/// point at the offending token.
pub(crate) struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(content: &'a str) -> Self {
        Self {
            iter: content.split_whitespace(),
            position: 0,
        }
    }

    /// 1-based index of the most recently consumed token.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn next_str(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        let token = self
            .iter
            .next()
            .ok_or(ParseError::UnexpectedEof { expected })?;
        self.position += 1;
        Ok(token)
    }

    pub(crate) fn next_num<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let token = self.next_str(expected)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            token: token.to_string(),
            position: self.position,
        })
    }

    pub(crate) fn keyword(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        let token = self.next_str(keyword)?;
        if token != keyword {
            return Err(ParseError::UnexpectedToken {
                expected: keyword,
                found: token.to_string(),
                position: self.position,
            });
        }
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<(), ParseError> {
        match self.iter.next() {
            None => Ok(()),
            Some(_) => Err(ParseError::TrailingInput {
                position: self.position + 1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_track_position() {
        let mut t = Tokens::new("NumNets  3\n Net");
        t.keyword("NumNets").unwrap();
        assert_eq!(t.next_num::<usize>("count").unwrap(), 3);
        assert_eq!(t.position(), 2);
        assert_eq!(
            t.keyword("Pin"),
            Err(ParseError::UnexpectedToken {
                expected: "Pin",
                found: "Net".to_string(),
                position: 3
            })
        );
        assert!(t.finish().is_ok());
    }

    #[test]
    fn bad_number_and_eof() {
        let mut t = Tokens::new("x1");
        assert_eq!(
            t.next_num::<u32>("row"),
            Err(ParseError::InvalidNumber {
                token: "x1".to_string(),
                position: 1
            })
        );
        assert_eq!(
            t.next_str("column"),
            Err(ParseError::UnexpectedEof { expected: "column" })
        );
    }
}
