/*
 * This file is a part of godis
 *
 * Copyright (c) 2026, the godis authors.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Range borders for `ZRANGEBYSCORE`/`ZRANGEBYLEX`-style queries.
//!
//! Grounded in `examples/original_source/internal/datastruct/sortedset/border.go`:
//! a border is either an infinite sentinel or a concrete bound with an
//! inclusive/exclusive flag, and `(`-prefixed text means exclusive while a
//! bare value means inclusive.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inf {
    Neg,
    None,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBorder {
    pub inf: Inf,
    pub value: f64,
    pub exclude: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

impl ScoreBorder {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        match text {
            "inf" | "+inf" => Ok(Self { inf: Inf::Pos, value: 0.0, exclude: false }),
            "-inf" => Ok(Self { inf: Inf::Neg, value: 0.0, exclude: false }),
            _ if text.starts_with('(') => {
                let value: f64 = text[1..]
                    .parse()
                    .map_err(|_| ParseError("ERR min or max is not a float".to_owned()))?;
                Ok(Self { inf: Inf::None, value, exclude: true })
            }
            _ => {
                let value: f64 = text
                    .parse()
                    .map_err(|_| ParseError("ERR min or max is not a float".to_owned()))?;
                Ok(Self { inf: Inf::None, value, exclude: false })
            }
        }
    }

    /// Is `score` greater than this border (used as a min bound)?
    pub fn greater(&self, score: f64) -> bool {
        match self.inf {
            Inf::Neg => true,
            Inf::Pos => false,
            Inf::None => {
                if self.exclude {
                    score > self.value
                } else {
                    score >= self.value
                }
            }
        }
    }

    /// Is `score` less than this border (used as a max bound)?
    pub fn less(&self, score: f64) -> bool {
        match self.inf {
            Inf::Neg => false,
            Inf::Pos => true,
            Inf::None => {
                if self.exclude {
                    score < self.value
                } else {
                    score <= self.value
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexBorder {
    NegInf,
    PosInf,
    Value { value: String, exclude: bool },
}

impl LexBorder {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        match text {
            "-" => Ok(Self::NegInf),
            "+" => Ok(Self::PosInf),
            _ if text.starts_with('(') => Ok(Self::Value { value: text[1..].to_owned(), exclude: true }),
            _ if text.starts_with('[') => Ok(Self::Value { value: text[1..].to_owned(), exclude: false }),
            _ => Err(ParseError("ERR min or max not valid string range item".to_owned())),
        }
    }

    pub fn greater(&self, member: &str) -> bool {
        match self {
            Self::NegInf => true,
            Self::PosInf => false,
            Self::Value { value, exclude } => {
                if *exclude {
                    member > value.as_str()
                } else {
                    member >= value.as_str()
                }
            }
        }
    }

    pub fn less(&self, member: &str) -> bool {
        match self {
            Self::NegInf => false,
            Self::PosInf => true,
            Self::Value { value, exclude } => {
                if *exclude {
                    member < value.as_str()
                } else {
                    member <= value.as_str()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_border_parsing() {
        assert_eq!(ScoreBorder::parse("+inf").unwrap().inf, Inf::Pos);
        assert_eq!(ScoreBorder::parse("-inf").unwrap().inf, Inf::Neg);
        let b = ScoreBorder::parse("(5").unwrap();
        assert_eq!(b.inf, Inf::None);
        assert_eq!(b.value, 5.0);
        assert!(b.exclude);
        let b = ScoreBorder::parse("5").unwrap();
        assert!(!b.exclude);
    }

    #[test]
    fn score_border_greater_less() {
        let min = ScoreBorder::parse("(1").unwrap();
        assert!(!min.greater(1.0));
        assert!(min.greater(1.1));
        let max = ScoreBorder::parse("5").unwrap();
        assert!(max.less(5.0));
        assert!(!max.less(5.1));
    }

    #[test]
    fn lex_border_parsing() {
        assert_eq!(LexBorder::parse("-").unwrap(), LexBorder::NegInf);
        assert_eq!(LexBorder::parse("+").unwrap(), LexBorder::PosInf);
        assert_eq!(
            LexBorder::parse("[abc").unwrap(),
            LexBorder::Value { value: "abc".to_owned(), exclude: false }
        );
        assert!(LexBorder::parse("abc").is_err());
    }
}
