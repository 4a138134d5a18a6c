//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use super::super::super::lexer::TrainCar;
use crate::core::lang::vhdl::token::char_set;
use crate::core::lang::vhdl::token::VhdlToken;
use crate::util::strcmp;
use serde::Serialize;
use serde::Serializer;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Identifier {
    Basic(String),
    Extended(String),
}

impl Identifier {
    /// Creates a new basic identifier for the working library: `work`.
    pub fn new_working() -> Self {
        Self::Basic(String::from("work"))
    }

    // Returns the reference to the inner `String` struct.
    fn as_str(&self) -> &str {
        match self {
            Self::Basic(id) => id.as_ref(),
            Self::Extended(id) => id.as_ref(),
        }
    }

    /// Checks if `self` is an extended identifier or not.
    pub fn is_extended(&self) -> bool {
        match self {
            Self::Extended(_) => true,
            Self::Basic(_) => false,
        }
    }

    /// Creates the key used to compare and order identifiers.
    ///
    /// Basic identifiers are case-insensitive, extended identifiers are not.
    fn sort_key(&self) -> (bool, String) {
        match self {
            Self::Basic(id) => (false, id.to_lowercase()),
            Self::Extended(id) => (true, id.clone()),
        }
    }

    /// Number of characters the identifier occupies in source code.
    pub fn len(&self) -> usize {
        match self {
            Self::Basic(id) => id.len(),
            Self::Extended(id) => id.len() + 2 + (id.chars().filter(|c| c == &'\\').count()),
        }
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Basic(id) => id.to_lowercase().hash(state),
            Self::Extended(id) => id.hash(state),
        }
    }
}

impl Eq for Identifier {}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        // instantly not equal if not they are not of same type
        if self.is_extended() != other.is_extended() {
            return false;
        }
        match self.is_extended() {
            true => self.as_str() == other.as_str(),
            false => strcmp::cmp_ignore_case(self.as_str(), other.as_str()),
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, PartialEq)]
pub enum IdentifierError {
    Empty,
    InvalidFirstChar(char),
    InvalidChar(char),
    CharsAfterDelimiter(String),
    Unclosed,
}

impl std::error::Error for IdentifierError {}

impl Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty identifier"),
            Self::CharsAfterDelimiter(s) => write!(
                f,
                "characters '{}' found following closing extended backslash",
                s
            ),
            Self::InvalidFirstChar(c) => {
                write!(f, "first character must be letter but found '{}'", c)
            }
            Self::InvalidChar(c) => write!(f, "invalid character '{}' in identifier", c),
            Self::Unclosed => write!(f, "extended identifier is missing closing backslash"),
        }
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = TrainCar::new(s.chars());
        let c0 = chars.consume().ok_or(Self::Err::Empty)?;
        let id = match c0 {
            '\\' => {
                let inner = VhdlToken::consume_literal(&mut chars, &char_set::BACKSLASH)
                    .map_err(|_| Self::Err::Unclosed)?;
                if inner.is_empty() == true {
                    return Err(Self::Err::Empty);
                }
                Self::Extended(inner)
            }
            _ => {
                // verify the first character was a letter
                if char_set::is_letter(&c0) == false {
                    return Err(Self::Err::InvalidFirstChar(c0));
                }
                Self::Basic(
                    VhdlToken::consume_value_pattern(
                        &mut chars,
                        Some(c0),
                        &char_set::is_letter_or_digit,
                    )
                    .map_err(|_| Self::Err::InvalidChar('_'))?,
                )
            }
        };
        // gather remaining characters
        let rem: String = std::iter::from_fn(|| chars.consume()).collect();
        match (rem.is_empty(), &id) {
            (true, _) => Ok(id),
            (false, Self::Extended(_)) => Err(Self::Err::CharsAfterDelimiter(rem)),
            (false, Self::Basic(_)) => Err(Self::Err::InvalidChar(
                rem.chars().next().unwrap_or_default(),
            )),
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic(id) => write!(f, "{}", id),
            Self::Extended(id) => write!(f, "\\{}\\", id.replace('\\', r#"\\"#)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn iden_from_str() {
        assert_eq!(
            Identifier::from_str("pkg_a").unwrap(),
            Identifier::Basic("pkg_a".to_owned())
        );
        assert_eq!(
            Identifier::from_str("\\Top_LEVEL\\").unwrap(),
            Identifier::Extended("Top_LEVEL".to_owned())
        );
        // extra characters after closing
        assert_eq!(Identifier::from_str("\\Top_\\LEVEL\\").is_err(), true);
        assert_eq!(
            Identifier::from_str("pkg.a"),
            Err(IdentifierError::InvalidChar('.'))
        );
        assert_eq!(
            Identifier::from_str("9lives"),
            Err(IdentifierError::InvalidFirstChar('9'))
        );
        assert_eq!(Identifier::from_str(""), Err(IdentifierError::Empty));
    }

    #[test]
    fn identifier_equality_and_len() {
        let id0 = Identifier::Basic("byte".to_owned());
        let id1 = Identifier::Basic("BYTE".to_owned());
        assert_eq!(id1.len(), 4);
        assert_eq!(id0, id1);

        let id0 = Identifier::Basic("VHDL".to_owned());
        let id1 = Identifier::Extended("VHDL".to_owned());
        assert_ne!(id0, id1);

        let id0 = Identifier::Extended("vhdl".to_owned());
        let id1 = Identifier::Extended("VHDL".to_owned());
        assert_ne!(id0, id1);
        assert_eq!(id1.len(), 6);

        let id0 = Identifier::Extended("I\\D".to_owned());
        assert_eq!(id0.len(), 6);
    }

    #[test]
    fn hash_and_order_ignore_case() {
        let mut set = HashSet::new();
        set.insert(Identifier::Basic("Pkg_B".to_owned()));
        assert_eq!(set.contains(&Identifier::Basic("pkg_b".to_owned())), true);

        let mut ids = vec![
            Identifier::Basic("pkg_c".to_owned()),
            Identifier::Basic("PKG_A".to_owned()),
            Identifier::Basic("pkg_b".to_owned()),
        ];
        ids.sort();
        assert_eq!(
            ids.iter().map(|i| i.to_string()).collect::<Vec<String>>(),
            vec!["PKG_A", "pkg_b", "pkg_c"]
        );
    }

    #[test]
    fn serialize_as_source_text() {
        let id = Identifier::Extended("odd name".to_owned());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"\\\\odd name\\\\\"");
    }
}
