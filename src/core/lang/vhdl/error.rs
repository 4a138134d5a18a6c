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

use super::super::lexer::Position;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VhdlError {
    #[error("{0}")]
    Any(String),
    #[error("invalid character {0}")]
    Invalid(String),
    #[error("missing and empty {0}")]
    MissingAndEmpty(char),
    #[error("expecting closing {0} but got {1}")]
    MissingClosingAndGot(char, char),
    #[error("{0} expecting {1} but found {2}")]
    Expecting(Position, String, String),
    #[error("{0} unexpected end of file while expecting {1}")]
    UnexpectedEof(Position, String),
    #[error("{0} ending name '{2}' does not match '{1}'")]
    EndingMismatch(Position, String, String),
    #[error("{0} {1}")]
    Lexical(Position, Box<VhdlError>),
}

impl VhdlError {
    /// Returns the position of the error in the source code, if known.
    pub fn locate(&self) -> Option<&Position> {
        match self {
            Self::Expecting(p, _, _) => Some(p),
            Self::EndingMismatch(p, _, _) => Some(p),
            Self::Lexical(p, _) => Some(p),
            Self::UnexpectedEof(p, _) => Some(p),
            _ => None,
        }
    }

    /// Formats the error's message without its position.
    pub fn describe(&self) -> String {
        match self {
            Self::Expecting(_, e, f) => format!("expecting {} but found {}", e, f),
            Self::EndingMismatch(_, e, f) => {
                format!("ending name '{}' does not match '{}'", f, e)
            }
            Self::Lexical(_, e) => e.describe(),
            Self::UnexpectedEof(_, e) => format!("unexpected end of file while expecting {}", e),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn describe_without_position() {
        let e = VhdlError::Lexical(
            Position::place(3, 7),
            Box::new(VhdlError::MissingClosingAndGot('"', '\n')),
        );
        assert_eq!(e.locate(), Some(&Position::place(3, 7)));
        assert_eq!(e.describe(), "expecting closing \" but got \n");

        let e = VhdlError::Expecting(
            Position::place(1, 1),
            "a design unit".to_owned(),
            "'signal'".to_owned(),
        );
        assert_eq!(e.to_string(), ":1:1 expecting a design unit but found 'signal'");
        assert_eq!(e.describe(), "expecting a design unit but found 'signal'");
        let e = VhdlError::UnexpectedEof(Position::place(9, 4), "';'".to_owned());
        assert_eq!(e.locate(), Some(&Position::place(9, 4)));
        assert_eq!(e.describe(), "unexpected end of file while expecting ';'");
        assert_eq!(VhdlError::Any("x".to_owned()).locate(), None);
    }
}
