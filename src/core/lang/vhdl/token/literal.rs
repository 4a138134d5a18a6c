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

use super::super::error::VhdlError;
use super::super::token::char_set;
use std::fmt::Display;
use std::str::FromStr;

/// Transforms a VHDL integer `s` into a real unsigned number.
///
/// - integer ::= digit { \[ underline ] digit }
pub fn interpret_integer(s: &str) -> Result<usize, VhdlError> {
    let digits: String = s.chars().filter(|c| c != &char_set::UNDERLINE).collect();
    digits
        .parse::<usize>()
        .map_err(|_| VhdlError::Any(format!("invalid integer '{}'", s)))
}

/// Creates the digit validation function for a based literal of radix `base`.
///
/// Extended digits beyond 9 are the letters `a`..`f` in either case.
pub fn base_digits(base: usize) -> impl Fn(&char) -> bool {
    move |c: &char| match c.to_digit(16) {
        Some(d) => (d as usize) < base,
        None => false,
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Character(pub String);

impl Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct BitStrLiteral(pub String);

impl Display for BitStrLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum AbstLiteral {
    Decimal(String),
    Based(String),
}

impl Display for AbstLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal(val) => write!(f, "{}", val),
            Self::Based(val) => write!(f, "{}", val),
        }
    }
}

/// Base specifiers allowed in front of a bit string literal (VHDL-2008).
#[derive(Debug, PartialEq)]
pub enum BaseSpec {
    B,
    O,
    X,
    UB,
    UO,
    UX,
    SB,
    SO,
    SX,
    D,
}

impl FromStr for BaseSpec {
    type Err = VhdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_ref() {
            "b" => Self::B,
            "o" => Self::O,
            "x" => Self::X,
            "ub" => Self::UB,
            "uo" => Self::UO,
            "ux" => Self::UX,
            "sb" => Self::SB,
            "so" => Self::SO,
            "sx" => Self::SX,
            "d" => Self::D,
            _ => return Err(Self::Err::Any(format!("invalid base specifier '{}'", s))),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interpret_int() {
        assert_eq!(interpret_integer("16"), Ok(16));
        assert_eq!(interpret_integer("1_6"), Ok(16));
        assert_eq!(interpret_integer("50_000_000"), Ok(50_000_000));
        assert_eq!(interpret_integer("16a").is_err(), true);
        assert_eq!(interpret_integer("").is_err(), true);
    }

    #[test]
    fn based_digit_ranges() {
        let bin = base_digits(2);
        assert_eq!(bin(&'1'), true);
        assert_eq!(bin(&'2'), false);
        let hex = base_digits(16);
        assert_eq!(hex(&'F'), true);
        assert_eq!(hex(&'f'), true);
        assert_eq!(hex(&'g'), false);
        let dec = base_digits(10);
        assert_eq!(dec(&'a'), false);
    }

    #[test]
    fn base_specifiers() {
        assert_eq!(BaseSpec::from_str("uX"), Ok(BaseSpec::UX));
        assert_eq!(BaseSpec::from_str("D"), Ok(BaseSpec::D));
        assert_eq!(BaseSpec::from_str("z").is_err(), true);
    }
}
