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

use std::fmt::Display;

/// Defines the delimiters alongside their source spelling.
macro_rules! delimiters {
    ($($variant:ident => $text:literal,)*) => {
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
        pub enum Delimiter {
            $($variant,)*
        }

        impl Delimiter {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            fn lookup(s: &str) -> Option<Self> {
                Some(match s {
                    $($text => Self::$variant,)*
                    _ => return None,
                })
            }
        }
    };
}

delimiters! {
    Ampersand => "&",
    SingleQuote => "'",
    ParenL => "(",
    ParenR => ")",
    Star => "*",
    Plus => "+",
    Comma => ",",
    Dash => "-",
    Dot => ".",
    FwdSlash => "/",
    Colon => ":",
    Terminator => ";",
    Lt => "<",
    Eq => "=",
    Gt => ">",
    BackTick => "`",
    Pipe => "|",
    BrackL => "[",
    BrackR => "]",
    Question => "?",
    AtSymbol => "@",
    Arrow => "=>",
    DoubleStar => "**",
    VarAssign => ":=",
    Inequality => "/=",
    GTE => ">=",
    SigAssign => "<=",
    Box => "<>",
    SigAssoc => "<=>",
    CondConv => "??",
    MatchEQ => "?=",
    MatchNE => "?/=",
    MatchLT => "?<",
    MatchLTE => "?<=",
    MatchGT => "?>",
    MatchGTE => "?>=",
    DoubleLT => "<<",
    DoubleGT => ">>",
}

impl Delimiter {
    /// Attempts to match the given string of characters `s` to a VHDL delimiter.
    ///
    /// The `!` character is the VHDL-1993 replacement for `|`.
    pub fn transform(s: &str) -> Option<Self> {
        match s {
            "!" => Some(Self::Pipe),
            _ => Self::lookup(s),
        }
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

