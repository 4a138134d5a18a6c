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

use serde_derive::Serialize;
use std::fmt::Display;

/// Defines the reserved words alongside their source spelling.
macro_rules! reserved_words {
    ($($variant:ident => $word:literal,)*) => {
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Attempts to match the given string of characters `s` to a VHDL keyword.
            ///
            /// Compares `s` against keywords using ascii lowercase comparison.
            pub fn match_keyword(s: &str) -> Option<Self> {
                Some(match s.to_ascii_lowercase().as_ref() {
                    $($word => Self::$variant,)*
                    _ => return None,
                })
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $word,)*
                }
            }
        }
    };
}

// VHDL-2019 LRM 15.10 reserved words
reserved_words! {
    Abs => "abs",
    Access => "access",
    After => "after",
    Alias => "alias",
    All => "all",
    And => "and",
    Architecture => "architecture",
    Array => "array",
    Assert => "assert",
    Assume => "assume",
    Attribute => "attribute",
    Begin => "begin",
    Block => "block",
    Body => "body",
    Buffer => "buffer",
    Bus => "bus",
    Case => "case",
    Component => "component",
    Configuration => "configuration",
    Constant => "constant",
    Context => "context",
    Cover => "cover",
    Default => "default",
    Disconnect => "disconnect",
    Downto => "downto",
    Else => "else",
    Elsif => "elsif",
    End => "end",
    Entity => "entity",
    Exit => "exit",
    Fairness => "fairness",
    File => "file",
    For => "for",
    Force => "force",
    Function => "function",
    Generate => "generate",
    Generic => "generic",
    Group => "group",
    Guarded => "guarded",
    If => "if",
    Impure => "impure",
    In => "in",
    Inertial => "inertial",
    Inout => "inout",
    Is => "is",
    Label => "label",
    Library => "library",
    Linkage => "linkage",
    Literal => "literal",
    Loop => "loop",
    Map => "map",
    Mod => "mod",
    Nand => "nand",
    New => "new",
    Next => "next",
    Nor => "nor",
    Not => "not",
    Null => "null",
    Of => "of",
    On => "on",
    Open => "open",
    Or => "or",
    Others => "others",
    Out => "out",
    Package => "package",
    Parameter => "parameter",
    Port => "port",
    Postponed => "postponed",
    Private => "private",
    Procedure => "procedure",
    Process => "process",
    Property => "property",
    Protected => "protected",
    Pure => "pure",
    Range => "range",
    Record => "record",
    Register => "register",
    Reject => "reject",
    Release => "release",
    Rem => "rem",
    Report => "report",
    Restrict => "restrict",
    Return => "return",
    Rol => "rol",
    Ror => "ror",
    Select => "select",
    Sequence => "sequence",
    Severity => "severity",
    Signal => "signal",
    Shared => "shared",
    Sla => "sla",
    Sll => "sll",
    Sra => "sra",
    Srl => "srl",
    Strong => "strong",
    Subtype => "subtype",
    Then => "then",
    To => "to",
    Transport => "transport",
    Type => "type",
    Unaffected => "unaffected",
    Units => "units",
    Until => "until",
    Use => "use",
    Variable => "variable",
    View => "view",
    Vmode => "vmode",
    Vpkg => "vpkg",
    Vprop => "vprop",
    Vunit => "vunit",
    Wait => "wait",
    When => "when",
    While => "while",
    With => "with",
    Xnor => "xnor",
    Xor => "xor",
}

impl Keyword {
    /// Checks if the keyword can follow `end` to close a construct that does
    /// not own a declarative region of its own (`end if`, `end record`, ...).
    pub fn closes_inner_construct(&self) -> bool {
        match self {
            Self::If
            | Self::Case
            | Self::Loop
            | Self::Record
            | Self::Units
            | Self::Protected
            | Self::Block
            | Self::Process
            | Self::Generate
            | Self::Component
            | Self::For
            | Self::Postponed
            | Self::View => true,
            _ => false,
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
