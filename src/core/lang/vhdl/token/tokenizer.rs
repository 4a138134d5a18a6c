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

pub mod char_set {
    pub const DOUBLE_QUOTE: char = '\"';
    pub const BACKSLASH: char = '\\';
    pub const STAR: char = '*';
    pub const DASH: char = '-';
    pub const FWDSLASH: char = '/';
    pub const UNDERLINE: char = '_';
    pub const SINGLE_QUOTE: char = '\'';
    pub const DOT: char = '.';
    pub const HASH: char = '#';
    pub const COLON: char = ':';
    pub const PLUS: char = '+';
    pub const AT: char = '@';
    pub const TERMINATOR: char = ';';

    /// Checks if `c` is a space (space or nbsp).
    pub fn is_space(c: &char) -> bool {
        c == &'\u{0020}' || c == &'\u{00A0}'
    }

    pub fn is_digit(c: &char) -> bool {
        c.is_ascii_digit()
    }

    /// Checks if `c` is a graphic character according to VHDL-2008 LRM p230.
    pub fn is_graphic(c: &char) -> bool {
        is_letter(c) || is_digit(c) || is_special(c) || is_other_special(c) || is_space(c)
    }

    /// Checks if `c` is an upper-case letter according to VHDL-2019 LRM p257.
    pub fn is_upper(c: &char) -> bool {
        match c {
            '\u{00D7}' => false,
            'A'..='Z' | 'À'..='Þ' => true,
            _ => false,
        }
    }

    /// Checks if `c` is a lower-case letter according to VHDL-2019 LRM p257.
    pub fn is_lower(c: &char) -> bool {
        match c {
            '\u{00F7}' => false,
            'a'..='z' | 'ß'..='ÿ' => true,
            _ => false,
        }
    }

    /// Checks if `c` is a special character according to VHDL-2008 LRM p225.
    pub fn is_special(c: &char) -> bool {
        match c {
            '"' | '#' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' | '.' | '/' | ':' | ';'
            | '<' | '=' | '>' | '?' | '@' | '[' | ']' | '_' | '`' | '|' => true,
            _ => false,
        }
    }

    /// Checks if `c` is an "other special character" according to VHDL-2008 LRM p225.
    pub fn is_other_special(c: &char) -> bool {
        match c {
            '!' | '$' | '%' | '\\' | '^' | '{' | '}' | '~' | '\u{00A1}'..='\u{00BF}' | '\u{00D7}'
            | '\u{00F7}' => true,
            _ => false,
        }
    }

    /// Used exclusively when collecting the value of a bit string literal.
    pub fn is_graphic_and_not_double_quote(c: &char) -> bool {
        c != &DOUBLE_QUOTE && is_graphic(c)
    }

    pub fn is_letter(c: &char) -> bool {
        is_lower(c) || is_upper(c)
    }

    pub fn is_letter_or_digit(c: &char) -> bool {
        is_digit(c) || is_letter(c)
    }

    /// Checks if the character is a seperator according to VHDL-2019 LRM p259.
    pub fn is_separator(c: &char) -> bool {
        // whitespace: space, nbsp
        is_space(c) ||
        // format-effectors: ht (\t), vt, cr (\r), lf (\n)
        c == &'\u{0009}' || c == &'\u{000B}' || c == &'\u{000D}' || c == &'\u{000A}'
    }
}

use super::super::super::lexer::{Token, TokenError, TrainCar};
use super::super::error::VhdlError;
use super::{Delimiter, VhdlToken};
use crate::core::lang::lexer::Tokenize;

type VhdlResult = Result<Token<VhdlToken>, TokenError<VhdlError>>;

#[derive(Debug, PartialEq)]
pub struct VhdlTokenizer {
    tokens: Vec<VhdlResult>,
}

impl VhdlTokenizer {
    /// Lexes the source code `s`, keeping every error in place.
    pub fn from_source_code(s: &str) -> Self {
        Self {
            tokens: Self::tokenize(s),
        }
    }

    /// Lexes the source code `s` into its tokens, including comments.
    ///
    /// Stops at the first lexical error.
    pub fn read(s: &str) -> Result<Vec<Token<VhdlToken>>, VhdlError> {
        Self::from_source_code(s).into_result()
    }

    /// Lexes the source code `s` up to its first error.
    ///
    /// The tokens end with an EOF marker placed where the error occurred.
    pub fn read_until_error(s: &str) -> (Vec<Token<VhdlToken>>, Option<VhdlError>) {
        let mut tokens = Vec::new();
        for result in Self::tokenize(s) {
            match result {
                Ok(t) => tokens.push(t),
                Err(e) => {
                    let pos = e.locate().clone();
                    tokens.push(Token::new(VhdlToken::EOF, pos.clone()));
                    return (tokens, Some(VhdlError::Lexical(pos, Box::new(e.into_err()))));
                }
            }
        }
        (tokens, None)
    }

    /// Collects the tokens, returning the first error encountered with its position.
    pub fn into_result(self) -> Result<Vec<Token<VhdlToken>>, VhdlError> {
        self.tokens
            .into_iter()
            .map(|r| {
                r.map_err(|e| {
                    let pos = e.locate().clone();
                    VhdlError::Lexical(pos, Box::new(e.into_err()))
                })
            })
            .collect()
    }
}

/// Decides if a single quote begins a character literal based on the token
/// that came before it.
///
/// After a name or closing parenthesis the quote is an attribute tick.
fn starts_char_literal(prev: Option<&VhdlResult>) -> bool {
    match prev {
        Some(Ok(tk)) => match tk.as_type() {
            VhdlToken::Identifier(_) => false,
            VhdlToken::Delimiter(d) => d != &Delimiter::ParenR,
            _ => true,
        },
        _ => true,
    }
}

impl Tokenize for VhdlTokenizer {
    type TokenType = VhdlToken;
    type Err = VhdlError;

    fn tokenize(s: &str) -> Vec<Result<Token<Self::TokenType>, TokenError<Self::Err>>> {
        let mut train = TrainCar::new(s.chars());
        let mut tokens: Vec<VhdlResult> = Vec::new();
        while let Some(c) = train.consume() {
            if char_set::is_separator(&c) {
                continue;
            }
            let tk_loc = train.locate().clone();
            let result = if char_set::is_letter(&c) {
                VhdlToken::consume_word(&mut train, c)
            } else if c == char_set::BACKSLASH {
                VhdlToken::consume_extended_identifier(&mut train)
            } else if c == char_set::DOUBLE_QUOTE {
                VhdlToken::consume_str_lit(&mut train)
            } else if c == char_set::SINGLE_QUOTE
                && starts_char_literal(
                    tokens
                        .iter()
                        .rev()
                        .find(|t| !matches!(t, Ok(tk) if tk.as_type().as_comment().is_some())),
                )
            {
                VhdlToken::consume_char_lit(&mut train)
            } else if char_set::is_digit(&c) {
                VhdlToken::consume_numeric(&mut train, c)
            } else if c == char_set::DASH && train.peek_is(|n| n == &char_set::DASH) {
                VhdlToken::consume_comment(&mut train)
            } else if c == char_set::FWDSLASH && train.peek_is(|n| n == &char_set::STAR) {
                VhdlToken::consume_delim_comment(&mut train)
            } else {
                VhdlToken::collect_delimiter(&mut train, c)
            };
            tokens.push(match result {
                Ok(tk) => Ok(Token::new(tk, tk_loc)),
                Err(e) => {
                    let err = TokenError::new(e, train.locate().clone());
                    // resume lexing at the next separator or terminator
                    while train.peek_is(|n| {
                        char_set::is_separator(n) == false && n != &char_set::TERMINATOR
                    }) {
                        train.consume();
                    }
                    Err(err)
                }
            });
        }
        let mut tk_loc = train.locate().clone();
        tk_loc.next_col();
        tokens.push(Ok(Token::new(VhdlToken::EOF, tk_loc)));
        tokens
    }
}

#[cfg(test)]
mod test {
    use super::super::literal::{AbstLiteral, Character};
    use super::super::{Comment, Identifier, Keyword};
    use super::*;
    use crate::core::lang::lexer::Position;

    fn types(s: &str) -> Vec<VhdlToken> {
        VhdlTokenizer::read(s)
            .unwrap()
            .into_iter()
            .map(|t| t.take())
            .collect()
    }

    #[test]
    fn tokenize_package() {
        let s = "\
-- @elab pkg_a
package pkg_a is
    constant K : INTEGER;
end package;";
        let tokens = VhdlTokenizer::read(s).unwrap();
        assert_eq!(
            tokens
                .iter()
                .map(|t| t.as_type().clone())
                .collect::<Vec<VhdlToken>>(),
            vec![
                VhdlToken::Comment(Comment::Single(" @elab pkg_a".to_owned())),
                VhdlToken::Keyword(Keyword::Package),
                VhdlToken::Identifier(Identifier::Basic("pkg_a".to_owned())),
                VhdlToken::Keyword(Keyword::Is),
                VhdlToken::Keyword(Keyword::Constant),
                VhdlToken::Identifier(Identifier::Basic("K".to_owned())),
                VhdlToken::Delimiter(Delimiter::Colon),
                VhdlToken::Identifier(Identifier::Basic("INTEGER".to_owned())),
                VhdlToken::Delimiter(Delimiter::Terminator),
                VhdlToken::Keyword(Keyword::End),
                VhdlToken::Keyword(Keyword::Package),
                VhdlToken::Delimiter(Delimiter::Terminator),
                VhdlToken::EOF,
            ]
        );
        assert_eq!(tokens[0].locate(), &Position::place(1, 1));
        assert_eq!(tokens[1].locate(), &Position::place(2, 1));
        assert_eq!(tokens[4].locate(), &Position::place(3, 5));
    }

    #[test]
    fn tick_versus_char_literal() {
        assert_eq!(
            types("s'length"),
            vec![
                VhdlToken::Identifier(Identifier::Basic("s".to_owned())),
                VhdlToken::Delimiter(Delimiter::SingleQuote),
                VhdlToken::Identifier(Identifier::Basic("length".to_owned())),
                VhdlToken::EOF,
            ]
        );
        assert_eq!(
            types("return '1';"),
            vec![
                VhdlToken::Keyword(Keyword::Return),
                VhdlToken::CharLiteral(Character("1".to_owned())),
                VhdlToken::Delimiter(Delimiter::Terminator),
                VhdlToken::EOF,
            ]
        );
        assert_eq!(
            types("('a', 2)"),
            vec![
                VhdlToken::Delimiter(Delimiter::ParenL),
                VhdlToken::CharLiteral(Character("a".to_owned())),
                VhdlToken::Delimiter(Delimiter::Comma),
                VhdlToken::AbstLiteral(AbstLiteral::Decimal("2".to_owned())),
                VhdlToken::Delimiter(Delimiter::ParenR),
                VhdlToken::EOF,
            ]
        );
    }

    #[test]
    fn first_error_is_reported() {
        let s = "package p is\n  constant c : integer := 17#1#;\nend;";
        match VhdlTokenizer::read(s) {
            Err(VhdlError::Lexical(pos, _)) => assert_eq!(pos.line(), 2),
            other => panic!("expected lexical error, got {:?}", other),
        }
        let results = VhdlTokenizer::tokenize(s);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        // lexing picks back up at the terminator
        let after: Vec<&VhdlToken> = results
            .iter()
            .skip_while(|r| r.is_ok())
            .skip(1)
            .filter_map(|r| r.as_ref().ok().map(|t| t.as_type()))
            .collect();
        assert_eq!(
            after,
            vec![
                &VhdlToken::Delimiter(Delimiter::Terminator),
                &VhdlToken::Keyword(Keyword::End),
                &VhdlToken::Delimiter(Delimiter::Terminator),
                &VhdlToken::EOF,
            ]
        );
    }

    #[test]
    fn comments_are_tokens() {
        let tokens = VhdlTokenizer::read("/* note */ end; -- done").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(
            tokens[0].as_type(),
            &VhdlToken::Comment(Comment::Delimited(" note ".to_owned()))
        );
        assert_eq!(tokens[1].as_type().check_keyword(&Keyword::End), true);
    }
}
