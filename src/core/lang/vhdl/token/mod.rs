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

use super::super::lexer::TrainCar;
use std::fmt::Display;
use std::str::FromStr;

pub mod comment;
pub mod delimiter;
pub mod identifier;
pub mod keyword;
pub mod literal;
pub mod tokenizer;

use literal::{AbstLiteral, BaseSpec, BitStrLiteral, Character};

pub use tokenizer::char_set;

pub type Identifier = identifier::Identifier;
pub type Comment = comment::Comment;
pub type Keyword = keyword::Keyword;
pub type Delimiter = delimiter::Delimiter;
pub type VhdlTokenizer = tokenizer::VhdlTokenizer;
pub type VhdlError = super::error::VhdlError;

#[derive(Debug, PartialEq, Clone)]
pub enum VhdlToken {
    Comment(Comment),
    Identifier(Identifier), // can be general or extended (case-sensitive) identifier
    AbstLiteral(AbstLiteral),
    CharLiteral(Character),
    StrLiteral(String),
    BitStrLiteral(BitStrLiteral),
    Keyword(Keyword),
    Delimiter(Delimiter),
    EOF,
}

impl Display for VhdlToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment(note) => write!(f, "{}", note),
            Self::Identifier(id) => write!(f, "{}", id),
            Self::AbstLiteral(a) => write!(f, "{}", a),
            Self::CharLiteral(c) => write!(f, "{}", c),
            Self::StrLiteral(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
            Self::BitStrLiteral(b) => write!(f, "{}", b),
            Self::Keyword(kw) => write!(f, "{}", kw),
            Self::Delimiter(d) => write!(f, "{}", d),
            Self::EOF => Ok(()),
        }
    }
}

impl VhdlToken {
    /// Takes the identifier from the token.
    pub fn take_identifier(self) -> Option<Identifier> {
        match self {
            Self::Identifier(i) => Some(i),
            _ => None,
        }
    }

    /// Accesses the underlying `Identifier`, if one exists.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    /// Casts into a keyword.
    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment(r) => Some(r),
            _ => None,
        }
    }

    /// Checks if the element is a particular keyword `kw`.
    pub fn check_keyword(&self, kw: &Keyword) -> bool {
        match self {
            Self::Keyword(r) => r == kw,
            _ => false,
        }
    }

    /// Checks if the element is a particular delimiter `d`.
    pub fn check_delimiter(&self, d: &Delimiter) -> bool {
        match self {
            Self::Delimiter(r) => r == d,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        match self {
            Self::EOF => true,
            _ => false,
        }
    }
}

impl VhdlToken {
    /// Attempts to match a string `s` to a valid delimiter.
    pub fn match_delimiter(s: &str) -> Result<Self, VhdlError> {
        match Delimiter::transform(s) {
            Some(d) => Ok(VhdlToken::Delimiter(d)),
            None => Err(VhdlError::Invalid(s.to_string())),
        }
    }

    /// Captures VHDL Tokens that begin with `integer` production rule:
    /// decimal literal, based_literal, and bit_string_literals.
    ///
    /// Assumes the incoming char `c0` was last char consumed as it a digit `0..=9`.
    pub fn consume_numeric(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<VhdlToken, VhdlError> {
        let mut number = Self::consume_value_pattern(train, Some(c0), &char_set::is_digit)?;
        let next = match train.peek() {
            Some(c) => *c,
            None => return Ok(VhdlToken::AbstLiteral(AbstLiteral::Decimal(number))),
        };
        let is_based = if next == char_set::DOT {
            // * decimal_literal
            number.push(train.consume().unwrap());
            let fraction = Self::consume_value_pattern(train, None, &char_set::is_digit)?;
            if fraction.is_empty() {
                return Err(VhdlError::Any(String::from(
                    "cannot have trailing decimal point",
                )));
            }
            number.push_str(&fraction);
            false
        } else if next == char_set::HASH || next == char_set::COLON {
            // * based_literal (can begin with '#' or ':')
            let base = literal::interpret_integer(&number)?;
            if base < 2 || base > 16 {
                return Err(VhdlError::Any(String::from(
                    "based literal must have base of at least 2 and at most 16",
                )));
            }
            number.push_str(&Self::consume_based_value(train, base)?);
            true
        } else if next != 'e' && next != 'E' && char_set::is_letter(&next) {
            // * bit string literal with a leading width
            let base_spec = Self::consume_value_pattern(train, None, &char_set::is_letter)?;
            BaseSpec::from_str(&base_spec)?;
            if train.peek_is(|c| c == &char_set::DOUBLE_QUOTE) == false {
                return Err(VhdlError::Any(String::from(
                    "expecting opening quote character for bit string literal",
                )));
            }
            number.push_str(&base_spec);
            number.push(train.consume().unwrap());
            return Self::consume_bit_str_literal(train, number);
        } else {
            false
        };
        // gather exponent
        if train.peek_is(|c| c == &'e' || c == &'E') {
            let c0 = train.consume().unwrap();
            number.push_str(&Self::consume_exponent(train, c0)?);
        }
        Ok(VhdlToken::AbstLiteral(match is_based {
            true => AbstLiteral::Based(number),
            false => AbstLiteral::Decimal(number),
        }))
    }

    /// Captures the portion of a based literal following its base, including
    /// the opening and closing '#' (or ':') characters.
    ///
    /// - based_literal ::= base # based_integer \[ . based_integer ] # \[ exponent ]
    fn consume_based_value(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        base: usize,
    ) -> Result<String, VhdlError> {
        let eval = literal::base_digits(base);
        let delim = train.consume().unwrap();
        let mut value = String::from(delim);
        let whole = Self::consume_value_pattern(train, None, &eval)?;
        if whole.is_empty() {
            return Err(VhdlError::Any(format!(
                "expecting a base {} digit after '{}'",
                base, delim
            )));
        }
        value.push_str(&whole);
        if train.peek_is(|c| c == &char_set::DOT) {
            value.push(train.consume().unwrap());
            let fraction = Self::consume_value_pattern(train, None, &eval)?;
            if fraction.is_empty() {
                return Err(VhdlError::Any(String::from(
                    "expecting an integer after the dot",
                )));
            }
            value.push_str(&fraction);
        }
        match train.consume() {
            Some(c) if c == delim => {
                value.push(c);
                Ok(value)
            }
            Some(c) => Err(VhdlError::MissingClosingAndGot(delim, c)),
            None => Err(VhdlError::MissingAndEmpty(delim)),
        }
    }

    /// Captures VHDL Tokens: keywords, basic identifiers, and regular bit string literals.
    ///
    /// Assumes the first `letter` char was the last char consumed before the function call.
    pub fn consume_word(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<VhdlToken, VhdlError> {
        let mut word =
            Self::consume_value_pattern(train, Some(c0), &char_set::is_letter_or_digit)?;
        if let Some(kw) = Keyword::match_keyword(&word) {
            return Ok(VhdlToken::Keyword(kw));
        }
        // * bit string literal: check if the next char is a double quote
        if train.peek_is(|c| c == &char_set::DOUBLE_QUOTE) {
            BaseSpec::from_str(&word)?;
            word.push(train.consume().unwrap());
            return Self::consume_bit_str_literal(train, word);
        }
        Ok(VhdlToken::Identifier(Identifier::Basic(word)))
    }

    /// Captures the remaining characters for a bit string literal.
    ///
    /// Assumes the integer, base_specifier, and first " char are already consumed
    /// and moved as `s0`.
    /// - bit_string_literal ::= \[ integer ] base_specifier " \[ bit_value ] "
    /// - bit_value ::= graphic_character { [ underline ] graphic_character }
    pub fn consume_bit_str_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        s0: String,
    ) -> Result<VhdlToken, VhdlError> {
        let mut literal = s0;
        let bit_value =
            Self::consume_value_pattern(train, None, &char_set::is_graphic_and_not_double_quote)?;
        if train.peek_is(|c| c == &char_set::DOUBLE_QUOTE) == false {
            return Err(VhdlError::Any(String::from(
                "expecting closing double quote for bit string literal",
            )));
        }
        literal.push_str(&bit_value);
        literal.push(train.consume().unwrap());
        Ok(VhdlToken::BitStrLiteral(BitStrLiteral(literal)))
    }

    /// Captures an extended identifier token.
    ///
    /// Errors if the identifier is empty.
    pub fn consume_extended_identifier(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<VhdlToken, VhdlError> {
        let id = Self::consume_literal(train, &char_set::BACKSLASH)?;
        match id.is_empty() {
            true => Err(VhdlError::Any(String::from(
                "extended identifier cannot be empty",
            ))),
            false => Ok(VhdlToken::Identifier(Identifier::Extended(id))),
        }
    }

    /// Captures a character literal.
    ///
    /// Assumes the first single quote '\'' was the last char consumed.
    pub fn consume_char_lit(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<VhdlToken, VhdlError> {
        let c = match train.consume() {
            Some(c) => c,
            None => return Err(VhdlError::MissingAndEmpty(char_set::SINGLE_QUOTE)),
        };
        if char_set::is_graphic(&c) == false {
            return Err(VhdlError::Any(String::from("char not graphic")));
        }
        match train.consume() {
            Some(q) if q == char_set::SINGLE_QUOTE => Ok(VhdlToken::CharLiteral(Character(
                String::from(c),
            ))),
            Some(q) => Err(VhdlError::MissingClosingAndGot(char_set::SINGLE_QUOTE, q)),
            None => Err(VhdlError::MissingAndEmpty(char_set::SINGLE_QUOTE)),
        }
    }

    /// Captures a string literal.
    ///
    /// Assumes the first double quote '\"' was the last char consumed before entering the function.
    pub fn consume_str_lit(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<VhdlToken, VhdlError> {
        let value = Self::consume_literal(train, &char_set::DOUBLE_QUOTE)?;
        Ok(VhdlToken::StrLiteral(value))
    }

    /// Collects a delimited comment (all characters after a `/*` up until `*/`).
    ///
    /// Assumes the opening '/' char was the last char consumed before entering the function.
    /// Also assumes the next char is '*'.
    pub fn consume_delim_comment(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<VhdlToken, VhdlError> {
        // skip over opening '*'
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::STAR && train.peek_is(|n| n == &char_set::FWDSLASH) {
                train.consume();
                return Ok(VhdlToken::Comment(Comment::Delimited(note)));
            }
            note.push(c);
        }
        Err(VhdlError::Any(String::from("missing closing delimiter */")))
    }

    /// Collects a single-line comment (all characters after a `--` up until end-of-line).
    ///
    /// Assumes the opening '-' was the last char consumed before entering the function.
    /// Also assumes the next char is '-'.
    pub fn consume_comment(
        train: &mut TrainCar<impl Iterator<Item = char>>,
    ) -> Result<VhdlToken, VhdlError> {
        // skip over second '-'
        train.consume();
        let mut note = String::new();
        while let Some(c) = train.consume() {
            // cannot be vt, cr (\r), lf (\n)
            if c == '\u{000B}' || c == '\u{000D}' || c == '\u{000A}' {
                break;
            }
            note.push(c);
        }
        Ok(VhdlToken::Comment(Comment::Single(note)))
    }

    /// Captures the longest VHDL delimiter (at most 3 characters) beginning with `c0`.
    ///
    /// Assumes `c0` was the last char consumed before entering the function.
    pub fn collect_delimiter(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<VhdlToken, VhdlError> {
        let mut delim = String::from(c0);
        if let Some(c1) = train.peek() {
            delim.push(*c1);
            // "?/" is only valid as the prefix to "?/="
            if Delimiter::transform(&delim).is_some() || delim == "?/" {
                train.consume();
                if let Some(c2) = train.peek() {
                    delim.push(*c2);
                    if Delimiter::transform(&delim).is_some() {
                        train.consume();
                        return Self::match_delimiter(&delim);
                    }
                    delim.pop();
                }
            } else {
                delim.pop();
            }
        }
        Self::match_delimiter(&delim)
    }

    /// Captures the generic pattern production rule by passing a fn as `eval` to compare.
    ///
    /// This function allows for an empty result to be returned as `Ok`.
    /// - A ::= A { \[ underline ] A }
    pub fn consume_value_pattern(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: Option<char>,
        eval: &dyn Fn(&char) -> bool,
    ) -> Result<String, VhdlError> {
        let mut car = c0.map(String::from).unwrap_or_default();
        while let Some(c) = train.peek() {
            if eval(c) == true {
                car.push(train.consume().unwrap());
            } else if c == &char_set::UNDERLINE {
                if car.is_empty() == true {
                    return Err(VhdlError::Any(String::from(
                        "expecting a digit before underline",
                    )));
                }
                car.push(train.consume().unwrap());
                // a digit must proceed the underline
                match train.consume() {
                    Some(c_next) if eval(&c_next) == true => car.push(c_next),
                    Some(_) => {
                        return Err(VhdlError::Any(String::from(
                            "expecting a digit to follow underline",
                        )))
                    }
                    None => return Err(VhdlError::Any(String::from("expecting a digit"))),
                }
            } else {
                break;
            }
        }
        Ok(car)
    }

    /// Captures an exponent.
    ///
    /// Assumes the previous function has already peeked and determined the next char is 'E' as `c0`.
    /// - exponent ::= E \[ + ] integer | E - integer
    fn consume_exponent(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        c0: char,
    ) -> Result<String, VhdlError> {
        let mut expon = String::from(c0);
        let sign = match train.consume() {
            Some(c) if c == char_set::PLUS || c == char_set::DASH || char_set::is_digit(&c) => c,
            Some(_) => return Err(VhdlError::Any(String::from("expecting +, -, or a digit"))),
            None => {
                return Err(VhdlError::Any(String::from(
                    "expecting +, -, or digit but got nothing",
                )))
            }
        };
        let lead = match char_set::is_digit(&sign) {
            true => Some(sign),
            false => {
                expon.push(sign);
                None
            }
        };
        let value = Self::consume_value_pattern(train, lead, &char_set::is_digit)?;
        if value.is_empty() {
            return Err(VhdlError::Any(String::from(
                "expecting an integer exponent value but got nothing",
            )));
        }
        expon.push_str(&value);
        Ok(expon)
    }

    /// Walks through the stream to gather a `String` literal until finding the
    /// exiting character `br`.
    ///
    /// An escape is allowed by double placing the `br`, i.e. """hello"" world".
    /// Assumes the first token to parse in the stream is not the `br` character.
    /// Allows for zero or more characters in result and chars must be graphic.
    pub fn consume_literal(
        train: &mut TrainCar<impl Iterator<Item = char>>,
        br: &char,
    ) -> Result<String, VhdlError> {
        let mut result = String::new();
        while let Some(c) = train.consume() {
            if char_set::is_graphic(&c) == false {
                return Err(VhdlError::Any(String::from("invalid character in literal")));
            }
            // detect escape sequence
            if br == &c {
                match train.peek() {
                    Some(c_next) if c_next == br => {
                        train.consume();
                    }
                    _ => return Ok(result),
                }
            }
            result.push(c);
        }
        Err(VhdlError::Any(String::from("expecting closing delimiter")))
    }
}

#[cfg(test)]
mod test {
    use super::super::super::lexer::*;
    use super::*;

    #[test]
    fn lex_numeric() {
        let mut tc = TrainCar::new("32)".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0).unwrap(),
            VhdlToken::AbstLiteral(AbstLiteral::Decimal("32".to_owned()))
        );
        assert_eq!(tc.peekable().clone().collect::<String>(), ")");

        let mut tc = TrainCar::new("6.023E+24".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0).unwrap(),
            VhdlToken::AbstLiteral(AbstLiteral::Decimal("6.023E+24".to_owned()))
        );

        let mut tc = TrainCar::new("16#F.FF#E+2;".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0).unwrap(),
            VhdlToken::AbstLiteral(AbstLiteral::Based("16#F.FF#E+2".to_owned()))
        );
        assert_eq!(tc.peekable().clone().collect::<String>(), ";");

        // '#' can be replaced by ':' if done in both occurences
        let mut tc = TrainCar::new("016:0FF:".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0).unwrap(),
            VhdlToken::AbstLiteral(AbstLiteral::Based("016:0FF:".to_owned()))
        );

        let mut tc = TrainCar::new("016:0FF#".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(VhdlToken::consume_numeric(&mut tc, c0).is_err(), true);
    }

    #[test]
    fn based_literal_out_of_range() {
        let mut tc = TrainCar::new("17#0F#".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(VhdlToken::consume_numeric(&mut tc, c0).is_err(), true);

        let mut tc = TrainCar::new("2#0123#".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0),
            Err(VhdlError::MissingClosingAndGot('#', '2'))
        );
    }

    #[test]
    fn lex_bit_str() {
        let mut tc = TrainCar::new("10b\"10_1001_1111\";".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_numeric(&mut tc, c0).unwrap(),
            VhdlToken::BitStrLiteral(BitStrLiteral("10b\"10_1001_1111\"".to_owned()))
        );
        assert_eq!(tc.peekable().clone().collect::<String>(), ";");

        let mut tc = TrainCar::new("x\"FF\" more".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_word(&mut tc, c0),
            Ok(VhdlToken::BitStrLiteral(BitStrLiteral("x\"FF\"".to_owned())))
        );

        // invalid base specifier in any language standard
        let mut tc = TrainCar::new("z\"1010\"".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(VhdlToken::consume_word(&mut tc, c0).is_err(), true);
    }

    #[test]
    fn lex_single_comment() {
        let contents = "--@elab pkg_a\npackage pkg_a is end;";
        let mut tc = TrainCar::new(contents.chars());
        tc.consume();
        assert_eq!(
            VhdlToken::consume_comment(&mut tc).unwrap(),
            VhdlToken::Comment(Comment::Single("@elab pkg_a".to_owned()))
        );
        assert_eq!(tc.locate(), &Position::place(2, 0));
    }

    #[test]
    fn lex_delim_comment() {
        let mut tc = TrainCar::new("/* a\nb */;".chars());
        tc.consume();
        assert_eq!(
            VhdlToken::consume_delim_comment(&mut tc).unwrap(),
            VhdlToken::Comment(Comment::Delimited(" a\nb ".to_owned()))
        );
        assert_eq!(tc.peekable().clone().collect::<String>(), ";");

        let mut tc = TrainCar::new("/* unterminated".chars());
        tc.consume();
        assert_eq!(VhdlToken::consume_delim_comment(&mut tc).is_err(), true);
    }

    #[test]
    fn lex_literal() {
        let mut tc = TrainCar::new("\" go \"\"to\"\"\" ".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(
            VhdlToken::consume_literal(&mut tc, &c0).unwrap(),
            " go \"to\""
        );
        assert_eq!(tc.peekable().clone().collect::<String>(), " ");

        let mut tc = TrainCar::new("\"go ".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(VhdlToken::consume_literal(&mut tc, &c0).is_err(), true);
    }

    #[test]
    fn lex_value_pattern() {
        let mut tc = TrainCar::new("1_2_345 ".chars());
        assert_eq!(
            VhdlToken::consume_value_pattern(&mut tc, None, &char_set::is_digit).unwrap(),
            "1_2_345"
        );
        let mut tc = TrainCar::new("23__4".chars());
        assert_eq!(
            VhdlToken::consume_value_pattern(&mut tc, None, &char_set::is_digit).is_err(),
            true
        );
        let mut tc = TrainCar::new("_24".chars());
        assert_eq!(
            VhdlToken::consume_value_pattern(&mut tc, None, &char_set::is_digit).is_err(),
            true
        );
    }

    #[test]
    fn lex_delimiters() {
        let cases = [
            ("<= x", Delimiter::SigAssign, " x"),
            ("<=>", Delimiter::SigAssoc, ""),
            ("?/= k", Delimiter::MatchNE, " k"),
            ("=<", Delimiter::Eq, "<"),
            ("**2", Delimiter::DoubleStar, "2"),
            (";", Delimiter::Terminator, ""),
        ];
        for (text, delim, rest) in cases {
            let mut tc = TrainCar::new(text.chars());
            let c0 = tc.consume().unwrap();
            assert_eq!(
                VhdlToken::collect_delimiter(&mut tc, c0),
                Ok(VhdlToken::Delimiter(delim))
            );
            assert_eq!(tc.peekable().clone().collect::<String>(), rest);
        }

        let mut tc = TrainCar::new("^".chars());
        let c0 = tc.consume().unwrap();
        assert_eq!(VhdlToken::collect_delimiter(&mut tc, c0).is_err(), true);
    }

    #[test]
    fn display_tokens() {
        assert_eq!(
            VhdlToken::StrLiteral("say \"hi\"".to_owned()).to_string(),
            "\"say \"\"hi\"\"\""
        );
        assert_eq!(VhdlToken::Keyword(Keyword::Package).to_string(), "package");
    }
}
