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

//! Directives embedded in single-line comments.
//!
//! A pragma is a comment whose first non-blank character is `@`, followed by
//! a directive word and, for the elaboration directive, the name of the design
//! unit to elaborate: `-- @elab pkg_a`. Spacing around the `@` is not
//! significant, so `-- @ elab pkg_a` names the same pragma.

use super::error::VhdlError;
use super::symbols::SelectedName;
use super::token::{char_set, Comment, VhdlToken};
use crate::core::lang::lexer::{Position, Token};
use crate::util::strcmp;
use serde_derive::Serialize;
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_DIRECTIVE: &str = "elab";

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Pragma {
    directive: String,
    target: Option<SelectedName>,
    #[serde(skip)]
    pos: Position,
}

impl Pragma {
    pub fn new(directive: &str, target: Option<SelectedName>, pos: Position) -> Self {
        Self {
            directive: directive.to_string(),
            target: target,
            pos: pos,
        }
    }

    pub fn get_directive(&self) -> &str {
        &self.directive
    }

    /// The unit named by the pragma, only present for the configured directive.
    pub fn get_target(&self) -> Option<&SelectedName> {
        self.target.as_ref()
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    /// Interprets the text of a single-line comment located at `pos`.
    ///
    /// Returns `Ok(None)` for ordinary comments. Directives other than
    /// `directive` are returned without a target so the caller can report them.
    pub fn from_comment(
        text: &str,
        pos: &Position,
        directive: &str,
    ) -> Result<Option<Self>, VhdlError> {
        let rest = text.trim_start_matches(|c: char| char_set::is_separator(&c));
        let rest = match rest.strip_prefix(char_set::AT) {
            Some(r) => r.trim_start_matches(|c: char| char_set::is_separator(&c)),
            None => return Ok(None),
        };
        let word_len = rest
            .find(|c: char| !(char_set::is_letter_or_digit(&c) || c == char_set::UNDERLINE))
            .unwrap_or(rest.len());
        let (word, rest) = rest.split_at(word_len);
        if word.is_empty() == true {
            return Err(VhdlError::Expecting(
                pos.clone(),
                String::from("a directive after '@'"),
                format!("'{}'", rest.trim()),
            ));
        }
        if strcmp::cmp_ascii_ignore_case(word, directive) == false {
            return Ok(Some(Self::new(word, None, pos.clone())));
        }
        // the name must be separated from the directive
        if rest.is_empty() == false && rest.starts_with(|c: char| char_set::is_separator(&c)) == false
        {
            return Err(VhdlError::Expecting(
                pos.clone(),
                format!("whitespace after '@{}'", word),
                format!("'{}'", rest),
            ));
        }
        let name = rest.trim_matches(|c: char| char_set::is_separator(&c));
        if name.is_empty() == true {
            return Err(VhdlError::Expecting(
                pos.clone(),
                format!("a design unit name after '@{}'", word),
                String::from("nothing"),
            ));
        }
        if let Some(extra) = name.find(|c: char| char_set::is_separator(&c)) {
            return Err(VhdlError::Expecting(
                pos.clone(),
                String::from("end of pragma"),
                format!("'{}'", name[extra..].trim()),
            ));
        }
        match SelectedName::from_str(name) {
            Ok(target) => Ok(Some(Self::new(word, Some(target), pos.clone()))),
            Err(e) => Err(VhdlError::Expecting(
                pos.clone(),
                String::from("a design unit name"),
                format!("'{}' ({})", name, e),
            )),
        }
    }

    /// Collects every pragma written in the single-line comments of `tokens`.
    pub fn scan(tokens: &[Token<VhdlToken>], directive: &str) -> Vec<Result<Self, VhdlError>> {
        tokens
            .iter()
            .filter_map(|t| match t.as_type().as_comment() {
                Some(Comment::Single(note)) => {
                    Self::from_comment(note, t.locate(), directive).transpose()
                }
                _ => None,
            })
            .collect()
    }
}

impl Display for Pragma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(t) => write!(f, "@{} {}", self.directive, t),
            None => write!(f, "@{}", self.directive),
        }
    }
}
