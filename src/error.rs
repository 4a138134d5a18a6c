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

use colored::Colorize;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("no vhdl source files were found{0}")]
    NoSourceFiles(Hint),
    #[error("no unit named '{0}' in library '{1}'{2}")]
    UnitNotFound(String, String, Hint),
    #[error("every unit is part of a dependency cycle{0}")]
    NoRootUnits(Hint),
    #[error("analysis found {0} error(s)")]
    ErrorsFound(usize),
    #[error("failed to elaborate: {0}")]
    ElaborationFailed(LastError),
    #[error("failed to write output: {0}")]
    OutputFailed(LastError),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    UnitsList,
    FilePatterns,
    TreeRoot,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::UnitsList => "use `vhdelab show` to see the list of units",
            Self::FilePatterns => {
                "directories are searched for files matching the \"general.patterns\" configuration"
            }
            Self::TreeRoot => "use the \"--root\" option to select a unit to start from",
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            Error::lowerize(message.to_string())
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lowerize() {
        assert_eq!(Error::lowerize(String::from("Expecting 'end'")), "expecting 'end'");
        assert_eq!(Error::lowerize(String::from("VHDL file")), "VHDL file");
        assert_eq!(Error::lowerize(String::new()), "");
    }

    #[test]
    fn hint_follows_message() {
        colored::control::set_override(false);
        let e = Error::UnitNotFound(String::from("top"), String::from("work"), Hint::UnitsList);
        assert_eq!(
            e.to_string(),
            "no unit named 'top' in library 'work'\n\nhint: use `vhdelab show` to see the list of units"
        );
    }
}
