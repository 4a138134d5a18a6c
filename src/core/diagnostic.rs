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

use crate::core::lang::lexer::Position;
use colored::Colorize;
use serde_derive::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note => write!(f, "{}", "note".cyan()),
            Self::Warning => write!(f, "{}", "warning".yellow()),
            Self::Error => write!(f, "{}", "error".red()),
        }
    }
}

/// A problem found while analyzing the sources that does not stop the analysis.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            severity: severity,
            message: message,
            file: None,
            position: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: String) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: String) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn file(mut self, file: &PathBuf) -> Self {
        self.file = Some(file.clone());
        self
    }

    pub fn position(mut self, pos: &Position) -> Self {
        self.position = Some(pos.clone());
        self
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_message(&self) -> &str {
        &self.message
    }

    pub fn get_file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.severity)?;
        match (&self.file, &self.position) {
            (Some(file), Some(pos)) => write!(f, "{}{} ", file.display(), pos)?,
            (Some(file), None) => write!(f, "{} ", file.display())?,
            (None, Some(pos)) => write!(f, "{} ", pos)?,
            (None, None) => (),
        }
        write!(f, "{}", self.message)
    }
}

/// Counts the number of error diagnostics.
pub fn count_errors<'a, I>(diagnostics: I) -> usize
where
    I: IntoIterator<Item = &'a Diagnostic>,
{
    diagnostics.into_iter().filter(|d| d.is_error()).count()
}
