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

// entry program
pub mod vhdelab;

// commands
mod check;
mod help;
mod order;
mod show;
mod tree;

// informational content for help about commands
mod helps;
mod manuals;

use crate::core::diagnostic::Diagnostic;
use crate::core::elab::Elaborator;
use crate::core::lang::vhdl::symbols::SelectedName;
use crate::core::library::UnitIndex;
use crate::error::{Error, Hint, LastError};
use crate::util::anyerror::Fault;
use serde::Serialize;
use std::path::PathBuf;

/// Returns the path to read sources from, which is the current directory
/// when none is given.
fn source_paths(path: &Option<PathBuf>) -> Vec<PathBuf> {
    match path {
        Some(p) => vec![p.clone()],
        None => vec![PathBuf::from(".")],
    }
}

/// Finds a unit named on the command-line.
fn find_unit(elab: &Elaborator, name: &SelectedName) -> Result<UnitIndex, Fault> {
    match elab.get_library().find(name) {
        Some(i) => Ok(i),
        None => Err(Error::UnitNotFound(
            name.to_string(),
            elab.get_library().get_name().to_string(),
            Hint::UnitsList,
        ))?,
    }
}

/// Writes every diagnostic to stderr.
fn report<'a, I>(diagnostics: I)
where
    I: IntoIterator<Item = &'a Diagnostic>,
{
    for d in diagnostics {
        eprintln!("{}", d);
    }
}

/// Prints `value` as pretty json.
fn print_json<T: Serialize>(value: &T) -> Result<(), Fault> {
    match serde_json::to_string_pretty(value) {
        Ok(s) => Ok(println!("{}", s)),
        Err(e) => Err(Error::OutputFailed(LastError(e.to_string())))?,
    }
}
