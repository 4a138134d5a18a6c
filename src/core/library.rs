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

//! The working library: every design unit read from the source files.

use crate::core::diagnostic::Diagnostic;
use crate::core::lang::vhdl::error::VhdlError;
use crate::core::lang::vhdl::pragma::Pragma;
use crate::core::lang::vhdl::symbols::package::Package;
use crate::core::lang::vhdl::symbols::{DesignUnit, SelectedName, UnitKind, VhdlParser};
use crate::core::lang::vhdl::token::{Identifier, VhdlTokenizer};
use crate::util::anyerror::CodeFault;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub type UnitIndex = usize;

#[derive(Debug, PartialEq, Error)]
pub enum LibraryError {
    #[error("invalid library name '{0}': {1}")]
    InvalidName(String, String),
    #[error("duplicate {0} '{1}' (first declared at {2})")]
    DuplicateUnit(UnitKind, String, String),
    #[error("package body '{0}' has no package declaration")]
    OrphanBody(Identifier),
    #[error("{0} '{1}' refers to missing entity '{2}'")]
    MissingEntity(UnitKind, Identifier, Identifier),
}

/// A design unit and the index of the file it was read from.
#[derive(Debug, PartialEq)]
pub struct LibraryUnit {
    unit: DesignUnit,
    file: usize,
}

#[derive(Debug, PartialEq)]
pub struct Library {
    name: Identifier,
    files: Vec<PathBuf>,
    /// Units in source order (file order, then position).
    units: Vec<LibraryUnit>,
    primaries: HashMap<Identifier, UnitIndex>,
    bodies: HashMap<Identifier, UnitIndex>,
    architectures: HashMap<Identifier, Vec<UnitIndex>>,
    pragmas: Vec<(usize, Pragma)>,
    diagnostics: Vec<Diagnostic>,
}

impl Library {
    /// Creates an empty library named `name`.
    pub fn new(name: &str) -> Result<Self, LibraryError> {
        let name = Identifier::from_str(name)
            .map_err(|e| LibraryError::InvalidName(name.to_string(), e.to_string()))?;
        Ok(Self {
            name: name,
            files: Vec::new(),
            units: Vec::new(),
            primaries: HashMap::new(),
            bodies: HashMap::new(),
            architectures: HashMap::new(),
            pragmas: Vec::new(),
            diagnostics: Vec::new(),
        })
    }

    /// Reads the file at `path` and adds its design units.
    pub fn load(&mut self, path: &PathBuf, directive: &str) -> Result<usize, CodeFault> {
        let text = std::fs::read_to_string(path).map_err(|e| CodeFault(path.clone(), Box::new(e)))?;
        Ok(self.add_source(path, &text, directive))
    }

    /// Adds the design units and pragmas of the source code `text` read from `path`.
    ///
    /// Lexical and syntax errors are recorded as diagnostics. Only the units
    /// written before the first error are added. Returns the number of units
    /// added.
    pub fn add_source(&mut self, path: &PathBuf, text: &str, directive: &str) -> usize {
        let file = self.files.len();
        self.files.push(path.clone());

        let (tokens, lex_err) = VhdlTokenizer::read_until_error(text);
        if let Some(e) = &lex_err {
            self.report_syntax(file, e);
        }
        for pragma in Pragma::scan(&tokens, directive) {
            match pragma {
                Ok(p) => match p.get_target().is_some() {
                    true => self.pragmas.push((file, p)),
                    false => self.diagnostics.push(
                        Diagnostic::warning(format!(
                            "unknown pragma '@{}' is ignored",
                            p.get_directive()
                        ))
                        .file(path)
                        .position(p.get_position()),
                    ),
                },
                Err(e) => self.report_syntax(file, &e),
            }
        }
        let (units, parse_err) = VhdlParser::parse_units(tokens);
        match (&lex_err, parse_err) {
            // the unit cut short by the lexical error is already reported
            (Some(_), Some(VhdlError::UnexpectedEof(_, _))) => (),
            (_, Some(e)) => self.report_syntax(file, &e),
            (_, None) => (),
        }
        let mut count = 0;
        for unit in units {
            if self.add_unit(file, unit) == true {
                count += 1;
            }
        }
        count
    }

    fn report_syntax(&mut self, file: usize, e: &VhdlError) {
        let mut d = Diagnostic::error(e.describe()).file(&self.files[file]);
        if let Some(pos) = e.locate() {
            d = d.position(pos);
        }
        self.diagnostics.push(d);
    }

    /// Stores a unit under its name. A unit whose name is already taken is
    /// reported and dropped.
    fn add_unit(&mut self, file: usize, unit: DesignUnit) -> bool {
        let index = self.units.len();
        let existing = match &unit {
            DesignUnit::PackageBody(b) => self.find_body(b.get_name()),
            DesignUnit::Architecture(a) => self
                .architectures_of(a.get_entity())
                .iter()
                .find(|i| self.units[**i].unit.get_name() == a.get_name())
                .copied(),
            _ => self.find_primary(unit.get_name()),
        };
        if let Some(prev) = existing {
            let name = match &unit {
                DesignUnit::PackageBody(b) => b.get_name().to_string(),
                _ => unit.to_string(),
            };
            let e = LibraryError::DuplicateUnit(
                unit.get_kind(),
                name,
                self.locate(prev),
            );
            self.diagnostics.push(
                Diagnostic::error(e.to_string())
                    .file(&self.files[file])
                    .position(unit.get_position()),
            );
            return false;
        }
        match &unit {
            DesignUnit::PackageBody(b) => {
                self.bodies.insert(b.get_name().clone(), index);
            }
            DesignUnit::Architecture(a) => self
                .architectures
                .entry(a.get_entity().clone())
                .or_insert_with(Vec::new)
                .push(index),
            _ => {
                self.primaries.insert(unit.get_name().clone(), index);
            }
        }
        self.units.push(LibraryUnit {
            unit: unit,
            file: file,
        });
        true
    }

    /// Verifies every secondary unit has its primary unit, once all files are added.
    pub fn link(mut self) -> Self {
        let mut problems = Vec::new();
        for (i, lu) in self.units.iter().enumerate() {
            let err = match &lu.unit {
                DesignUnit::PackageBody(b) => match self.find_package(b.get_name()) {
                    Some(_) => None,
                    None => Some(LibraryError::OrphanBody(b.get_name().clone())),
                },
                DesignUnit::Architecture(_) | DesignUnit::Configuration(_) => {
                    match lu.unit.get_owner() {
                        Some(entity) => match self
                            .find_primary(entity)
                            .map(|e| self.units[e].unit.get_kind())
                        {
                            Some(UnitKind::Entity) => None,
                            _ => Some(LibraryError::MissingEntity(
                                lu.unit.get_kind(),
                                lu.unit.get_name().clone(),
                                entity.clone(),
                            )),
                        },
                        None => None,
                    }
                }
                _ => None,
            };
            if let Some(e) = err {
                problems.push((i, e));
            }
        }
        for (i, e) in problems {
            let d = Diagnostic::error(e.to_string())
                .file(&self.files[self.units[i].file])
                .position(self.units[i].unit.get_position());
            self.diagnostics.push(d);
        }
        self
    }

    /// Formats where unit `index` is written as `<file>:<line>:<col>`.
    pub fn locate(&self, index: UnitIndex) -> String {
        let lu = &self.units[index];
        format!("{}{}", self.files[lu.file].display(), lu.unit.get_position())
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_files(&self) -> &Vec<PathBuf> {
        &self.files
    }

    pub fn get_unit(&self, index: UnitIndex) -> &DesignUnit {
        &self.units[index].unit
    }

    /// Returns the path of the file unit `index` was read from.
    pub fn get_unit_file(&self, index: UnitIndex) -> &PathBuf {
        &self.files[self.units[index].file]
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn find_primary(&self, name: &Identifier) -> Option<UnitIndex> {
        self.primaries.get(name).copied()
    }

    pub fn find_package(&self, name: &Identifier) -> Option<&Package> {
        self.find_primary(name)
            .and_then(|i| self.units[i].unit.as_package())
    }

    pub fn find_body(&self, name: &Identifier) -> Option<UnitIndex> {
        self.bodies.get(name).copied()
    }

    pub fn architectures_of(&self, entity: &Identifier) -> &[UnitIndex] {
        match self.architectures.get(entity) {
            Some(v) => v.as_slice(),
            None => &[],
        }
    }

    /// Finds the unit named by `name`: a primary unit (`pkg_a`, `work.pkg_a`),
    /// a package body (`pkg_a.body`), or an architecture (`top.rtl`).
    pub fn find(&self, name: &SelectedName) -> Option<UnitIndex> {
        let is_work = name.first() == &self.name || name.first() == &Identifier::new_working();
        let parts = match is_work && name.len() > 1 {
            true => &name.parts()[1..],
            false => name.parts(),
        };
        match parts {
            [unit] => self.find_primary(unit),
            [unit, second] => {
                if second == &Identifier::Basic(String::from("body")) {
                    if let Some(b) = self.find_body(unit) {
                        return Some(b);
                    }
                }
                self.architectures_of(unit)
                    .iter()
                    .find(|i| self.units[**i].unit.get_name() == second)
                    .copied()
            }
            _ => None,
        }
    }

    /// Returns every `@<directive> <name>` pragma with the index of its file.
    pub fn get_pragmas(&self) -> &Vec<(usize, Pragma)> {
        &self.pragmas
    }

    /// Returns the problems found while reading and linking the sources.
    pub fn get_diagnostics(&self) -> &Vec<Diagnostic> {
        &self.diagnostics
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn library(sources: &[(&str, &str)]) -> Library {
        let mut lib = Library::new("work").unwrap();
        for (path, text) in sources {
            lib.add_source(&PathBuf::from(path), text, "elab");
        }
        lib.link()
    }

    fn messages(lib: &Library) -> Vec<String> {
        colored::control::set_override(false);
        lib.get_diagnostics().iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn units_in_source_order() {
        let lib = library(&[
            ("a.vhd", "package pkg_b is end package;\npackage body pkg_b is end;"),
            ("b.vhd", "-- @elab pkg_a\npackage pkg_a is end package;"),
        ]);
        assert_eq!(lib.len(), 3);
        assert_eq!(lib.get_unit(1).get_kind(), UnitKind::PackageBody);
        assert_eq!(lib.find_primary(&Identifier::from_str("PKG_A").unwrap()), Some(2));
        assert_eq!(lib.find_body(&Identifier::from_str("pkg_b").unwrap()), Some(1));
        assert_eq!(lib.get_unit_file(2), &PathBuf::from("b.vhd"));
        assert_eq!(lib.get_pragmas().len(), 1);
        assert_eq!(lib.get_pragmas()[0].0, 1);
        assert_eq!(lib.get_diagnostics().len(), 0);
    }

    #[test]
    fn find_by_selected_name() {
        let lib = library(&[(
            "a.vhd",
            "package p is end;\npackage body p is end;\nentity top is end;\narchitecture rtl of top is begin end;",
        )]);
        let find = |s: &str| lib.find(&SelectedName::from_str(s).unwrap());
        assert_eq!(find("p"), Some(0));
        assert_eq!(find("work.p"), Some(0));
        assert_eq!(find("p.body"), Some(1));
        assert_eq!(find("top.rtl"), Some(3));
        assert_eq!(find("work.top.rtl"), Some(3));
        assert_eq!(find("other.p"), None);
        assert_eq!(find("missing"), None);
    }

    #[test]
    fn duplicates_and_orphans() {
        let lib = library(&[
            ("a.vhd", "package p is end;"),
            (
                "b.vhd",
                "package p is end;\npackage body q is end;\narchitecture rtl of nobody is begin end;",
            ),
        ]);
        assert_eq!(lib.len(), 3);
        assert_eq!(
            messages(&lib),
            vec![
                "error: b.vhd:1:1 duplicate package 'p' (first declared at a.vhd:1:1)",
                "error: b.vhd:2:1 package body 'q' has no package declaration",
                "error: b.vhd:3:1 architecture 'rtl' refers to missing entity 'nobody'",
            ]
        );
    }

    #[test]
    fn syntax_errors_are_diagnostics() {
        let lib = library(&[
            ("bad.vhd", "package p is\n    constant K : BYTE\nend package;"),
            ("good.vhd", "package q is end;"),
            ("pragma.vhd", "-- @elab\n-- @other thing\npackage r is end;"),
        ]);
        assert_eq!(lib.len(), 2);
        assert_eq!(
            messages(&lib),
            vec![
                "error: bad.vhd:3:13 unexpected end of file while expecting 'end'",
                "error: pragma.vhd:1:1 expecting a design unit name after '@elab' but found nothing",
                "warning: pragma.vhd:2:1 unknown pragma '@other' is ignored",
            ]
        );
    }

    #[test]
    fn units_before_an_error_are_kept() {
        let lib = library(&[
            (
                "syntax.vhd",
                "package a is end package;\npackage b is\n    constant K BYTE;\nend package;",
            ),
            (
                "lexical.vhd",
                "package c is end package;\npackage d is\n    constant K : integer := 17#1#;\nend package;",
            ),
        ]);
        let names: Vec<String> = (0..lib.len()).map(|i| lib.get_unit(i).to_string()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(
            messages(&lib),
            vec![
                "error: syntax.vhd:3:5 expecting ':' in object declaration but found ';'",
                "error: lexical.vhd:3:30 based literal must have base of at least 2 and at most 16",
            ]
        );
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = Library::new("work").unwrap();
        let err = lib.load(&dir.path().join("none.vhd"), "elab").unwrap_err();
        assert_eq!(&err.0, &dir.path().join("none.vhd"));
    }
}
