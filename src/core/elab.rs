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

use crate::core::config::Config;
use crate::core::diagnostic::Diagnostic;
use crate::core::lang::lexer::Position;
use crate::core::lang::vhdl::symbols::{SelectedName, UnitKind};
use crate::core::library::{Library, UnitIndex};
use crate::core::resolve::{self, DepKind, Resolution};
use crate::util::graph::{Graph, NodeIndex};
use serde_derive::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum ElabError {
    #[error("dependency cycle detected: {0}")]
    Cycle(String),
    #[error("unit '{0}' is not declared in library '{1}'")]
    UnknownTarget(String, String),
}

/// A unit in an elaboration order.
#[derive(Debug, PartialEq, Serialize)]
pub struct Step {
    name: String,
    kind: UnitKind,
    file: PathBuf,
}

impl Step {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_kind(&self) -> UnitKind {
        self.kind
    }

    pub fn get_file(&self) -> &PathBuf {
        &self.file
    }
}

/// The outcome of one `@elab` pragma.
#[derive(Debug, PartialEq, Serialize)]
pub struct PragmaReport {
    target: String,
    file: PathBuf,
    position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<Diagnostic>,
    steps: Vec<Step>,
    diagnostics: Vec<Diagnostic>,
}

impl PragmaReport {
    pub fn get_target(&self) -> &str {
        &self.target
    }

    pub fn get_file(&self) -> &PathBuf {
        &self.file
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Returns the plan of the pragma's target, which is empty if it could
    /// not be made.
    pub fn get_steps(&self) -> &Vec<Step> {
        &self.steps
    }

    /// Returns the reason the target could not be planned.
    pub fn get_failure(&self) -> Option<&Diagnostic> {
        self.failure.as_ref()
    }

    /// Returns the diagnostics of the units in the plan.
    pub fn get_diagnostics(&self) -> &Vec<Diagnostic> {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.failure.is_some() || self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// The dependency graph of a library's units.
///
/// Node `i` is unit `i` of the library and every edge points from a
/// dependency to its dependent.
pub struct Elaborator<'a> {
    lib: &'a Library,
    res: Resolution,
    graph: Graph<UnitIndex, DepKind>,
}

impl<'a> Elaborator<'a> {
    /// Resolves the library's units and builds their dependency graph.
    pub fn new(lib: &'a Library, config: &Config) -> Self {
        Self::from_resolution(lib, resolve::resolve(lib, config))
    }

    pub fn from_resolution(lib: &'a Library, res: Resolution) -> Self {
        let mut graph = Graph::new();
        for i in 0..lib.len() {
            graph.add_node(i);
        }
        for i in 0..lib.len() {
            for dep in res.get_dependencies(i) {
                // repeated dependencies keep the first edge
                graph.add_edge(dep.get_unit(), i, dep.get_kind());
            }
        }
        Self {
            lib: lib,
            res: res,
            graph: graph,
        }
    }

    pub fn get_library(&self) -> &Library {
        self.lib
    }

    pub fn get_resolution(&self) -> &Resolution {
        &self.res
    }

    pub fn get_graph(&self) -> &Graph<UnitIndex, DepKind> {
        &self.graph
    }

    /// Finds the unit named by `name`.
    pub fn find(&self, name: &SelectedName) -> Result<UnitIndex, ElabError> {
        self.lib.find(name).ok_or_else(|| {
            ElabError::UnknownTarget(name.to_string(), self.lib.get_name().to_string())
        })
    }

    /// Computes the order to elaborate every unit of the library.
    ///
    /// Units that do not depend on each other keep their source order.
    pub fn order(&self) -> Result<Vec<UnitIndex>, ElabError> {
        self.graph
            .topological_sort()
            .map_err(|cycle| self.cycle_error(&cycle))
    }

    /// Computes the minimal order to elaborate `target`.
    ///
    /// The order holds the target, everything it depends on, and the
    /// secondary units (package bodies and architectures) of those units
    /// along with their own dependencies.
    pub fn plan(&self, target: UnitIndex) -> Result<Vec<UnitIndex>, ElabError> {
        let mut needed = self.graph.ancestors(target);
        loop {
            let missing: Vec<NodeIndex> = needed
                .iter()
                .flat_map(|u| self.secondaries(*u))
                .filter(|s| needed.contains(s) == false)
                .collect();
            if missing.is_empty() == true {
                break;
            }
            for s in missing {
                needed.extend(self.graph.ancestors(s));
            }
        }
        self.graph
            .topological_sort_within(&needed)
            .map_err(|cycle| self.cycle_error(&cycle))
    }

    /// Returns the units that complete the primary unit `unit`.
    fn secondaries(&self, unit: UnitIndex) -> Vec<UnitIndex> {
        let u = self.lib.get_unit(unit);
        match u.get_kind() {
            UnitKind::Package => self.lib.find_body(u.get_name()).into_iter().collect(),
            UnitKind::Entity => self.lib.architectures_of(u.get_name()).to_vec(),
            _ => Vec::new(),
        }
    }

    fn cycle_error(&self, cycle: &[NodeIndex]) -> ElabError {
        let names: Vec<String> = cycle
            .iter()
            .map(|i| self.lib.get_unit(*i).to_string())
            .collect();
        ElabError::Cycle(names.join(" -> "))
    }

    /// Describes the units of an order.
    pub fn steps(&self, order: &[UnitIndex]) -> Vec<Step> {
        order
            .iter()
            .map(|i| {
                let unit = self.lib.get_unit(*i);
                Step {
                    name: unit.get_name().to_string(),
                    kind: unit.get_kind(),
                    file: self.lib.get_unit_file(*i).clone(),
                }
            })
            .collect()
    }

    /// Collects the diagnostics of every unit in `order`.
    pub fn diagnostics_of(&self, order: &[UnitIndex]) -> Vec<Diagnostic> {
        order
            .iter()
            .flat_map(|i| self.res.get_diagnostics(*i).iter().cloned())
            .collect()
    }

    /// Plans the target of every `@elab` pragma in the library, in the order
    /// the pragmas are written.
    pub fn run_pragmas(&self) -> Vec<PragmaReport> {
        let mut reports = Vec::new();
        for (file, pragma) in self.lib.get_pragmas() {
            let target = match pragma.get_target() {
                Some(t) => t,
                None => continue,
            };
            let file = self.lib.get_files()[*file].clone();
            let result = self.find(target).and_then(|t| self.plan(t));
            let (steps, diagnostics, failure) = match result {
                Ok(order) => (self.steps(&order), self.diagnostics_of(&order), None),
                Err(e) => (
                    Vec::new(),
                    Vec::new(),
                    Some(
                        Diagnostic::error(e.to_string())
                            .file(&file)
                            .position(pragma.get_position()),
                    ),
                ),
            };
            reports.push(PragmaReport {
                target: target.to_string(),
                file: file,
                position: pragma.get_position().clone(),
                failure: failure,
                steps: steps,
                diagnostics: diagnostics,
            });
        }
        reports
    }

    /// Lists the units no other unit depends on.
    pub fn find_roots(&self) -> Vec<UnitIndex> {
        self.graph.find_roots()
    }

    /// Collects the units `unit` directly depends on, in source order.
    pub fn dependencies_of(&self, unit: UnitIndex) -> Vec<UnitIndex> {
        let mut deps: Vec<UnitIndex> = self.graph.predecessors(unit).collect();
        deps.sort();
        deps
    }

    /// Collects the units that directly depend on `unit`, in source order.
    pub fn dependents_of(&self, unit: UnitIndex) -> Vec<UnitIndex> {
        let set: HashSet<UnitIndex> = self.graph.successors(unit).collect();
        let mut deps: Vec<UnitIndex> = set.into_iter().collect();
        deps.sort();
        deps
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn library(text: &str) -> Library {
        let mut lib = Library::new("work").unwrap();
        lib.add_source(&PathBuf::from("t.vhd"), text, "elab");
        lib.link()
    }

    fn names(elab: &Elaborator, order: &[UnitIndex]) -> Vec<String> {
        order
            .iter()
            .map(|i| elab.get_library().get_unit(*i).to_string())
            .collect()
    }

    const CHAIN: &str = r#"use work.pkg_b.all;
package pkg_c is
    constant X : BYTE := 1;
end package;
package pkg_b is
    subtype BYTE is integer range 0 to 255;
    constant K : BYTE;
end package;
package body pkg_b is
    constant K : BYTE := work.pkg_a.ONE;
end package body;
package pkg_a is
    constant ONE : integer := 1;
end package;
package other is
end package;
"#;

    #[test]
    fn order_follows_dependencies() {
        let lib = library(CHAIN);
        let elab = Elaborator::new(&lib, &Config::new());
        let order = elab.order().unwrap();
        assert_eq!(
            names(&elab, &order),
            vec!["pkg_b", "pkg_c", "pkg_a", "pkg_b (body)", "other"]
        );
        assert_eq!(elab.find_roots(), vec![0, 2, 4]);
        assert_eq!(elab.dependencies_of(2), vec![1, 3]);
        assert_eq!(elab.dependents_of(1), vec![0, 2]);
    }

    #[test]
    fn plan_includes_bodies() {
        let lib = library(CHAIN);
        let elab = Elaborator::new(&lib, &Config::new());
        let target = elab.find(&SelectedName::from_str("work.pkg_c").unwrap()).unwrap();
        let plan = elab.plan(target).unwrap();
        assert_eq!(names(&elab, &plan), vec!["pkg_b", "pkg_c", "pkg_a", "pkg_b (body)"]);
        assert_eq!(elab.plan(3).unwrap(), vec![3]);
        assert_eq!(
            elab.find(&SelectedName::from_str("nothing").unwrap()),
            Err(ElabError::UnknownTarget(String::from("nothing"), String::from("work")))
        );
    }

    #[test]
    fn cycles_are_errors() {
        let lib = library(
            r#"use work.b.all;
package a is
    constant X : integer := Y;
end package;
use work.a.all;
package b is
    constant Y : integer := 1;
end package;
package c is
end package;"#,
        );
        let elab = Elaborator::new(&lib, &Config::new());
        assert_eq!(
            elab.order(),
            Err(ElabError::Cycle(String::from("a -> b -> a")))
        );
        // units outside of the cycle can still be planned
        assert_eq!(elab.plan(2), Ok(vec![2]));
    }

    #[test]
    fn run_pragmas() {
        let lib = library(
            r#"-- @elab pkg_b
package pkg_a is
    constant K : integer;
end package;
use work.pkg_a.K;
package pkg_b is
    constant J : integer := K;
end package;
-- @ elab missing
"#,
        );
        let elab = Elaborator::new(&lib, &Config::new());
        let reports = elab.run_pragmas();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].get_target(), "pkg_b");
        let steps: Vec<&str> = reports[0].get_steps().iter().map(|s| s.get_name()).collect();
        assert_eq!(steps, vec!["pkg_a", "pkg_b"]);
        // the deferred constant of pkg_a has no body
        assert_eq!(reports[0].get_diagnostics().len(), 1);
        assert_eq!(reports[0].has_errors(), false);
        assert_eq!(reports[1].get_steps().len(), 0);
        assert_eq!(reports[1].has_errors(), true);
        assert_eq!(
            reports[1].get_failure().map(|d| d.get_message()),
            Some("unit 'missing' is not declared in library 'work'")
        );
        assert_eq!(reports[1].get_position(), &Position::place(9, 1));

        let json = serde_json::to_string(&reports[0].get_steps()[0]).unwrap();
        assert_eq!(json, r#"{"name":"pkg_a","kind":"package","file":"t.vhd"}"#);
    }
}
