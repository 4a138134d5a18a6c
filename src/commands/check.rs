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

use super::{print_json, report, source_paths};
use crate::commands::helps::check;
use crate::core::context::Context;
use crate::core::diagnostic::{self, Diagnostic};
use crate::core::elab::{Elaborator, PragmaReport};
use crate::core::library::Library;
use crate::error::Error;
use colored::Colorize;
use serde_derive::Serialize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Check {
    path: Option<PathBuf>,
    json: bool,
    quiet: bool,
}

impl Subcommand<Context> for Check {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(check::HELP))?;
        Ok(Check {
            json: cli.check(Arg::flag("json"))?,
            quiet: cli.check(Arg::flag("quiet"))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let lib = c.load_library(&source_paths(&self.path))?;
        let elab = Elaborator::new(&lib, c.get_config());
        let reports = elab.run_pragmas();
        c.info(&format!("ran {} pragma(s)", reports.len()));

        let diagnostics = Self::collect(&lib, &elab, &reports);
        match self.json {
            true => print_json(&CheckOutput {
                reports: &reports,
                diagnostics: &diagnostics,
            })?,
            false => {
                report(&diagnostics);
                if self.quiet == false {
                    for r in &reports {
                        Self::display(r, c.get_config().get_directive());
                    }
                }
            }
        }
        match diagnostic::count_errors(&diagnostics) {
            0 => Ok(()),
            n => Err(Error::ErrorsFound(n))?,
        }
    }
}

/// The `--json` form of the check results.
#[derive(Serialize)]
struct CheckOutput<'a> {
    reports: &'a [PragmaReport],
    diagnostics: &'a [Diagnostic],
}

impl Check {
    /// Gathers every problem found, whether or not a pragma reaches its unit.
    fn collect(lib: &Library, elab: &Elaborator, reports: &[PragmaReport]) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = lib.get_diagnostics().clone();
        diagnostics.extend(elab.get_resolution().iter_diagnostics().cloned());
        diagnostics.extend(reports.iter().filter_map(|r| r.get_failure().cloned()));
        if let Err(e) = elab.order() {
            diagnostics.push(Diagnostic::error(e.to_string()));
        }
        diagnostics
    }

    fn display(report: &PragmaReport, directive: &str) {
        println!(
            "{} {} ({}{})",
            format!("@{}", directive).green(),
            report.get_target(),
            report.get_file().display(),
            report.get_position()
        );
        for (i, step) in report.get_steps().iter().enumerate() {
            println!("    {}. {} {}", i + 1, step.get_kind(), step.get_name());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::config::Config;

    #[test]
    fn json_output_keeps_every_diagnostic() {
        let mut lib = Library::new("work").unwrap();
        lib.add_source(
            &PathBuf::from("t.vhd"),
            r#"-- @elab a
use work.b.all;
package a is end package;
use work.a.all;
package b is end package;
use work.missing.all;
package c is end package;"#,
            "elab",
        );
        let lib = lib.link();
        let elab = Elaborator::new(&lib, &Config::new());
        let reports = elab.run_pragmas();
        let diagnostics = Check::collect(&lib, &elab, &reports);

        let json = serde_json::to_value(&CheckOutput {
            reports: &reports,
            diagnostics: &diagnostics,
        })
        .unwrap();
        assert_eq!(json["reports"].as_array().map(|r| r.len()), Some(1));
        let messages: Vec<&str> = json["diagnostics"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["message"].as_str())
            .collect();
        // the resolution error and the cycle are not part of the pragma report
        assert_eq!(
            messages.contains(&"'missing' is not declared in library 'work'"),
            true
        );
        assert_eq!(messages.iter().any(|m| m.contains("cycle")), true);
    }
}
