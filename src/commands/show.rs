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

use super::{find_unit, print_json, report, source_paths};
use crate::commands::helps::show;
use crate::core::context::Context;
use crate::core::elab::Elaborator;
use crate::core::lang::vhdl::symbols::declaration::Declaration;
use crate::core::lang::vhdl::symbols::{DesignUnit, SelectedName, UnitKind};
use crate::core::library::UnitIndex;
use colored::Colorize;
use serde_derive::Serialize;
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Show {
    path: Option<PathBuf>,
    unit: Option<SelectedName>,
    json: bool,
}

impl Subcommand<Context> for Show {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(show::HELP))?;
        Ok(Show {
            json: cli.check(Arg::flag("json"))?,
            unit: cli.get(Arg::option("unit").value("unit"))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let lib = c.load_library(&source_paths(&self.path))?;
        report(lib.get_diagnostics());
        let elab = Elaborator::new(&lib, c.get_config());

        match &self.unit {
            Some(name) => Self::describe(&elab, find_unit(&elab, name)?),
            None => {
                let listing = Self::list(&elab);
                match self.json {
                    true => print_json(&listing)?,
                    false => {
                        for entry in &listing {
                            println!(
                                "{:<16}{:<24}{}:{}",
                                entry.kind.to_string(),
                                entry.name,
                                entry.file.display(),
                                entry.line
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// A row of the unit listing.
#[derive(Debug, PartialEq, Serialize)]
struct Entry {
    name: String,
    kind: UnitKind,
    file: PathBuf,
    line: usize,
    dependencies: Vec<String>,
}

impl Show {
    fn list(elab: &Elaborator) -> Vec<Entry> {
        let lib = elab.get_library();
        (0..lib.len())
            .map(|i| {
                let unit = lib.get_unit(i);
                Entry {
                    name: unit.get_name().to_string(),
                    kind: unit.get_kind(),
                    file: lib.get_unit_file(i).clone(),
                    line: unit.get_position().line(),
                    dependencies: elab
                        .dependencies_of(i)
                        .into_iter()
                        .map(|d| lib.get_unit(d).to_string())
                        .collect(),
                }
            })
            .collect()
    }

    fn describe(elab: &Elaborator, index: UnitIndex) {
        let lib = elab.get_library();
        let unit = lib.get_unit(index);
        println!("{} {}", unit.get_kind().to_string().blue(), unit);
        println!("{}: {}", "location".bold(), lib.locate(index));

        let context = unit.get_context();
        if context.is_empty() == false {
            println!("\n{}:", "context".bold());
            for l in context.get_libraries() {
                println!("    library {}", l.get_name());
            }
            for u in context.get_uses() {
                println!("    use {}", u);
            }
            for r in context.get_contexts() {
                println!("    context {}", r);
            }
        }

        let none: &[Declaration] = &[];
        let (generics, decls, ports) = match unit {
            DesignUnit::Package(p) => (p.get_generics().as_slice(), p.get_decls().as_slice(), none),
            DesignUnit::PackageBody(b) => (none, b.get_decls().as_slice(), none),
            DesignUnit::Entity(e) => (e.get_generics().as_slice(), none, e.get_ports().as_slice()),
            _ => (none, none, none),
        };
        for (label, list) in [("generics", generics), ("ports", ports), ("declarations", decls)] {
            if list.is_empty() == false {
                println!("\n{}:", label.bold());
                for d in list {
                    match d.get_class() {
                        Some(class) => println!("    {} ({})", d, class),
                        None => println!("    {}", d),
                    }
                }
            }
        }

        let deps = elab.get_resolution().get_dependencies(index);
        if deps.is_empty() == false {
            println!("\n{}:", "dependencies".bold());
            for d in deps {
                println!(
                    "    {} ({} {})",
                    lib.get_unit(d.get_unit()),
                    d.get_kind(),
                    d.get_via()
                );
            }
        }
        let dependents = elab.dependents_of(index);
        if dependents.is_empty() == false {
            println!("\n{}:", "dependents".bold());
            for d in dependents {
                println!("    {}", lib.get_unit(d));
            }
        }
        let diagnostics = elab.get_resolution().get_diagnostics(index);
        if diagnostics.is_empty() == false {
            println!();
            report(diagnostics);
        }
    }
}
