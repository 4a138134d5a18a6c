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

use super::{find_unit, report, source_paths};
use crate::commands::helps::tree;
use crate::core::context::Context;
use crate::core::elab::Elaborator;
use crate::core::lang::vhdl::symbols::SelectedName;
use crate::error::{Error, Hint};
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Tree {
    path: Option<PathBuf>,
    root: Option<SelectedName>,
    ascii: bool,
}

impl Subcommand<Context> for Tree {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(tree::HELP))?;
        Ok(Tree {
            ascii: cli.check(Arg::flag("ascii"))?,
            root: cli.get(Arg::option("root").value("unit"))?,
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let lib = c.load_library(&source_paths(&self.path))?;
        report(lib.get_diagnostics());
        let elab = Elaborator::new(&lib, c.get_config());

        let roots = match &self.root {
            Some(name) => vec![find_unit(&elab, name)?],
            None => elab.find_roots(),
        };
        if roots.is_empty() == true {
            return Err(Error::NoRootUnits(Hint::TreeRoot))?;
        }
        for (i, n) in roots.iter().enumerate() {
            if i > 0 {
                println!();
            }
            self.display(&elab, *n);
        }
        Ok(())
    }
}

impl Tree {
    fn display(&self, elab: &Elaborator, root: usize) {
        let lib = elab.get_library();
        let graph = elab.get_graph();
        for (twig, n) in graph.treeview(root) {
            let unit = match graph.get_node(n) {
                Some(u) => *u,
                None => continue,
            };
            let branch = match self.ascii {
                true => twig.to_ascii(),
                false => twig.to_string(),
            };
            println!("{}{}", branch, lib.get_unit(unit));
        }
    }
}
