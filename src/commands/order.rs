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
use crate::commands::helps::order;
use crate::core::context::Context;
use crate::core::elab::Elaborator;
use crate::core::lang::vhdl::symbols::SelectedName;
use crate::error::{Error, LastError};
use std::path::PathBuf;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Order {
    path: Option<PathBuf>,
    top: Option<SelectedName>,
    json: bool,
}

impl Subcommand<Context> for Order {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(order::HELP))?;
        Ok(Order {
            // flags
            json: cli.check(Arg::flag("json"))?,
            // options
            top: cli.get(Arg::option("top").value("unit"))?,
            // positionals
            path: cli.get(Arg::positional("path"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let lib = c.load_library(&source_paths(&self.path))?;
        report(lib.get_diagnostics());

        let elab = Elaborator::new(&lib, c.get_config());
        let result = match &self.top {
            Some(name) => elab.plan(find_unit(&elab, name)?),
            None => elab.order(),
        };
        let order = match result {
            Ok(o) => o,
            Err(e) => return Err(Error::ElaborationFailed(LastError(e.to_string())))?,
        };
        c.info(&format!("ordered {} of {} unit(s)", order.len(), lib.len()));

        let steps = elab.steps(&order);
        match self.json {
            true => print_json(&steps)?,
            false => {
                for (i, step) in order.iter().zip(steps.iter()) {
                    println!("{}\t{}", lib.get_unit(*i), step.get_file().display());
                }
            }
        }
        Ok(())
    }
}
