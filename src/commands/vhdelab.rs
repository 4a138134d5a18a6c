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

use crate::commands::check::Check;
use crate::commands::help::Help as HelpCommand;
use crate::commands::helps::vhdelab;
use crate::commands::order::Order;
use crate::commands::show::Show;
use crate::commands::tree::Tree;
use crate::core::context::Context;
use crate::util::anyerror::AnyError;
use std::path::PathBuf;
use std::str::FromStr;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq)]
enum ColorMode {
    Always,
    Never,
    Auto,
}

impl FromStr for ColorMode {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            _ => Err(AnyError(format!(
                "color mode must be 'auto', 'always', or 'never'"
            ))),
        }
    }
}

impl ColorMode {
    fn apply(&self) {
        match self {
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
            Self::Auto => colored::control::unset_override(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Vhdelab {
    version: bool,
    verbose: bool,
    color: Option<ColorMode>,
    config: Option<PathBuf>,
    command: Option<VhdelabSubcommand>,
}

impl Command for Vhdelab {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(vhdelab::HELP))?;
        Ok(Vhdelab {
            version: cli.check(Arg::flag("version"))?,
            verbose: cli.check(Arg::flag("verbose"))?,
            color: cli.get(Arg::option("color").value("when"))?,
            config: cli.get(Arg::option("config").value("file"))?,
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // need to set this coloring mode ASAP
        if let Some(mode) = &self.color {
            mode.apply();
        }
        // prioritize version information
        if self.version == true {
            println!("vhdelab {}", VERSION);
            return Ok(());
        }
        match self.command {
            Some(command) => {
                let context = Context::new()
                    .verbose(self.verbose)
                    .configs(self.config.as_ref())?;
                command.execute(&context)
            }
            None => {
                println!("{}", vhdelab::HELP);
                Ok(())
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum VhdelabSubcommand {
    Order(Order),
    Check(Check),
    Tree(Tree),
    Show(Show),
    Help(HelpCommand),
}

impl Subcommand<Context> for VhdelabSubcommand {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli
            .select(&["order", "check", "tree", "show", "help"])?
            .as_ref()
        {
            "order" => Ok(Self::Order(Order::interpret(cli)?)),
            "check" => Ok(Self::Check(Check::interpret(cli)?)),
            "tree" => Ok(Self::Tree(Tree::interpret(cli)?)),
            "show" => Ok(Self::Show(Show::interpret(cli)?)),
            "help" => Ok(Self::Help(HelpCommand::interpret(cli)?)),
            _ => panic!("an unimplemented command was passed through!"),
        }
    }

    fn execute(self, context: &Context) -> proc::Result {
        match self {
            Self::Order(c) => c.execute(context),
            Self::Check(c) => c.execute(context),
            Self::Tree(c) => c.execute(context),
            Self::Show(c) => c.execute(context),
            Self::Help(c) => c.execute(context),
        }
    }
}
