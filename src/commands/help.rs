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

use crate::commands::helps::help;
use crate::commands::manuals;
use crate::core::context::Context;
use crate::util::anyerror::AnyError;

use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Subcommand};

#[derive(Debug, PartialEq)]
pub struct Help {
    list: bool,
    topic: Option<Topic>,
}

impl Subcommand<Context> for Help {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(cliproc::Help::with(help::HELP))?;
        Ok(Help {
            list: cli.check(Arg::flag("list"))?,
            topic: cli.get(Arg::positional("topic"))?,
        })
    }

    fn execute(self, _: &Context) -> proc::Result {
        self.run()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Topic {
    Order,
    Check,
    Tree,
    Show,
    Config,
    Pragma,
}

impl Topic {
    fn list_all() -> String {
        let list = ["order", "check", "tree", "show", "config", "pragma"];
        list.into_iter().fold(String::new(), |mut acc, x| {
            acc.push_str(&format!("{}\n", x));
            acc
        })
    }
}

impl std::str::FromStr for Topic {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "order" => Self::Order,
            "check" => Self::Check,
            "tree" => Self::Tree,
            "show" => Self::Show,
            "config" => Self::Config,
            "pragma" | "elab" => Self::Pragma,
            _ => return Err(AnyError(format!("topic '{}' not found", s))),
        })
    }
}

impl Topic {
    /// Transforms the variant to its corresponding manual page.
    fn as_manual(&self) -> &str {
        use Topic::*;
        match &self {
            Order => manuals::order::MANUAL,
            Check => manuals::check::MANUAL,
            Tree => manuals::tree::MANUAL,
            Show => manuals::show::MANUAL,
            Config => manuals::config::MANUAL,
            Pragma => manuals::pragma::MANUAL,
        }
    }
}

impl Help {
    fn run(&self) -> Result<(), AnyError> {
        if self.list == true {
            println!("{}", Topic::list_all());
        } else {
            let contents = match &self.topic {
                Some(t) => t.as_manual(),
                None => manuals::vhdelab::MANUAL,
            };
            println!("{}", contents);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn topics() {
        assert_eq!(Topic::from_str("pragma").unwrap(), Topic::Pragma);
        assert_eq!(Topic::from_str("elab").unwrap(), Topic::Pragma);
        assert_eq!(
            Topic::from_str("build").unwrap_err().to_string(),
            "topic 'build' not found"
        );
        assert_eq!(Topic::list_all().lines().count(), 6);
        assert!(Topic::Config.as_manual().contains("deferred-constants"));
    }
}
