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

pub const HELP: &str = r#"Vhdelab orders the elaboration of vhdl design units.

Usage:
    vhdelab [options] [command]

Commands:
    order                 print the elaboration order
    check                 run every @elab pragma and report diagnostics
    tree                  view the dependency tree of a unit
    show                  list units or describe a single unit
    help                  read in-depth documentation

Options:
    --version             print version information and exit
    --config <file>       read settings from a configuration file
    --color <when>        coloring: auto, always, never
    --verbose             print progress information
    --help, -h            print help information

Use 'vhdelab help <command>' for more information about a command."#;
