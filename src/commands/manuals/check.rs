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

pub const MANUAL: &str = r#"NAME
    check - run every @elab pragma and report diagnostics

SYNOPSIS
    vhdelab check [options] [<path>]

DESCRIPTION
    Reads the sources, reports every problem found along the way, and plans
    the elaboration requested by each '@elab' pragma.

    Problems are reported as errors or warnings. Errors include syntax
    errors, duplicate units, names that are not visible, ambiguous names,
    package bodies that do not complete a deferred constant, and pragmas
    naming a unit that does not exist. Warnings include unused imports and
    deferred constants of packages without a body.

    The command fails when any error is found.

OPTIONS
    <path>
        A vhdl file or a directory to search for vhdl files.

    --json
        Print the pragma reports as json.

    --quiet
        Only print diagnostics.

EXAMPLES
    vhdelab check
    vhdelab check tests/data/packages.vhd --json
"#;
