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
    order - print the elaboration order

SYNOPSIS
    vhdelab order [options] [<path>]

DESCRIPTION
    Prints every unit of the working library in an order where each unit
    comes after the units it depends on. Units that do not depend on each
    other keep the order they are written in: first by file, then by their
    position within the file.

    When '--top' is given, only the units needed to elaborate that unit are
    printed. These are the unit itself, everything it depends on, and the
    package bodies and architectures of those units along with what they
    depend on.

    A dependency cycle stops the command with an error naming the cycle.

OPTIONS
    <path>
        A vhdl file or a directory to search for vhdl files. Directories are
        searched recursively, skipping files excluded by ignore files.

    --top <unit>
        The unit to order for. A package body is named 'pkg.body' and an
        architecture is named 'entity.architecture'.

    --json
        Print the order as a json list of units.

EXAMPLES
    vhdelab order
    vhdelab order src --top work.pkg_d
"#;
