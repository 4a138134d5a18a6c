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
    show - list units or describe a single unit

SYNOPSIS
    vhdelab show [options] [<path>]

DESCRIPTION
    Lists every unit of the working library with its kind and location.

    When '--unit' is given, describes that unit instead: its context clause,
    its declarations, the units it depends on and why, the units that depend
    on it, and the problems found in it.

OPTIONS
    <path>
        A vhdl file or a directory to search for vhdl files.

    --unit <unit>
        The unit to describe.

    --json
        Print the unit listing as json.

EXAMPLES
    vhdelab show
    vhdelab show --unit pkg_b.body
"#;
