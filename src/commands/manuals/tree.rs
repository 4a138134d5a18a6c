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
    tree - view the dependency tree of a unit

SYNOPSIS
    vhdelab tree [options] [<path>]

DESCRIPTION
    Shows each unit with the units it depends on as its branches. Without
    '--root', a tree is shown for every unit that no other unit depends on.

    A unit that appears again on its own branch is part of a dependency
    cycle and is not expanded a second time.

OPTIONS
    <path>
        A vhdl file or a directory to search for vhdl files.

    --root <unit>
        The unit to start the dependency tree from.

    --ascii
        Draw the tree with characters from the original 128 ascii set.

EXAMPLES
    vhdelab tree --root pkg_d
"#;
