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

pub const HELP: &str = r#"View the dependency tree of a unit.

Usage:
    vhdelab tree [options] [<path>]

Args:
    <path>              vhdl file or directory to read (default: ".")

Options:
    --root <unit>       unit to start the dependency tree from
    --ascii             restrict tree chars to the original 128 ascii set

Use 'vhdelab help tree' to read more about the command.
"#;
