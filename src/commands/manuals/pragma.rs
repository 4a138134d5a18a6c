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
    pragma - the '@elab' comment directive

DESCRIPTION
    A pragma is a single-line comment whose text starts with '@':

        -- @elab pkg_a
        -- @ elab work.pkg_b

    Whitespace between '@' and the directive is allowed. The directive is
    matched without regard to case. It must be followed by the name of one
    unit and nothing else. Comments that do not start with '@' are ordinary
    comments.

    Running 'vhdelab check' plans the elaboration of every pragma's unit.
    A pragma with a different directive is reported as a warning and
    ignored. A pragma missing its unit name, or with text after the name, is
    an error.
"#;
