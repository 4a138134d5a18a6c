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
    config - settings read from configuration files

DESCRIPTION
    Settings are read from up to three toml files. A value set in an earlier
    file is never overridden by a later one:

        1. the file given with '--config'
        2. 'vhdelab.toml' in the current directory
        3. '$HOME/.vhdelab/config.toml'

    Unknown keys are errors.

KEYS
    [general]
    library = "work"
        The name of the working library. The name 'work' always refers to
        the working library as well.

    patterns = ["*.vhd", "*.vhdl"]
        The files to read when searching a directory.

    [pragma]
    directive = "elab"
        The word following '@' in a pragma comment.

    [check]
    deferred-constants = "warn"
        How to treat a deferred constant whose package has no body:
        'allow', 'warn', or 'error'.

    unused-imports = true
        Warn about use clauses importing a single name that is never used.
"#;
