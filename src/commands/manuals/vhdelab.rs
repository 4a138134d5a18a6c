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
    vhdelab - order the elaboration of vhdl design units

SYNOPSIS
    vhdelab [options] [command]

DESCRIPTION
    Vhdelab reads vhdl source files into a single working library, resolves
    the names each design unit makes visible through its context clause, and
    computes the order in which the units must be elaborated.

    A unit must be elaborated after every unit it depends on. A unit depends
    on the packages named by its use clauses, on the units named by expanded
    names such as 'work.pkg_a.K', and on the context declarations it
    references. A package body depends on its package, an architecture on
    its entity, and a package instantiation on its uninstantiated package.

    Source files may request an elaboration with an '@elab' pragma written
    inside a single-line comment. See 'vhdelab help pragma' for details.

COMMANDS
    order       print the elaboration order
    check       run every @elab pragma and report diagnostics
    tree        view the dependency tree of a unit
    show        list units or describe a single unit
    help        read in-depth documentation

TOPICS
    config      settings read from configuration files
    pragma      the '@elab' comment directive

EXAMPLES
    vhdelab order rtl/
    vhdelab --color never check
    vhdelab help pragma
"#;
