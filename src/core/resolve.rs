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

//! Name visibility: turns each unit's context clause and referenced names
//! into dependencies on other units of the working library.

use crate::core::config::{Config, Level};
use crate::core::diagnostic::Diagnostic;
use crate::core::lang::lexer::Position;
use crate::core::lang::vhdl::symbols::declaration::{DeclKind, Declaration};
use crate::core::lang::vhdl::symbols::{
    ContextClause, DesignUnit, Reference, SelectedName, UnitKind, UseClause,
};
use crate::core::lang::vhdl::token::Identifier;
use crate::core::library::{Library, UnitIndex};
use serde_derive::Serialize;
use std::collections::HashSet;
use std::fmt::Display;

/// The names declared by package `std.standard`, which are always visible.
const STANDARD: &[&str] = &[
    // types and subtypes
    "boolean", "bit", "character", "severity_level", "integer", "natural", "positive",
    "real", "time", "delay_length", "string", "boolean_vector", "bit_vector",
    "integer_vector", "real_vector", "time_vector", "file_open_kind", "file_open_status",
    "file_open_state", "file_origin_kind", "universal_integer", "universal_real",
    // enumeration literals
    "false", "true", "note", "warning", "error", "failure", "read_mode", "write_mode",
    "append_mode", "read_write_mode", "open_ok", "status_error", "name_error", "mode_error",
    "state_open", "state_closed", "file_origin_begin", "file_origin_current", "file_origin_end",
    // physical units of time
    "fs", "ps", "ns", "us", "ms", "sec", "min", "hr",
    // control characters
    "nul", "soh", "stx", "etx", "eot", "enq", "ack", "bel", "bs", "ht", "lf", "vt", "ff",
    "cr", "so", "si", "dle", "dc1", "dc2", "dc3", "dc4", "nak", "syn", "etb", "can", "em",
    "sub", "esc", "fsp", "gsp", "rsp", "usp", "del",
    // predefined subprograms
    "now", "minimum", "maximum", "to_string", "to_bstring", "to_ostring", "to_hstring",
    "rising_edge", "falling_edge", "deallocate", "file_open", "file_close", "read", "write",
    "endfile", "flush", "resize",
];

fn is_standard(name: &Identifier) -> bool {
    match name {
        Identifier::Basic(s) => {
            let lower = s.to_lowercase();
            if STANDARD.contains(&lower.as_str()) == true {
                return true;
            }
            // C128 to C159
            match lower.strip_prefix('c').map(|n| n.parse::<u16>()) {
                Some(Ok(n)) => n >= 128 && n <= 159 && lower.len() == 4,
                _ => false,
            }
        }
        Identifier::Extended(_) => false,
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepKind {
    /// A use clause names the unit.
    Use,
    /// An expanded name (`work.pkg.item`) names the unit.
    Name,
    /// A secondary unit depends on its primary unit.
    Primary,
    /// A context reference names the context declaration.
    Context,
    /// A package instantiation names its uninstantiated package.
    Instance,
}

impl Display for DepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Use => "use",
            Self::Name => "name",
            Self::Primary => "primary",
            Self::Context => "context",
            Self::Instance => "instance",
        };
        write!(f, "{}", s)
    }
}

/// A unit's need for another unit to be elaborated first.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Dependency {
    unit: UnitIndex,
    kind: DepKind,
    /// The name that created the dependency.
    via: String,
    #[serde(skip)]
    pos: Position,
}

impl Dependency {
    pub fn new(unit: UnitIndex, kind: DepKind, via: String, pos: Position) -> Self {
        Self {
            unit: unit,
            kind: kind,
            via: via,
            pos: pos,
        }
    }

    /// Returns the index of the unit depended upon.
    pub fn get_unit(&self) -> UnitIndex {
        self.unit
    }

    pub fn get_kind(&self) -> DepKind {
        self.kind
    }

    pub fn get_via(&self) -> &str {
        &self.via
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }
}

/// The dependencies and diagnostics found for every unit of a library.
#[derive(Debug, PartialEq)]
pub struct Resolution {
    deps: Vec<Vec<Dependency>>,
    diagnostics: Vec<Vec<Diagnostic>>,
}

impl Resolution {
    pub fn get_dependencies(&self, unit: UnitIndex) -> &Vec<Dependency> {
        &self.deps[unit]
    }

    pub fn get_diagnostics(&self, unit: UnitIndex) -> &Vec<Diagnostic> {
        &self.diagnostics[unit]
    }

    /// Iterates over the diagnostics of every unit in source order.
    pub fn iter_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }
}

/// Identifies a use clause by the unit that wrote it and its place in that
/// unit's context clause.
type ClauseKey = (UnitIndex, usize);

/// A name imported by a use clause naming a single item.
struct Selected<'a> {
    name: Identifier,
    source: UnitIndex,
    decls: Vec<&'a Declaration>,
    key: Option<ClauseKey>,
}

/// Every declaration imported by a `.all` use clause.
struct AllImport<'a> {
    source: UnitIndex,
    label: String,
    items: Vec<&'a Declaration>,
}

/// The names made visible to a unit by its context.
#[derive(Default)]
struct Scope<'a> {
    libraries: Vec<Identifier>,
    prefixes: Vec<(Identifier, UnitIndex)>,
    selected: Vec<Selected<'a>>,
    all: Vec<AllImport<'a>>,
    external_names: Vec<Identifier>,
    external_prefixes: Vec<Identifier>,
    external_all: bool,
}

/// The findings for the unit being resolved.
struct Output {
    file: std::path::PathBuf,
    deps: Vec<Dependency>,
    diags: Vec<Diagnostic>,
}

impl Output {
    fn error(&mut self, msg: String, pos: &Position) {
        self.diags
            .push(Diagnostic::error(msg).file(&self.file).position(pos));
    }

    fn warning(&mut self, msg: String, pos: &Position) {
        self.diags
            .push(Diagnostic::warning(msg).file(&self.file).position(pos));
    }

    fn depend(&mut self, unit: UnitIndex, kind: DepKind, via: String, pos: &Position) {
        self.deps.push(Dependency::new(unit, kind, via, pos.clone()));
    }
}

pub struct Resolver<'a> {
    lib: &'a Library,
    config: &'a Config,
    /// Selected imports that can be reported as unused, with where they are written.
    imports: Vec<(ClauseKey, UseClause)>,
    used: HashSet<ClauseKey>,
}

impl<'a> Resolver<'a> {
    pub fn new(lib: &'a Library, config: &'a Config) -> Self {
        Self {
            lib: lib,
            config: config,
            imports: Vec::new(),
            used: HashSet::new(),
        }
    }

    /// Resolves every unit of the library.
    pub fn resolve(mut self) -> Resolution {
        let mut deps = Vec::with_capacity(self.lib.len());
        let mut diagnostics = Vec::with_capacity(self.lib.len());
        for i in 0..self.lib.len() {
            let mut out = Output {
                file: self.lib.get_unit_file(i).clone(),
                deps: Vec::new(),
                diags: Vec::new(),
            };
            self.resolve_unit(i, &mut out);
            // a unit never waits on itself
            out.deps.retain(|d| d.unit != i);
            deps.push(out.deps);
            diagnostics.push(out.diags);
        }
        if self.config.warn_unused_imports() == true {
            for ((owner, index), clause) in &self.imports {
                if self.used.contains(&(*owner, *index)) == false {
                    diagnostics[*owner].push(
                        Diagnostic::warning(format!("unused import '{}'", clause.get_name()))
                            .file(self.lib.get_unit_file(*owner))
                            .position(clause.get_position()),
                    );
                }
            }
        }
        Resolution {
            deps: deps,
            diagnostics: diagnostics,
        }
    }

    fn is_work(&self, id: &Identifier) -> bool {
        id == &Identifier::new_working() || id == self.lib.get_name()
    }

    fn resolve_unit(&mut self, index: UnitIndex, out: &mut Output) {
        let unit = self.lib.get_unit(index);
        let mut scope = Scope::default();
        scope.libraries.push(Identifier::Basic(String::from("std")));

        // secondary units see the context of their primary unit first
        if let Some(owner) = unit.get_owner() {
            if let Some(primary) = self.lib.find_primary(owner) {
                let kind = match unit.get_kind() {
                    UnitKind::PackageBody => UnitKind::Package,
                    _ => UnitKind::Entity,
                };
                if self.lib.get_unit(primary).get_kind() == kind {
                    out.depend(
                        primary,
                        DepKind::Primary,
                        owner.to_string(),
                        unit.get_position(),
                    );
                    if unit.get_kind() != UnitKind::Configuration {
                        let context = self.lib.get_unit(primary).get_context();
                        let mut visited = HashSet::new();
                        self.apply_context(&mut scope, primary, context, true, out, &mut visited);
                    }
                }
            }
        }
        let track = match unit.get_kind() {
            UnitKind::Package | UnitKind::PackageBody => true,
            _ => false,
        };
        let context = unit.get_context();
        self.apply_context(&mut scope, index, context, track, out, &mut HashSet::new());

        match unit {
            DesignUnit::Package(p) => {
                if let Some(target) = p.get_instance_of() {
                    self.resolve_instance(&mut scope, target, out);
                    for r in p.get_refs() {
                        self.lookup(&mut scope, index, &[], r, out);
                    }
                    return;
                }
                let mut locals: Vec<&Declaration> = Vec::new();
                self.resolve_decls(&mut scope, index, &mut locals, p.get_generics(), out);
                self.resolve_decls(&mut scope, index, &mut locals, p.get_decls(), out);
                for r in p.get_refs() {
                    self.lookup(&mut scope, index, &locals, r, out);
                }
                self.check_package_constants(index, out);
            }
            DesignUnit::PackageBody(b) => {
                let mut locals: Vec<&Declaration> = Vec::new();
                if let Some(pkg) = self.lib.find_package(b.get_name()) {
                    locals.extend(pkg.get_generics().iter());
                    locals.extend(pkg.get_decls().iter());
                }
                self.resolve_decls(&mut scope, index, &mut locals, b.get_decls(), out);
                for r in b.get_refs() {
                    self.lookup(&mut scope, index, &locals, r, out);
                }
                for d in b.get_decls() {
                    if d.get_kind() == &DeclKind::DeferredConstant {
                        out.error(
                            format!(
                                "deferred constant '{}' must be declared in a package declaration",
                                d.get_name()
                            ),
                            d.get_position(),
                        );
                    }
                }
                Self::check_local_constants(b.get_decls(), out);
            }
            DesignUnit::Context(c) => {
                let clause = c.get_clause();
                self.apply_context(&mut scope, index, clause, false, out, &mut HashSet::new());
            }
            _ => {
                // structural units only record names from the working library
                for r in unit.get_refs() {
                    if self.is_work(r.get_name().first()) == true {
                        self.lookup(&mut scope, index, &[], r, out);
                    }
                }
            }
        }
    }

    /// Resolves the references of `decls` in order, each one seeing the
    /// declarations before it (and itself).
    fn resolve_decls(
        &mut self,
        scope: &mut Scope<'a>,
        index: UnitIndex,
        locals: &mut Vec<&'a Declaration>,
        decls: &'a [Declaration],
        out: &mut Output,
    ) {
        for (i, d) in decls.iter().enumerate() {
            locals.push(d);
            // literals and units belong to the type written before them
            let mut j = i + 1;
            while let Some(next) = decls.get(j) {
                match next.get_kind() {
                    DeclKind::EnumLiteral | DeclKind::PhysicalUnit => locals.push(next),
                    _ => break,
                }
                j += 1;
            }
            for r in d.get_refs() {
                self.lookup(scope, index, locals.as_slice(), r, out);
            }
            self.mark_mentions(scope, locals.as_slice(), d);
            locals.truncate(locals.len() - (j - i - 1));
        }
    }

    /// Marks the selected imports named within the statements of `decl` (and
    /// its nested subprograms) as used.
    fn mark_mentions(&mut self, scope: &Scope<'a>, locals: &[&'a Declaration], decl: &Declaration) {
        for m in decl.get_mentions() {
            if locals.iter().any(|d| d.get_name() == m) == true {
                continue;
            }
            for s in scope.selected.iter().filter(|s| &s.name == m) {
                if let Some(k) = s.key {
                    self.used.insert(k);
                }
            }
        }
        for nested in decl.get_locals() {
            self.mark_mentions(scope, locals, nested);
        }
    }

    /// Adds the libraries, imports and context references of `context` to
    /// the scope.
    ///
    /// `owner` is the unit that wrote the clause. When `track` is set, its
    /// selected imports are checked for use.
    fn apply_context(
        &mut self,
        scope: &mut Scope<'a>,
        owner: UnitIndex,
        context: &'a ContextClause,
        track: bool,
        out: &mut Output,
        visited: &mut HashSet<UnitIndex>,
    ) {
        for lib in context.get_libraries() {
            scope.libraries.push(lib.get_name().clone());
        }
        for r in context.get_contexts() {
            let parts = r.get_name().parts();
            if self.is_work(&parts[0]) == false {
                if scope.libraries.contains(&parts[0]) == false {
                    out.error(
                        format!("library '{}' is not declared", parts[0]),
                        r.get_position(),
                    );
                }
                continue;
            }
            let found = match parts.len() {
                2 => self.lib.find_primary(&parts[1]),
                _ => None,
            };
            match found {
                Some(ctx) if self.lib.get_unit(ctx).get_kind() == UnitKind::Context => {
                    out.depend(ctx, DepKind::Context, r.get_name().to_string(), r.get_position());
                    if visited.insert(ctx) == true {
                        if let Some(c) = self.lib.get_unit(ctx).as_context() {
                            self.apply_context(scope, ctx, c.get_clause(), false, out, visited);
                        }
                    }
                }
                Some(_) => out.error(
                    format!("'{}' is not a context", r.get_name()),
                    r.get_position(),
                ),
                None => out.error(
                    format!("context '{}' is not declared", r.get_name()),
                    r.get_position(),
                ),
            }
        }
        for (i, u) in context.get_uses().iter().enumerate() {
            let key = match track {
                true => Some((owner, i)),
                false => None,
            };
            self.apply_use(scope, u, key, out);
        }
    }

    /// Makes the names of a single use clause visible.
    fn apply_use(
        &mut self,
        scope: &mut Scope<'a>,
        clause: &UseClause,
        key: Option<ClauseKey>,
        out: &mut Output,
    ) {
        let lib = self.lib;
        let parts = clause.get_name().parts();
        let pos = clause.get_position();
        let prefix = scope.prefixes.iter().find(|p| &p.0 == &parts[0]).map(|p| p.1);

        if self.is_work(&parts[0]) == false {
            if let Some(unit) = prefix {
                let name = lib.get_unit(unit).get_name();
                return self.apply_use_of(scope, clause, unit, name, &parts[1..], key, out);
            }
            if scope.libraries.contains(&parts[0]) == false {
                return out.error(format!("library '{}' is not declared", parts[0]), pos);
            }
            // external libraries are trusted
            match (parts.len(), clause.is_all()) {
                (1, false) => (),
                (1, true) | (2, false) => {
                    scope.external_prefixes.push(parts[parts.len() - 1].clone())
                }
                (_, true) => scope.external_all = true,
                (_, false) => scope.external_names.push(parts[parts.len() - 1].clone()),
            }
            return;
        }

        let pkg_name = match parts.get(1) {
            Some(p) => p,
            None => {
                // use work.all
                if clause.is_all() == true {
                    for lu in 0..lib.len() {
                        let u = lib.get_unit(lu);
                        if u.is_primary() == true {
                            scope.prefixes.push((u.get_name().clone(), lu));
                        }
                    }
                }
                return;
            }
        };
        let unit = match lib.find_primary(pkg_name) {
            Some(u) => u,
            None => {
                return out.error(
                    format!(
                        "'{}' is not declared in library '{}'",
                        pkg_name,
                        lib.get_name()
                    ),
                    pos,
                )
            }
        };
        self.apply_use_of(scope, clause, unit, pkg_name, &parts[2..], key, out)
    }

    /// Applies a use clause naming `unit` of the working library followed by
    /// the names `rest`.
    fn apply_use_of(
        &mut self,
        scope: &mut Scope<'a>,
        clause: &UseClause,
        unit: UnitIndex,
        unit_name: &Identifier,
        rest: &[Identifier],
        key: Option<ClauseKey>,
        out: &mut Output,
    ) {
        let pos = clause.get_position();
        let via = clause.to_string();
        if rest.is_empty() == true && clause.is_all() == false {
            // the unit becomes usable as a prefix
            out.depend(unit, DepKind::Use, via, pos);
            scope.prefixes.push((unit_name.clone(), unit));
            return;
        }
        if self.lib.get_unit(unit).get_kind() != UnitKind::Package {
            return out.error(format!("'{}' is not a package", unit_name), pos);
        }
        out.depend(unit, DepKind::Use, via, pos);
        // walk into nested packages
        let mut items = self.package_items(unit);
        let mut label = format!("{}.{}", self.lib.get_name(), unit_name);
        let (path, last) = match clause.is_all() {
            true => (rest, None),
            false => (&rest[..rest.len() - 1], rest.last()),
        };
        for step in path {
            let nested = items
                .iter()
                .copied()
                .find(|d| d.get_name() == step && d.get_kind() == &DeclKind::Package);
            match nested {
                Some(n) => items = n.get_locals().iter().collect(),
                None => return out.error(format!("'{}' is not a package", step), pos),
            }
            label = format!("{}.{}", label, step);
        }
        match last {
            None => scope.all.push(AllImport {
                source: unit,
                label: format!("{}.all", label),
                items: items,
            }),
            Some(item) => {
                let decls: Vec<&Declaration> = items
                    .into_iter()
                    .filter(|d| d.get_name() == item)
                    .collect();
                if decls.is_empty() == true {
                    return out.error(
                        format!("'{}' is not declared in package '{}'", item, label),
                        pos,
                    );
                }
                if let Some(k) = key {
                    if self.imports.iter().any(|(ik, _)| ik == &k) == false {
                        self.imports.push((k, clause.clone()));
                    }
                }
                scope.selected.push(Selected {
                    name: item.clone(),
                    source: unit,
                    decls: decls,
                    key: key,
                })
            }
        }
    }

    /// Collects the declarations a package makes available, following package
    /// instantiations to their uninstantiated package.
    fn package_items(&self, unit: UnitIndex) -> Vec<&'a Declaration> {
        let mut current = unit;
        let mut seen = HashSet::new();
        while seen.insert(current) == true {
            let pkg = match self.lib.get_unit(current).as_package() {
                Some(p) => p,
                None => return Vec::new(),
            };
            match pkg.get_instance_of() {
                Some(target) => match self.find_work_unit(target.get_name()) {
                    Some(next) => current = next,
                    None => return Vec::new(),
                },
                None => return pkg.get_decls().iter().collect(),
            }
        }
        Vec::new()
    }

    /// Finds the primary unit named `pkg` or `work.pkg`.
    fn find_work_unit(&self, name: &SelectedName) -> Option<UnitIndex> {
        match name.parts() {
            [unit] => self.lib.find_primary(unit),
            [lib, unit] if self.is_work(lib) => self.lib.find_primary(unit),
            _ => None,
        }
    }

    fn resolve_instance(&mut self, scope: &mut Scope<'a>, target: &Reference, out: &mut Output) {
        let name = target.get_name();
        let pos = target.get_position();
        let unit = match name.parts() {
            [unit] => scope
                .prefixes
                .iter()
                .find(|p| &p.0 == unit)
                .map(|p| p.1)
                .or_else(|| self.lib.find_primary(unit)),
            _ => self.find_work_unit(name),
        };
        match unit {
            Some(u) if self.lib.get_unit(u).get_kind() == UnitKind::Package => {
                out.depend(u, DepKind::Instance, name.to_string(), pos)
            }
            Some(_) => out.error(format!("'{}' is not a package", name), pos),
            None => {
                let external = scope.libraries.contains(name.first()) && self.is_work(name.first()) == false;
                if external == false {
                    out.error(format!("package '{}' is not declared", name), pos)
                }
            }
        }
    }

    /// Finds what a referenced name denotes, recording the dependency it
    /// creates or the error when nothing visible declares it.
    fn lookup(
        &mut self,
        scope: &mut Scope<'a>,
        index: UnitIndex,
        locals: &[&'a Declaration],
        r: &Reference,
        out: &mut Output,
    ) {
        let name = r.get_name();
        let first = name.first();
        let pos = r.get_position();

        // local declarations
        if locals.iter().any(|d| d.get_name() == first) == true {
            return;
        }
        // the unit's own name and its primary unit's name
        let unit = self.lib.get_unit(index);
        if unit.get_name() == first || unit.get_owner() == Some(first) {
            return;
        }
        // .all imports
        let providers: Vec<(&AllImport, Vec<&Declaration>)> = scope
            .all
            .iter()
            .filter_map(|a| {
                let found: Vec<&Declaration> = a
                    .items
                    .iter()
                    .filter(|d| d.get_name() == first)
                    .copied()
                    .collect();
                match found.is_empty() {
                    true => None,
                    false => Some((a, found)),
                }
            })
            .collect();
        // selected imports
        let candidates: Vec<&Selected> = scope
            .selected
            .iter()
            .filter(|s| &s.name == first)
            .collect();
        if candidates.is_empty() == false {
            let mut sources: Vec<String> = candidates
                .iter()
                .map(|s| {
                    format!(
                        "'{}.{}.{}'",
                        self.lib.get_name(),
                        self.lib.get_unit(s.source).get_name(),
                        s.name
                    )
                })
                .collect();
            let mut distinct: HashSet<UnitIndex> = candidates.iter().map(|s| s.source).collect();
            // homographs from a different package hide each other too
            let others: Vec<&(&AllImport, Vec<&Declaration>)> = providers
                .iter()
                .filter(|(a, _)| distinct.contains(&a.source) == false)
                .collect();
            sources.extend(others.iter().map(|(a, _)| format!("'{}'", a.label)));
            distinct.extend(others.iter().map(|(a, _)| a.source));
            let overloadable = candidates
                .iter()
                .flat_map(|s| s.decls.iter())
                .chain(others.iter().flat_map(|(_, f)| f.iter()))
                .all(|d| d.get_kind().is_overloadable());
            for s in &candidates {
                if let Some(k) = s.key {
                    self.used.insert(k);
                }
            }
            if distinct.len() > 1 && overloadable == false {
                out.error(
                    format!("'{}' is ambiguous: visible from {}", first, sources.join(" and ")),
                    pos,
                );
            }
            return;
        }
        if scope.external_names.contains(first) == true {
            return;
        }
        if providers.is_empty() == false {
            let distinct: HashSet<UnitIndex> = providers.iter().map(|(a, _)| a.source).collect();
            let overloadable = providers
                .iter()
                .flat_map(|(_, f)| f.iter())
                .all(|d| d.get_kind().is_overloadable());
            if distinct.len() > 1 && overloadable == false {
                let labels: Vec<String> = providers
                    .iter()
                    .map(|(a, _)| format!("'{}'", a.label))
                    .collect();
                out.error(
                    format!("'{}' is ambiguous: visible from {}", first, labels.join(" and ")),
                    pos,
                );
            }
            return;
        }
        // expanded names
        if name.is_expanded() == true {
            if self.is_work(first) == true {
                return self.lookup_expanded(&name.parts()[1..], name, pos, out);
            }
            if let Some((_, unit)) = scope.prefixes.iter().find(|p| &p.0 == first) {
                let unit = *unit;
                return self.lookup_in_unit(unit, &name.parts()[1..], name, pos, out);
            }
            if scope.libraries.contains(first) == true
                || scope.external_prefixes.contains(first) == true
            {
                return;
            }
        }
        if is_standard(first) == true || scope.external_all == true {
            return;
        }
        out.error(format!("'{}' is not declared", first), pos);
    }

    /// Resolves `work.<parts>`.
    fn lookup_expanded(
        &mut self,
        parts: &[Identifier],
        name: &SelectedName,
        pos: &Position,
        out: &mut Output,
    ) {
        match parts.first().and_then(|p| self.lib.find_primary(p)) {
            Some(unit) => self.lookup_in_unit(unit, &parts[1..], name, pos, out),
            None => out.error(
                format!(
                    "'{}' is not declared in library '{}'",
                    parts.first().map(|p| p.to_string()).unwrap_or_default(),
                    self.lib.get_name()
                ),
                pos,
            ),
        }
    }

    /// Resolves the names `rest` selected from `unit`.
    fn lookup_in_unit(
        &mut self,
        unit: UnitIndex,
        rest: &[Identifier],
        name: &SelectedName,
        pos: &Position,
        out: &mut Output,
    ) {
        let target = self.lib.get_unit(unit);
        if let Some(item) = rest.first() {
            if target.get_kind() == UnitKind::Package {
                let found = self
                    .package_items(unit)
                    .iter()
                    .any(|d| d.get_name() == item);
                if found == false {
                    return out.error(
                        format!(
                            "'{}' is not declared in package '{}'",
                            item,
                            target.get_name()
                        ),
                        pos,
                    );
                }
            }
        }
        out.depend(unit, DepKind::Name, name.to_string(), pos);
    }

    /// Checks that every deferred constant of package `index` is completed
    /// by its body.
    fn check_package_constants(&self, index: UnitIndex, out: &mut Output) {
        let pkg = match self.lib.get_unit(index).as_package() {
            Some(p) => p,
            None => return,
        };
        let body = self
            .lib
            .find_body(pkg.get_name())
            .and_then(|b| self.lib.get_unit(b).as_package_body());
        for d in pkg.deferred_constants() {
            match body {
                Some(b) => {
                    let completed = b
                        .get_decls()
                        .iter()
                        .any(|c| c.get_name() == d.get_name() && c.get_kind() == &DeclKind::Constant);
                    if completed == false {
                        out.error(
                            format!(
                                "deferred constant '{}' is not given a value in the body of package '{}'",
                                d.get_name(),
                                pkg.get_name()
                            ),
                            d.get_position(),
                        );
                    }
                }
                None => {
                    let msg = format!(
                        "deferred constant '{}' of package '{}' has no package body to give it a value",
                        d.get_name(),
                        pkg.get_name()
                    );
                    match self.config.get_deferred_constants() {
                        Level::Allow => (),
                        Level::Warn => out.warning(msg, d.get_position()),
                        Level::Error => out.error(msg, d.get_position()),
                    }
                }
            }
        }
        Self::check_local_constants(pkg.get_decls(), out);
    }

    /// Reports deferred constants declared within subprograms.
    fn check_local_constants(decls: &[Declaration], out: &mut Output) {
        for d in decls {
            match d.get_kind() {
                DeclKind::Function | DeclKind::Procedure => {
                    for local in d.get_locals() {
                        if local.get_kind() == &DeclKind::DeferredConstant {
                            out.error(
                                format!(
                                    "deferred constant '{}' must be declared in a package declaration",
                                    local.get_name()
                                ),
                                local.get_position(),
                            );
                        }
                    }
                    Self::check_local_constants(d.get_locals(), out);
                }
                _ => (),
            }
        }
    }
}

/// Resolves every unit of `lib`.
pub fn resolve(lib: &Library, config: &Config) -> Resolution {
    Resolver::new(lib, config).resolve()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn library(text: &str) -> Library {
        let mut lib = Library::new("work").unwrap();
        lib.add_source(&PathBuf::from("t.vhd"), text, "elab");
        lib.link()
    }

    fn messages(res: &Resolution) -> Vec<String> {
        colored::control::set_override(false);
        res.iter_diagnostics().map(|d| d.to_string()).collect()
    }

    fn deps(res: &Resolution, unit: UnitIndex) -> Vec<(UnitIndex, DepKind)> {
        res.get_dependencies(unit)
            .iter()
            .map(|d| (d.get_unit(), d.get_kind()))
            .collect()
    }

    #[test]
    fn selected_and_all_imports() {
        let lib = library(
            r#"package pkg_b is
    type BYTE is range 0 to 255;
    constant K : BYTE := 3;
end package;
use work.pkg_b.BYTE;
package pkg_c is
    constant K : BYTE := 1;
end package;
use work.pkg_b.BYTE;
use work.pkg_c.all;
package pkg_d is
    constant K2 : BYTE := K;
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(messages(&res), Vec::<String>::new());
        assert_eq!(deps(&res, 0), vec![]);
        assert_eq!(deps(&res, 1), vec![(0, DepKind::Use)]);
        assert_eq!(deps(&res, 2), vec![(0, DepKind::Use), (1, DepKind::Use)]);
        assert_eq!(res.get_dependencies(2)[1].get_via(), "work.pkg_c.all");
    }

    #[test]
    fn undeclared_names() {
        let lib = library(
            r#"package p is
    type t is (a, b);
end package;
use work.p.t;
use work.q.all;
use work.p.missing;
use lib2.x.all;
package r is
    signal s : t;
    signal u : unknown_t;
    signal v : work.p.nothing;
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(
            messages(&res),
            vec![
                "error: t.vhd:5:5 'q' is not declared in library 'work'",
                "error: t.vhd:6:5 'missing' is not declared in package 'work.p'",
                "error: t.vhd:7:5 library 'lib2' is not declared",
                "error: t.vhd:10:16 'unknown_t' is not declared",
                "error: t.vhd:11:16 'nothing' is not declared in package 'p'",
            ]
        );
    }

    #[test]
    fn external_libraries_are_trusted() {
        let lib = library(
            r#"library ieee;
use ieee.std_logic_1164.all;
package p is
    signal s : std_logic_vector(7 downto 0);
    constant c : natural := 8;
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(messages(&res), Vec::<String>::new());
        assert_eq!(deps(&res, 0), vec![]);
    }

    #[test]
    fn ambiguous_all_imports() {
        let lib = library(
            r#"package a is
    constant K : integer := 1;
    function f return integer;
end package;
package b is
    constant K : integer := 2;
    function f return integer;
end package;
use work.a.all;
use work.b.all;
package c is
    constant x : integer := K;
    constant y : integer := f;
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(
            messages(&res),
            vec!["error: t.vhd:12:29 'K' is ambiguous: visible from 'work.a.all' and 'work.b.all'"]
        );
    }

    #[test]
    fn selected_import_hidden_by_all_import() {
        let text = r#"package a is
    constant K : integer := 1;
end package;
package b is
    constant K : integer := 2;
end package;
use work.a.K;
use work.b.all;
package c is
    constant x : integer := K;
end package;"#;
        let res = resolve(&library(text), &Config::new());
        assert_eq!(
            messages(&res),
            vec!["error: t.vhd:10:29 'K' is ambiguous: visible from 'work.a.K' and 'work.b.all'"]
        );
        // both clauses denote the same declaration
        let res = resolve(&library(&text.replace("use work.b.all;", "use work.a.all;")), &Config::new());
        assert_eq!(messages(&res), Vec::<String>::new());
    }

    #[test]
    fn use_of_non_package() {
        let lib = library(
            r#"entity some_entity is
end entity;
use work.some_entity.x;
package p is
end package;"#,
        );
        assert_eq!(
            messages(&resolve(&lib, &Config::new())),
            vec!["error: t.vhd:3:5 'some_entity' is not a package"]
        );
    }

    #[test]
    fn prefixes_and_expanded_names() {
        let lib = library(
            r#"package a is
    type t is range 0 to 7;
end package;
package b is
    subtype s is work.a.t;
end package;
use work.a;
package c is
    subtype s is a.t;
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(messages(&res), Vec::<String>::new());
        assert_eq!(deps(&res, 1), vec![(0, DepKind::Name)]);
        assert_eq!(deps(&res, 2), vec![(0, DepKind::Use), (0, DepKind::Name)]);
    }

    #[test]
    fn unused_imports() {
        let text = r#"package a is
    type t is range 0 to 7;
    type u is range 0 to 7;
end package;
use work.a.t;
use work.a.u;
package b is
    constant c : t := 0;
end package;
package body b is
    constant d : u := 0;
end package body;"#;
        let lib = library(text);
        // usage in the body counts for the declaration's imports
        assert_eq!(messages(&resolve(&lib, &Config::new())), Vec::<String>::new());

        let lib = library(&text.replace("constant d : u := 0;", ""));
        assert_eq!(
            messages(&resolve(&lib, &Config::new())),
            vec!["warning: t.vhd:6:5 unused import 'work.a.u'"]
        );
        let quiet: Config = "[check]\nunused-imports = false".parse().unwrap();
        assert_eq!(messages(&resolve(&lib, &quiet)), Vec::<String>::new());
    }

    #[test]
    fn imports_used_by_statements() {
        let text = r#"package p is
    constant MAX : integer := 7;
end package;
use work.p.MAX;
package q is
    function f return integer;
end package;
package body q is
    function f return integer is
    begin
        return MAX;
    end function;
end package body;"#;
        assert_eq!(messages(&resolve(&library(text), &Config::new())), Vec::<String>::new());

        // a local of the same name hides the import
        let shadowed = text.replace("    begin", "        constant MAX : integer := 1;\n    begin");
        assert_eq!(
            messages(&resolve(&library(&shadowed), &Config::new())),
            vec!["warning: t.vhd:4:5 unused import 'work.p.MAX'"]
        );
    }

    #[test]
    fn deferred_constants() {
        let text = r#"package p is
    constant K : integer;
    constant J : integer;
end package;
package body p is
    constant K : integer := 1;
end package body;"#;
        let res = resolve(&library(text), &Config::new());
        assert_eq!(
            messages(&res),
            vec!["error: t.vhd:3:14 deferred constant 'J' is not given a value in the body of package 'p'"]
        );
        assert_eq!(deps(&res, 1), vec![(0, DepKind::Primary)]);

        let text = "package p is\n    constant K : integer;\nend package;";
        let res = resolve(&library(text), &Config::new());
        assert_eq!(
            messages(&res),
            vec!["warning: t.vhd:2:14 deferred constant 'K' of package 'p' has no package body to give it a value"]
        );
        let strict: Config = "[check]\ndeferred-constants = \"error\"".parse().unwrap();
        assert_eq!(count_errors(&resolve(&library(text), &strict)), 1);
        let lax: Config = "[check]\ndeferred-constants = \"allow\"".parse().unwrap();
        assert_eq!(messages(&resolve(&library(text), &lax)), Vec::<String>::new());
    }

    #[test]
    fn deferred_constant_in_body() {
        let text = r#"package p is
end package;
package body p is
    constant K : integer;
end package body;"#;
        assert_eq!(
            messages(&resolve(&library(text), &Config::new())),
            vec!["error: t.vhd:4:14 deferred constant 'K' must be declared in a package declaration"]
        );
    }

    fn count_errors(res: &Resolution) -> usize {
        crate::core::diagnostic::count_errors(res.iter_diagnostics())
    }

    #[test]
    fn contexts_and_instances() {
        let lib = library(
            r#"package gen is
    generic (WIDTH : natural);
    subtype word is integer range 0 to WIDTH;
end package;
context ctx is
    use work.gen;
end context;
context work.ctx;
package inst is new gen generic map (WIDTH => 8);
context work.missing;
package other is end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(deps(&res, 1), vec![(0, DepKind::Use)]);
        assert_eq!(
            deps(&res, 2),
            vec![(1, DepKind::Context), (0, DepKind::Use), (0, DepKind::Instance)]
        );
        assert_eq!(
            messages(&res),
            vec!["error: t.vhd:10:9 context 'work.missing' is not declared"]
        );
    }

    #[test]
    fn context_reference_to_package() {
        let lib = library(
            r#"package p is
end package;
context work.p;
package q is
end package;"#,
        );
        let res = resolve(&lib, &Config::new());
        assert_eq!(
            messages(&res),
            vec!["error: t.vhd:3:9 'work.p' is not a context"]
        );
        assert_eq!(deps(&res, 1), vec![]);
    }
}
