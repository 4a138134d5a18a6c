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

use super::super::error::VhdlError;
use super::super::token::literal::AbstLiteral;
use super::super::token::{Delimiter, Identifier, Keyword, VhdlToken};
use super::*;
use crate::core::lang::lexer::{Position, Token};
use serde_derive::Serialize;
use std::fmt::Display;
use std::iter::Peekable;

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Type,
    Subtype,
    EnumLiteral,
    PhysicalUnit,
    Constant,
    DeferredConstant,
    Signal,
    Variable,
    File,
    Alias,
    Attribute,
    Component,
    Function,
    Procedure,
    Package,
    Interface,
}

impl DeclKind {
    /// Checks if multiple declarations of the same name may be visible at once.
    pub fn is_overloadable(&self) -> bool {
        match self {
            Self::Function | Self::Procedure | Self::EnumLiteral => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Type => "type",
            Self::Subtype => "subtype",
            Self::EnumLiteral => "enumeration literal",
            Self::PhysicalUnit => "unit",
            Self::Constant => "constant",
            Self::DeferredConstant => "deferred constant",
            Self::Signal => "signal",
            Self::Variable => "variable",
            Self::File => "file",
            Self::Alias => "alias",
            Self::Attribute => "attribute",
            Self::Component => "component",
            Self::Function => "function",
            Self::Procedure => "procedure",
            Self::Package => "package",
            Self::Interface => "interface",
        }
    }
}

impl Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The class of a type, as written by its type definition.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeClass {
    Incomplete,
    Enumeration,
    Integer,
    Floating,
    Physical,
    Array,
    Record,
    Access,
    File,
    Protected,
}

impl TypeClass {
    /// Classifies the tokens of a type definition that is not an enumeration,
    /// record, or protected type.
    ///
    /// A range constraint is a floating point type only when one of its bounds
    /// is a real literal.
    fn from_definition(definition: &[Token<VhdlToken>], has_units: bool) -> Self {
        let first = definition.first().map(|t| t.as_type());
        match first {
            Some(VhdlToken::Keyword(Keyword::Array)) => Self::Array,
            Some(VhdlToken::Keyword(Keyword::Access)) => Self::Access,
            Some(VhdlToken::Keyword(Keyword::File)) => Self::File,
            _ if has_units == true => Self::Physical,
            _ => match definition.iter().any(|t| match t.as_type() {
                VhdlToken::AbstLiteral(AbstLiteral::Decimal(s))
                | VhdlToken::AbstLiteral(AbstLiteral::Based(s)) => s.contains('.'),
                _ => false,
            }) {
                true => Self::Floating,
                false => Self::Integer,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Enumeration => "enumeration",
            Self::Integer => "integer",
            Self::Floating => "floating",
            Self::Physical => "physical",
            Self::Array => "array",
            Self::Record => "record",
            Self::Access => "access",
            Self::File => "file",
            Self::Protected => "protected",
        }
    }
}

impl Display for TypeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named item declared within a declarative region.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Declaration {
    name: Identifier,
    kind: DeclKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<TypeClass>,
    #[serde(skip)]
    pos: Position,
    refs: Vec<Reference>,
    #[serde(skip)]
    mentions: Vec<Identifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locals: Vec<Declaration>,
}

impl Declaration {
    pub fn new(name: Identifier, kind: DeclKind, pos: Position) -> Self {
        Self {
            name: name,
            kind: kind,
            class: None,
            pos: pos,
            refs: Vec::new(),
            mentions: Vec::new(),
            locals: Vec::new(),
        }
    }

    pub fn refs(mut self, refs: Vec<Reference>) -> Self {
        self.refs = refs;
        self
    }

    pub fn class(mut self, class: TypeClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Sets the simple names appearing in statements, which are kept apart
    /// from `refs` since they are not resolved.
    pub fn mentions(mut self, mentions: Vec<Identifier>) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn locals(mut self, locals: Vec<Declaration>) -> Self {
        self.locals = locals;
        self
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_kind(&self) -> &DeclKind {
        &self.kind
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    /// References the names used by the declaration that are declared elsewhere.
    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }

    /// The class of a type declaration.
    pub fn get_class(&self) -> Option<&TypeClass> {
        self.class.as_ref()
    }

    pub fn get_mentions(&self) -> &Vec<Identifier> {
        &self.mentions
    }

    /// References the declarations nested inside of this one (parameters,
    /// subprogram locals, or a nested package's items).
    pub fn get_locals(&self) -> &Vec<Declaration> {
        &self.locals
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Checks if `name` is declared by one of the `locals`.
fn is_local(locals: &[Declaration], name: &Identifier) -> bool {
    locals.iter().any(|d| d.get_name() == name)
}

/// Keeps the references whose leading name is not one of the `locals`.
///
/// A reference shared by several interface elements (`a, b : BYTE`) is kept
/// only once.
fn outside_refs(locals: &[Declaration], refs: Vec<Reference>) -> Vec<Reference> {
    let mut kept: Vec<Reference> = Vec::with_capacity(refs.len());
    for r in refs {
        if is_local(locals, r.get_name().first()) == false && kept.contains(&r) == false {
            kept.push(r);
        }
    }
    kept
}

/// The items of a package, package body, or subprogram declarative region.
#[derive(Debug, PartialEq, Default)]
pub struct DeclarativePart {
    decls: Vec<Declaration>,
    uses: Vec<UseClause>,
    refs: Vec<Reference>,
}

impl DeclarativePart {
    /// Parses declarative items until reaching (but not consuming) an END or
    /// BEGIN keyword.
    ///
    /// Items that do not introduce a name are skipped to their ';'.
    pub fn from_tokens<I>(tokens: &mut Peekable<I>) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let mut part = Self::default();
        loop {
            let kw = match tokens.peek().map(|t| t.as_type()) {
                None | Some(VhdlToken::EOF) => {
                    return Err(VhdlError::UnexpectedEof(
                        tokens.peek().map(|t| t.locate().clone()).unwrap_or_else(Position::new),
                        String::from("'end'"),
                    ))
                }
                Some(VhdlToken::Keyword(kw)) => *kw,
                Some(VhdlToken::Delimiter(Delimiter::Terminator)) => {
                    tokens.next();
                    continue;
                }
                Some(_) => {
                    collect_statement(tokens)?;
                    continue;
                }
            };
            match kw {
                Keyword::End | Keyword::Begin => return Ok(part),
                Keyword::Type => part.decls.append(&mut Declaration::parse_type(tokens)?),
                Keyword::Subtype => part.decls.push(Declaration::parse_subtype(tokens)?),
                Keyword::Constant
                | Keyword::Signal
                | Keyword::Variable
                | Keyword::Shared
                | Keyword::File => part.decls.append(&mut Declaration::parse_object(tokens)?),
                Keyword::Alias => part.decls.push(Declaration::parse_alias(tokens)?),
                Keyword::Attribute => {
                    let (decl, mut refs) = Declaration::parse_attribute(tokens)?;
                    part.decls.extend(decl);
                    part.refs.append(&mut refs);
                }
                Keyword::Component => part.decls.push(Declaration::parse_component(tokens)?),
                Keyword::Function | Keyword::Procedure | Keyword::Pure | Keyword::Impure => {
                    part.decls.push(Declaration::parse_subprogram(tokens)?)
                }
                Keyword::Use => {
                    tokens.next();
                    part.uses.append(&mut parse_use_clause(tokens)?);
                }
                Keyword::Package => {
                    tokens.next();
                    match accept_keyword(tokens, &Keyword::Body) {
                        true => {
                            let mut inner = Self::parse_nested_body(tokens)?;
                            part.refs.append(&mut inner.refs);
                            part.uses.append(&mut inner.uses);
                        }
                        false => part.decls.push(Declaration::parse_nested_package(tokens)?),
                    }
                }
                _ => {
                    collect_statement(tokens)?;
                }
            }
        }
    }

    /// Parses a package body nested in another region, from its name through the END.
    ///
    /// The body only completes declarations, so its references are kept as
    /// loose references of the returned part.
    fn parse_nested_body<I>(tokens: &mut Peekable<I>) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let (name, _) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        let inner = Self::from_tokens(tokens)?;
        expect_keyword(tokens, &Keyword::End)?;
        parse_ending(tokens, &[Keyword::Package, Keyword::Body], &name)?;
        let (decls, uses, refs) = inner.into_parts();
        let all_refs = decls
            .iter()
            .flat_map(|d| d.get_refs().iter().cloned())
            .chain(refs.into_iter())
            .collect();
        Ok(Self {
            decls: Vec::new(),
            uses: uses,
            refs: outside_refs(&decls, all_refs),
        })
    }

    pub fn get_decls(&self) -> &Vec<Declaration> {
        &self.decls
    }

    pub fn get_uses(&self) -> &Vec<UseClause> {
        &self.uses
    }

    /// References the names used by items that do not declare anything
    /// (such as attribute specifications).
    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }

    pub fn into_parts(self) -> (Vec<Declaration>, Vec<UseClause>, Vec<Reference>) {
        (self.decls, self.uses, self.refs)
    }
}

impl Declaration {
    /// Parses a type declaration.
    ///
    /// Enumeration literals and physical units are returned as declarations
    /// following the type itself.
    fn parse_type<I>(tokens: &mut Peekable<I>) -> Result<Vec<Declaration>, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        expect_keyword(tokens, &Keyword::Type)?;
        let (name, pos) = expect_identifier(tokens)?;
        // incomplete type declaration
        if accept_delimiter(tokens, &Delimiter::Terminator) == true {
            return Ok(vec![
                Declaration::new(name, DeclKind::Type, pos).class(TypeClass::Incomplete)
            ]);
        }
        expect_keyword(tokens, &Keyword::Is)?;

        let mut items = Vec::new();
        let mut refs = Vec::new();
        let mut mentions = Vec::new();
        let class = if accept_delimiter(tokens, &Delimiter::ParenL) == true {
            // enumeration type
            loop {
                let t = next_token(tokens, "')'")?;
                match t.as_type() {
                    VhdlToken::Delimiter(Delimiter::ParenR) => break,
                    VhdlToken::Delimiter(Delimiter::Comma) | VhdlToken::CharLiteral(_) => (),
                    VhdlToken::Identifier(_) => {
                        let (lit_pos, tk) = t.decouple();
                        if let Some(lit) = tk.take_identifier() {
                            items.push(Declaration::new(lit, DeclKind::EnumLiteral, lit_pos));
                        }
                    }
                    _ => return Err(unexpected(t, "an enumeration literal")),
                }
            }
            expect_delimiter(tokens, &Delimiter::Terminator)?;
            TypeClass::Enumeration
        } else if accept_keyword(tokens, &Keyword::Record) == true {
            while accept_keyword(tokens, &Keyword::End) == false {
                let element = collect_statement(tokens)?;
                let colon = element
                    .iter()
                    .position(|t| t.as_type().check_delimiter(&Delimiter::Colon))
                    .unwrap_or(element.len());
                refs.append(&mut collect_refs(&element[colon..]));
            }
            expect_keyword(tokens, &Keyword::Record)?;
            parse_ending(tokens, &[], &name)?;
            TypeClass::Record
        } else if accept_keyword(tokens, &Keyword::Protected) == true {
            let is_body = accept_keyword(tokens, &Keyword::Body);
            let skipped = skip_region(tokens, Some(&Keyword::Protected))?;
            refs.append(&mut collect_expanded_refs(&skipped));
            mentions = collect_mentions(&skipped);
            if is_body == true {
                accept_keyword(tokens, &Keyword::Body);
            }
            parse_ending(tokens, &[], &name)?;
            TypeClass::Protected
        } else {
            // integer, floating, physical, array, access, or file type
            let (definition, stop) = collect_until(tokens, &|t| {
                t.check_delimiter(&Delimiter::Terminator) || t.check_keyword(&Keyword::Units)
            })?;
            refs.append(&mut collect_refs(&definition));
            let has_units = stop.as_type().check_keyword(&Keyword::Units);
            if has_units == true {
                let (primary, unit_pos) = expect_identifier(tokens)?;
                expect_delimiter(tokens, &Delimiter::Terminator)?;
                items.push(Declaration::new(primary, DeclKind::PhysicalUnit, unit_pos));
                while accept_keyword(tokens, &Keyword::End) == false {
                    let (unit, unit_pos) = expect_identifier(tokens)?;
                    collect_statement(tokens)?;
                    items.push(Declaration::new(unit, DeclKind::PhysicalUnit, unit_pos));
                }
                expect_keyword(tokens, &Keyword::Units)?;
                parse_ending(tokens, &[], &name)?;
            }
            TypeClass::from_definition(&definition, has_units)
        };
        let mut decls = vec![Declaration::new(name, DeclKind::Type, pos)
            .class(class)
            .refs(refs)
            .mentions(mentions)];
        decls.append(&mut items);
        Ok(decls)
    }

    fn parse_subtype<I>(tokens: &mut Peekable<I>) -> Result<Declaration, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        expect_keyword(tokens, &Keyword::Subtype)?;
        let (name, pos) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        let indication = collect_statement(tokens)?;
        Ok(Declaration::new(name, DeclKind::Subtype, pos).refs(collect_refs(&indication)))
    }

    /// Parses a constant, signal, variable, or file declaration.
    ///
    /// A constant without a value expression is a deferred constant.
    fn parse_object<I>(tokens: &mut Peekable<I>) -> Result<Vec<Declaration>, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let t = next_token(tokens, "an object declaration")?;
        let kw = match t.as_type().as_keyword() {
            Some(Keyword::Shared) => {
                expect_keyword(tokens, &Keyword::Variable)?;
                Keyword::Variable
            }
            Some(kw) => *kw,
            None => return Err(unexpected(t, "an object declaration")),
        };
        let pos = t.into_position();
        let stmt = collect_statement(tokens)?;
        let colon = match stmt
            .iter()
            .position(|t| t.as_type().check_delimiter(&Delimiter::Colon))
        {
            Some(i) => i,
            None => {
                return Err(VhdlError::Expecting(
                    pos,
                    String::from("':' in object declaration"),
                    String::from("';'"),
                ))
            }
        };
        let (names, rest) = (&stmt[..colon], &stmt[colon + 1..]);
        let kind = match kw {
            Keyword::Constant => {
                match rest
                    .iter()
                    .any(|t| t.as_type().check_delimiter(&Delimiter::VarAssign))
                {
                    true => DeclKind::Constant,
                    false => DeclKind::DeferredConstant,
                }
            }
            Keyword::Signal => DeclKind::Signal,
            Keyword::Variable => DeclKind::Variable,
            _ => DeclKind::File,
        };
        let refs = collect_refs(rest);
        let decls: Vec<Declaration> = names
            .iter()
            .filter_map(|t| {
                t.as_type().as_identifier().map(|id| {
                    Declaration::new(id.clone(), kind, t.locate().clone()).refs(refs.clone())
                })
            })
            .collect();
        match decls.is_empty() {
            true => Err(VhdlError::Expecting(
                pos,
                String::from("an identifier"),
                String::from("':'"),
            )),
            false => Ok(decls),
        }
    }

    fn parse_alias<I>(tokens: &mut Peekable<I>) -> Result<Declaration, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        expect_keyword(tokens, &Keyword::Alias)?;
        let (pos, name) = designator(next_token(tokens, "an alias designator")?)?;
        let rest = collect_statement(tokens)?;
        Ok(Declaration::new(name, DeclKind::Alias, pos).refs(collect_refs(&rest)))
    }

    /// Parses an attribute declaration or an attribute specification.
    ///
    /// A specification declares nothing and only produces references.
    fn parse_attribute<I>(
        tokens: &mut Peekable<I>,
    ) -> Result<(Option<Declaration>, Vec<Reference>), VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        expect_keyword(tokens, &Keyword::Attribute)?;
        let (name, pos) = expect_identifier(tokens)?;
        if accept_delimiter(tokens, &Delimiter::Colon) == true {
            let type_mark = collect_statement(tokens)?;
            return Ok((
                Some(Declaration::new(name, DeclKind::Attribute, pos).refs(collect_refs(&type_mark))),
                Vec::new(),
            ));
        }
        expect_keyword(tokens, &Keyword::Of)?;
        let spec = collect_statement(tokens)?;
        let mut refs = vec![Reference::new(SelectedName::from(name), pos)];
        if let Some(i) = spec
            .iter()
            .position(|t| t.as_type().check_keyword(&Keyword::Is))
        {
            refs.append(&mut collect_refs(&spec[i + 1..]));
        }
        Ok((None, refs))
    }

    /// Parses a component declaration through its END COMPONENT statement.
    fn parse_component<I>(tokens: &mut Peekable<I>) -> Result<Declaration, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        expect_keyword(tokens, &Keyword::Component)?;
        let (name, pos) = expect_identifier(tokens)?;
        accept_keyword(tokens, &Keyword::Is);
        let mut interface = Vec::new();
        while accept_keyword(tokens, &Keyword::End) == false {
            if accept_keyword(tokens, &Keyword::Generic) || accept_keyword(tokens, &Keyword::Port) {
                interface.append(&mut parse_interface_list(tokens)?);
                expect_delimiter(tokens, &Delimiter::Terminator)?;
            } else {
                let t = next_token(tokens, "'end component'")?;
                return Err(unexpected(t, "'generic', 'port' or 'end'"));
            }
        }
        expect_keyword(tokens, &Keyword::Component)?;
        parse_ending(tokens, &[], &name)?;
        let refs = interface
            .iter()
            .flat_map(|d| d.get_refs().iter().cloned())
            .collect();
        Ok(Declaration::new(name, DeclKind::Component, pos)
            .refs(outside_refs(&interface, refs))
            .locals(interface))
    }

    /// Parses a subprogram declaration, body, or instantiation.
    fn parse_subprogram<I>(tokens: &mut Peekable<I>) -> Result<Declaration, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        if accept_keyword(tokens, &Keyword::Pure) == false {
            accept_keyword(tokens, &Keyword::Impure);
        }
        let t = next_token(tokens, "'function' or 'procedure'")?;
        let (kind, kw) = match t.as_type() {
            VhdlToken::Keyword(Keyword::Function) => (DeclKind::Function, Keyword::Function),
            VhdlToken::Keyword(Keyword::Procedure) => (DeclKind::Procedure, Keyword::Procedure),
            _ => return Err(unexpected(t, "'function' or 'procedure'")),
        };
        let (pos, name) = designator(next_token(tokens, "a subprogram designator")?)?;
        let (header, stop) = collect_until(tokens, &|t| {
            t.check_delimiter(&Delimiter::Terminator) || t.check_keyword(&Keyword::Is)
        })?;
        let (mut locals, mut refs) = parse_subprogram_header(&header)?;
        // subprogram declaration
        if stop.as_type().check_delimiter(&Delimiter::Terminator) == true {
            return Ok(Declaration::new(name, kind, pos)
                .refs(outside_refs(&locals, refs))
                .locals(locals));
        }
        // subprogram instantiation
        if accept_keyword(tokens, &Keyword::New) == true {
            let rest = collect_statement(tokens)?;
            return Ok(Declaration::new(name, kind, pos).refs(collect_refs(&rest)));
        }
        // subprogram body
        let (mut decls, uses, mut loose) = DeclarativePart::from_tokens(tokens)?.into_parts();
        expect_keyword(tokens, &Keyword::Begin)?;
        let statements = skip_region(tokens, None)?;
        accept_keyword(tokens, &kw);
        if let Some(t) = tokens.peek() {
            match t.as_type() {
                VhdlToken::Identifier(_) | VhdlToken::StrLiteral(_) => {
                    let (end_pos, ending) = designator(next_token(tokens, "';'")?)?;
                    if ending != name {
                        return Err(VhdlError::EndingMismatch(
                            end_pos,
                            name.to_string(),
                            ending.to_string(),
                        ));
                    }
                }
                _ => (),
            }
        }
        expect_delimiter(tokens, &Delimiter::Terminator)?;

        for d in &decls {
            refs.extend(d.get_refs().iter().cloned());
        }
        refs.append(&mut loose);
        refs.extend(
            uses.into_iter()
                .map(|u| Reference::new(u.get_name().clone(), u.get_position().clone())),
        );
        refs.append(&mut collect_expanded_refs(&statements));
        locals.append(&mut decls);
        let mentions = collect_mentions(&statements)
            .into_iter()
            .filter(|m| is_local(&locals, m) == false)
            .collect();
        Ok(Declaration::new(name, kind, pos)
            .refs(outside_refs(&locals, refs))
            .mentions(mentions)
            .locals(locals))
    }

    /// Parses a package declared within another region, after its PACKAGE keyword.
    fn parse_nested_package<I>(tokens: &mut Peekable<I>) -> Result<Declaration, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let (name, pos) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        if accept_keyword(tokens, &Keyword::New) == true {
            let rest = collect_statement(tokens)?;
            return Ok(Declaration::new(name, DeclKind::Package, pos).refs(collect_refs(&rest)));
        }
        let mut locals = Vec::new();
        if accept_keyword(tokens, &Keyword::Generic) == true {
            locals.append(&mut parse_interface_list(tokens)?);
            expect_delimiter(tokens, &Delimiter::Terminator)?;
        }
        let (mut decls, uses, mut refs) = DeclarativePart::from_tokens(tokens)?.into_parts();
        expect_keyword(tokens, &Keyword::End)?;
        parse_ending(tokens, &[Keyword::Package], &name)?;
        locals.append(&mut decls);
        for d in &locals {
            refs.extend(d.get_refs().iter().cloned());
        }
        refs.extend(
            uses.into_iter()
                .map(|u| Reference::new(u.get_name().clone(), u.get_position().clone())),
        );
        Ok(Declaration::new(name, DeclKind::Package, pos)
            .refs(outside_refs(&locals, refs))
            .locals(locals))
    }
}

/// Interprets a subprogram designator or alias designator: an identifier,
/// an operator symbol, or a character literal.
fn designator(t: Token<VhdlToken>) -> Result<(Position, Identifier), VhdlError> {
    match t.as_type() {
        VhdlToken::Identifier(_) | VhdlToken::StrLiteral(_) | VhdlToken::CharLiteral(_) => {
            let (pos, tk) = t.decouple();
            let name = match tk {
                VhdlToken::Identifier(id) => id,
                other => Identifier::Basic(other.to_string()),
            };
            Ok((pos, name))
        }
        _ => Err(unexpected(t, "a designator")),
    }
}

/// Collects the parameters and referenced names of a subprogram header (the
/// tokens following the designator up to IS or ';').
fn parse_subprogram_header(
    header: &[Token<VhdlToken>],
) -> Result<(Vec<Declaration>, Vec<Reference>), VhdlError> {
    let mut params = Vec::new();
    let mut refs = Vec::new();
    let mut i = 0;
    while i < header.len() {
        if header[i].as_type().check_delimiter(&Delimiter::ParenL) == true {
            let mut depth = 0;
            let mut start = i + 1;
            let mut j = i + 1;
            while j < header.len() {
                match header[j].as_type() {
                    VhdlToken::Delimiter(Delimiter::ParenL) => depth += 1,
                    VhdlToken::Delimiter(Delimiter::ParenR) if depth == 0 => break,
                    VhdlToken::Delimiter(Delimiter::ParenR) => depth -= 1,
                    VhdlToken::Delimiter(Delimiter::Terminator) if depth == 0 => {
                        params.append(&mut interface_element(&header[start..j])?);
                        start = j + 1;
                    }
                    _ => (),
                }
                j += 1;
            }
            params.append(&mut interface_element(&header[start..j.min(header.len())])?);
            i = j + 1;
        } else if header[i].as_type().check_keyword(&Keyword::Return) == true {
            refs.append(&mut collect_refs(&header[i + 1..]));
            break;
        } else {
            i += 1;
        }
    }
    for p in &params {
        refs.extend(p.get_refs().iter().cloned());
    }
    Ok((params, refs))
}

/// Parses a parenthesized interface list (generics, ports, or parameters).
///
/// Assumes the next token is the opening '(' and consumes through the closing ')'.
pub fn parse_interface_list<I>(tokens: &mut Peekable<I>) -> Result<Vec<Declaration>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    expect_delimiter(tokens, &Delimiter::ParenL)?;
    let mut items = Vec::new();
    let mut element = Vec::new();
    let mut depth: usize = 0;
    loop {
        let t = next_token(tokens, "')'")?;
        match t.as_type() {
            VhdlToken::Delimiter(Delimiter::ParenR) if depth == 0 => {
                items.append(&mut interface_element(&element)?);
                return Ok(items);
            }
            VhdlToken::Delimiter(Delimiter::Terminator) if depth == 0 => {
                items.append(&mut interface_element(&element)?);
                element.clear();
                continue;
            }
            VhdlToken::Delimiter(Delimiter::ParenL) => depth += 1,
            VhdlToken::Delimiter(Delimiter::ParenR) => depth -= 1,
            _ => (),
        }
        element.push(t);
    }
}

/// Interprets the tokens of a single interface element.
///
/// - interface_element ::= [ class ] names : [ mode ] subtype_indication [ := expression ]
/// | type name | subprogram_specification | package name is new ...
fn interface_element(tokens: &[Token<VhdlToken>]) -> Result<Vec<Declaration>, VhdlError> {
    let first = match tokens.first() {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };
    let named = |t: Option<&Token<VhdlToken>>| -> Result<Declaration, VhdlError> {
        match t {
            Some(t) => {
                let (pos, name) = designator(t.clone())?;
                Ok(Declaration::new(name, DeclKind::Interface, pos))
            }
            None => Err(VhdlError::Expecting(
                first.locate().clone(),
                String::from("an interface name"),
                String::from("nothing"),
            )),
        }
    };
    match first.as_type().as_keyword() {
        Some(Keyword::Type) => Ok(vec![named(tokens.get(1))?]),
        Some(Keyword::Function) | Some(Keyword::Procedure) => Ok(vec![named(tokens.get(1))?]),
        Some(Keyword::Pure) | Some(Keyword::Impure) => Ok(vec![named(tokens.get(2))?]),
        Some(Keyword::Package) => {
            let refs = match tokens
                .iter()
                .position(|t| t.as_type().check_keyword(&Keyword::New))
            {
                Some(i) => collect_refs(&tokens[i + 1..]).into_iter().take(1).collect(),
                None => Vec::new(),
            };
            Ok(vec![named(tokens.get(1))?.refs(refs)])
        }
        _ => {
            let colon = match tokens
                .iter()
                .position(|t| t.as_type().check_delimiter(&Delimiter::Colon))
            {
                Some(i) => i,
                None => return Err(unexpected(first.clone(), "':' in interface element")),
            };
            let refs = collect_refs(&tokens[colon + 1..]);
            Ok(tokens[..colon]
                .iter()
                .filter_map(|t| {
                    t.as_type().as_identifier().map(|id| {
                        Declaration::new(id.clone(), DeclKind::Interface, t.locate().clone())
                            .refs(refs.clone())
                    })
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::vhdl::token::VhdlTokenizer;

    fn part(s: &str) -> DeclarativePart {
        let mut tokens = VhdlTokenizer::read(s)
            .unwrap()
            .into_iter()
            .filter(|t| t.as_type().as_comment().is_none())
            .peekable();
        DeclarativePart::from_tokens(&mut tokens).unwrap()
    }

    fn summary(decls: &[Declaration]) -> Vec<String> {
        decls.iter().map(|d| d.to_string()).collect()
    }

    fn ref_names(d: &Declaration) -> Vec<String> {
        d.get_refs().iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn deferred_and_full_constants() {
        let p = part("constant K : BYTE; constant A, B : INTEGER := MAX; end");
        assert_eq!(
            summary(p.get_decls()),
            vec!["deferred constant K", "constant A", "constant B"]
        );
        assert_eq!(ref_names(&p.get_decls()[0]), vec!["BYTE"]);
        assert_eq!(ref_names(&p.get_decls()[2]), vec!["INTEGER", "MAX"]);
    }

    #[test]
    fn type_declarations() {
        let p = part(
            "\
type BYTE is range 0 to 255;
type state is (IDLE, RUN, '0');
type node;
type rec is record
    a, b : BYTE;
    c : state;
end record rec;
type dist is range 0 to 1000 units
    um;
    mm = 1000 um;
end units;
type mem is array (natural range <>) of BYTE;
subtype small is BYTE range 0 to 15;
end",
        );
        assert_eq!(
            summary(p.get_decls()),
            vec![
                "type BYTE",
                "type state",
                "enumeration literal IDLE",
                "enumeration literal RUN",
                "type node",
                "type rec",
                "type dist",
                "unit um",
                "unit mm",
                "type mem",
                "subtype small",
            ]
        );
        assert_eq!(ref_names(&p.get_decls()[5]), vec!["BYTE", "state"]);
        assert_eq!(ref_names(&p.get_decls()[9]), vec!["natural", "BYTE"]);
        let classes: Vec<Option<&TypeClass>> = p.get_decls().iter().map(|d| d.get_class()).collect();
        assert_eq!(
            classes,
            vec![
                Some(&TypeClass::Integer),
                Some(&TypeClass::Enumeration),
                None,
                None,
                Some(&TypeClass::Incomplete),
                Some(&TypeClass::Record),
                Some(&TypeClass::Physical),
                None,
                None,
                Some(&TypeClass::Array),
                None,
            ]
        );
    }

    #[test]
    fn type_classes() {
        let p = part(
            "\
type ratio is range -1.0 to 1.0;
type hex is range 16#0.8# to 16#F#;
type link is access node;
type log is file of string;
type counter is protected
    procedure bump;
end protected counter;
type level is range LOW to HIGH;
end",
        );
        let classes: Vec<String> = p
            .get_decls()
            .iter()
            .filter_map(|d| d.get_class().map(|c| c.to_string()))
            .collect();
        assert_eq!(
            classes,
            vec!["floating", "floating", "access", "file", "protected", "integer"]
        );
        let json = serde_json::to_string(&p.get_decls()[0]).unwrap();
        assert_eq!(json, r#"{"name":"ratio","kind":"type","class":"floating","refs":[]}"#);
    }

    #[test]
    fn statements_are_mentioned() {
        let p = part(
            "\
function f(x : INTEGER) return INTEGER is
    variable tmp : INTEGER;
begin
    tmp := x + MAX;
    return tmp * Max;
end function;
end",
        );
        let f = &p.get_decls()[0];
        let mentions: Vec<String> = f.get_mentions().iter().map(|m| m.to_string()).collect();
        assert_eq!(mentions, vec!["MAX"]);
        // statements only contribute expanded names to the references
        assert_eq!(ref_names(f), vec!["INTEGER", "INTEGER", "INTEGER"]);
    }

    #[test]
    fn subprograms() {
        let p = part(
            "\
function add(a, b : BYTE) return BYTE;
impure function \"+\"(l : BYTE; r : INTEGER) return BYTE is
    variable tmp : BYTE := l;
begin
    if r > 0 then tmp := work.pkg_a.inc(tmp); end if;
    return tmp;
end function \"+\";
procedure reset is
begin
end procedure reset;
end",
        );
        let decls = p.get_decls();
        assert_eq!(
            summary(decls),
            vec!["function add", "function \"+\"", "procedure reset"]
        );
        assert_eq!(ref_names(&decls[0]), vec!["BYTE", "BYTE"]);
        assert_eq!(decls[0].get_locals().len(), 2);
        assert_eq!(
            ref_names(&decls[1]),
            vec!["BYTE", "BYTE", "INTEGER", "BYTE", "work.pkg_a.inc"]
        );
    }

    #[test]
    fn subprogram_ending_mismatch() {
        let mut tokens = VhdlTokenizer::read("procedure p is begin end procedure q; end")
            .unwrap()
            .into_iter()
            .peekable();
        assert_eq!(
            DeclarativePart::from_tokens(&mut tokens),
            Err(VhdlError::EndingMismatch(
                Position::place(1, 36),
                "p".to_owned(),
                "q".to_owned()
            ))
        );
    }

    #[test]
    fn other_items() {
        let p = part(
            "\
use work.pkg_b.all;
signal s : BIT;
shared variable v : counter;
alias hi is work.pkg_b.HIGH;
attribute keep : boolean;
attribute keep of s : signal is TRUE;
component adder is
    generic (N : positive := 8);
    port (x : in BYTE; y : out bit_vector(N-1 downto 0));
end component;
package inner is
    constant C : BYTE := 1;
end package inner;
disconnect s : BIT after 1 ns;
end",
        );
        assert_eq!(p.get_uses().len(), 1);
        assert_eq!(
            summary(p.get_decls()),
            vec![
                "signal s",
                "variable v",
                "alias hi",
                "attribute keep",
                "component adder",
                "package inner",
            ]
        );
        let refs: Vec<String> = p.get_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(refs, vec!["keep", "TRUE"]);
        // generic N is local to the component
        assert_eq!(ref_names(&p.get_decls()[4]), vec!["positive", "BYTE", "bit_vector"]);
        assert_eq!(ref_names(&p.get_decls()[5]), vec!["BYTE"]);
    }

    #[test]
    fn interface_elements() {
        let mut tokens = VhdlTokenizer::read(
            "(type T; constant W : natural := 4; signal a, b : in T; function f return T; package p is new work.gen)",
        )
        .unwrap()
        .into_iter()
        .peekable();
        let items = parse_interface_list(&mut tokens).unwrap();
        assert_eq!(
            items
                .iter()
                .map(|i| i.get_name().to_string())
                .collect::<Vec<String>>(),
            vec!["T", "W", "a", "b", "f", "p"]
        );
        assert_eq!(ref_names(&items[5]), vec!["work.gen"]);
    }
}
