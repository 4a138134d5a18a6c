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

pub mod architecture;
pub mod configuration;
pub mod context;
pub mod declaration;
pub mod entity;
pub mod package;
pub mod packagebody;

use architecture::Architecture;
use configuration::Configuration;
use context::ContextDeclaration;
use entity::Entity;
use package::Package;
use packagebody::PackageBody;

use super::error::VhdlError;
use super::token::identifier::IdentifierError;
use super::token::{Delimiter, Identifier, Keyword, VhdlToken, VhdlTokenizer};
use crate::core::lang::lexer::{Position, Token};
use crate::core::lang::parser::Parse;
use serde::Serializer;
use serde_derive::Serialize;
use std::fmt::Display;
use std::iter::Peekable;
use std::str::FromStr;

/// A name made of one or more identifiers joined by dots: `work.pkg_b.BYTE`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct SelectedName(Vec<Identifier>);

impl SelectedName {
    pub fn new(parts: Vec<Identifier>) -> Self {
        Self(parts)
    }

    pub fn first(&self) -> &Identifier {
        &self.0[0]
    }

    pub fn last(&self) -> &Identifier {
        &self.0[self.0.len() - 1]
    }

    pub fn get(&self, i: usize) -> Option<&Identifier> {
        self.0.get(i)
    }

    pub fn parts(&self) -> &[Identifier] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the name has a prefix (`P.x` rather than `x`).
    pub fn is_expanded(&self) -> bool {
        self.0.len() > 1
    }
}

impl From<Identifier> for SelectedName {
    fn from(value: Identifier) -> Self {
        Self(vec![value])
    }
}

impl FromStr for SelectedName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|p| Identifier::from_str(p))
            .collect::<Result<Vec<Identifier>, IdentifierError>>()?;
        Ok(Self(parts))
    }
}

impl Display for SelectedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", names.join("."))
    }
}

impl serde::Serialize for SelectedName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A name used at a particular place in the source code.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Reference {
    name: SelectedName,
    #[serde(skip)]
    pos: Position,
}

impl Reference {
    pub fn new(name: SelectedName, pos: Position) -> Self {
        Self { name: name, pos: pos }
    }

    pub fn get_name(&self) -> &SelectedName {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single name imported by a `use` clause.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct UseClause {
    name: SelectedName,
    all: bool,
    #[serde(skip)]
    pos: Position,
}

impl UseClause {
    pub fn new(name: SelectedName, all: bool, pos: Position) -> Self {
        Self {
            name: name,
            all: all,
            pos: pos,
        }
    }

    /// The selected name without any trailing `.all`.
    pub fn get_name(&self) -> &SelectedName {
        &self.name
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }
}

impl Display for UseClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.all {
            true => write!(f, "{}.all", self.name),
            false => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LibraryClause {
    name: Identifier,
    #[serde(skip)]
    pos: Position,
}

impl LibraryClause {
    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }
}

/// The library clauses, use clauses and context references that precede a
/// design unit.
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct ContextClause {
    libraries: Vec<LibraryClause>,
    uses: Vec<UseClause>,
    contexts: Vec<Reference>,
}

impl ContextClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_libraries(&self) -> &Vec<LibraryClause> {
        &self.libraries
    }

    pub fn get_uses(&self) -> &Vec<UseClause> {
        &self.uses
    }

    pub fn get_contexts(&self) -> &Vec<Reference> {
        &self.contexts
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.uses.is_empty() && self.contexts.is_empty()
    }

    /// Adds the use clauses found inside a unit's declarative part.
    pub fn add_uses(&mut self, uses: &mut Vec<UseClause>) {
        self.uses.append(uses);
    }

    /// Consumes a context item that begins with the keyword `kw`.
    ///
    /// Assumes the keyword was the last token consumed.
    fn parse_item<I>(&mut self, tokens: &mut Peekable<I>, kw: &Keyword) -> Result<(), VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        match kw {
            Keyword::Library => self.libraries.append(&mut parse_library_clause(tokens)?),
            Keyword::Use => self.uses.append(&mut parse_use_clause(tokens)?),
            _ => {
                let (first, pos) = expect_identifier(tokens)?;
                self.contexts
                    .append(&mut parse_context_reference(tokens, first, pos)?)
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Package,
    PackageBody,
    Entity,
    Architecture,
    Configuration,
    Context,
}

impl UnitKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Package => "package",
            Self::PackageBody => "package body",
            Self::Entity => "entity",
            Self::Architecture => "architecture",
            Self::Configuration => "configuration",
            Self::Context => "context",
        }
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq)]
pub enum DesignUnit {
    Package(Package),
    PackageBody(PackageBody),
    Entity(Entity),
    Architecture(Architecture),
    Configuration(Configuration),
    Context(ContextDeclaration),
}

impl DesignUnit {
    pub fn get_name(&self) -> &Identifier {
        match self {
            Self::Package(u) => u.get_name(),
            Self::PackageBody(u) => u.get_name(),
            Self::Entity(u) => u.get_name(),
            Self::Architecture(u) => u.get_name(),
            Self::Configuration(u) => u.get_name(),
            Self::Context(u) => u.get_name(),
        }
    }

    pub fn get_position(&self) -> &Position {
        match self {
            Self::Package(u) => u.get_position(),
            Self::PackageBody(u) => u.get_position(),
            Self::Entity(u) => u.get_position(),
            Self::Architecture(u) => u.get_position(),
            Self::Configuration(u) => u.get_position(),
            Self::Context(u) => u.get_position(),
        }
    }

    /// References the context clause written before the unit.
    pub fn get_context(&self) -> &ContextClause {
        match self {
            Self::Package(u) => u.get_context(),
            Self::PackageBody(u) => u.get_context(),
            Self::Entity(u) => u.get_context(),
            Self::Architecture(u) => u.get_context(),
            Self::Configuration(u) => u.get_context(),
            Self::Context(u) => u.get_context(),
        }
    }

    /// References the names used by the unit outside of its declarations.
    pub fn get_refs(&self) -> &Vec<Reference> {
        match self {
            Self::Package(u) => u.get_refs(),
            Self::PackageBody(u) => u.get_refs(),
            Self::Entity(u) => u.get_refs(),
            Self::Architecture(u) => u.get_refs(),
            Self::Configuration(u) => u.get_refs(),
            Self::Context(u) => u.get_refs(),
        }
    }

    pub fn get_kind(&self) -> UnitKind {
        match self {
            Self::Package(_) => UnitKind::Package,
            Self::PackageBody(_) => UnitKind::PackageBody,
            Self::Entity(_) => UnitKind::Entity,
            Self::Architecture(_) => UnitKind::Architecture,
            Self::Configuration(_) => UnitKind::Configuration,
            Self::Context(_) => UnitKind::Context,
        }
    }

    /// Checks if the unit is stored in the library under its own name.
    pub fn is_primary(&self) -> bool {
        match self {
            Self::PackageBody(_) | Self::Architecture(_) => false,
            _ => true,
        }
    }

    /// Returns the name of the primary unit a secondary unit belongs to.
    ///
    /// Configurations are primary units but still name their entity.
    pub fn get_owner(&self) -> Option<&Identifier> {
        match self {
            Self::PackageBody(u) => Some(u.get_name()),
            Self::Architecture(u) => Some(u.get_entity()),
            Self::Configuration(u) => Some(u.get_entity()),
            _ => None,
        }
    }

    pub fn as_package(&self) -> Option<&Package> {
        match self {
            Self::Package(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_package_body(&self) -> Option<&PackageBody> {
        match self {
            Self::PackageBody(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&ContextDeclaration> {
        match self {
            Self::Context(c) => Some(c),
            _ => None,
        }
    }
}

impl Display for DesignUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Architecture(a) => write!(f, "{}({})", a.get_entity(), a.get_name()),
            Self::PackageBody(b) => write!(f, "{} (body)", b.get_name()),
            _ => write!(f, "{}", self.get_name()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct VhdlParser {
    units: Vec<DesignUnit>,
}

impl Parse<VhdlToken> for VhdlParser {
    type SymbolType = DesignUnit;
    type SymbolError = VhdlError;

    fn parse(tokens: Vec<Token<VhdlToken>>) -> Result<Vec<Self::SymbolType>, Self::SymbolError> {
        let mut units = Vec::new();
        Self::parse_into(tokens, &mut units)?;
        Ok(units)
    }
}

impl VhdlParser {
    /// Parses design units into `units` until the end of file or the first
    /// syntax error.
    fn parse_into(
        tokens: Vec<Token<VhdlToken>>,
        units: &mut Vec<DesignUnit>,
    ) -> Result<(), VhdlError> {
        let mut tokens = tokens
            .into_iter()
            .filter(|t| t.as_type().as_comment().is_none())
            .peekable();
        // context items apply to the next design unit only
        let mut context = ContextClause::new();
        while let Some(t) = tokens.next() {
            let (pos, tk) = t.decouple();
            let kw = match tk {
                VhdlToken::EOF => break,
                VhdlToken::Keyword(kw) => kw,
                VhdlToken::Delimiter(Delimiter::Terminator) => continue,
                other => {
                    return Err(VhdlError::Expecting(
                        pos,
                        String::from("a design unit"),
                        quote(&other),
                    ))
                }
            };
            let unit = match kw {
                Keyword::Library | Keyword::Use => {
                    context.parse_item(&mut tokens, &kw)?;
                    continue;
                }
                Keyword::Context => {
                    let (name, name_pos) = expect_identifier(&mut tokens)?;
                    if accept_keyword(&mut tokens, &Keyword::Is) == false {
                        context
                            .contexts
                            .append(&mut parse_context_reference(&mut tokens, name, name_pos)?);
                        continue;
                    }
                    DesignUnit::Context(ContextDeclaration::from_tokens(
                        &mut tokens,
                        name,
                        pos,
                        std::mem::take(&mut context),
                    )?)
                }
                Keyword::Package => match accept_keyword(&mut tokens, &Keyword::Body) {
                    true => DesignUnit::PackageBody(PackageBody::from_tokens(
                        &mut tokens,
                        pos,
                        std::mem::take(&mut context),
                    )?),
                    false => DesignUnit::Package(Package::from_tokens(
                        &mut tokens,
                        pos,
                        std::mem::take(&mut context),
                    )?),
                },
                Keyword::Entity => DesignUnit::Entity(Entity::from_tokens(
                    &mut tokens,
                    pos,
                    std::mem::take(&mut context),
                )?),
                Keyword::Architecture => DesignUnit::Architecture(Architecture::from_tokens(
                    &mut tokens,
                    pos,
                    std::mem::take(&mut context),
                )?),
                Keyword::Configuration => DesignUnit::Configuration(Configuration::from_tokens(
                    &mut tokens,
                    pos,
                    std::mem::take(&mut context),
                )?),
                _ => {
                    return Err(VhdlError::Expecting(
                        pos,
                        String::from("a design unit"),
                        quote(&VhdlToken::Keyword(kw)),
                    ))
                }
            };
            units.push(unit);
        }
        Ok(())
    }

    /// Parses every design unit written before the first syntax error,
    /// returning them along with the error.
    pub fn parse_units(tokens: Vec<Token<VhdlToken>>) -> (Vec<DesignUnit>, Option<VhdlError>) {
        let mut units = Vec::new();
        let err = Self::parse_into(tokens, &mut units).err();
        (units, err)
    }

    /// Parses the source code `s`, stopping at the first lexical or syntax error.
    pub fn read(s: &str) -> Result<Self, VhdlError> {
        Ok(Self {
            units: Self::parse(VhdlTokenizer::read(s)?)?,
        })
    }

    pub fn into_units(self) -> Vec<DesignUnit> {
        self.units
    }
}

/// Formats a token for an error message.
fn quote(tk: &VhdlToken) -> String {
    match tk {
        VhdlToken::EOF => String::from("end of file"),
        _ => format!("'{}'", tk),
    }
}

/// Builds the error for finding token `t` when expecting `expecting`.
pub(super) fn unexpected(t: Token<VhdlToken>, expecting: &str) -> VhdlError {
    let (pos, tk) = t.decouple();
    VhdlError::Expecting(pos, expecting.to_string(), quote(&tk))
}

/// Takes the next token, failing at the end of the file.
pub(super) fn next_token<I>(
    tokens: &mut Peekable<I>,
    expecting: &str,
) -> Result<Token<VhdlToken>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    match tokens.peek() {
        Some(t) if t.as_type().is_eof() == false => (),
        Some(t) => {
            return Err(VhdlError::UnexpectedEof(
                t.locate().clone(),
                expecting.to_string(),
            ))
        }
        None => {
            return Err(VhdlError::UnexpectedEof(
                Position::new(),
                expecting.to_string(),
            ))
        }
    }
    tokens
        .next()
        .ok_or(VhdlError::UnexpectedEof(Position::new(), expecting.to_string()))
}

pub(super) fn peek_keyword<I>(tokens: &mut Peekable<I>, kw: &Keyword) -> bool
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    tokens
        .peek()
        .map(|t| t.as_type().check_keyword(kw))
        .unwrap_or(false)
}

pub(super) fn peek_delimiter<I>(tokens: &mut Peekable<I>, d: &Delimiter) -> bool
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    tokens
        .peek()
        .map(|t| t.as_type().check_delimiter(d))
        .unwrap_or(false)
}

/// Consumes the next token only if it is the keyword `kw`.
pub(super) fn accept_keyword<I>(tokens: &mut Peekable<I>, kw: &Keyword) -> bool
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    match peek_keyword(tokens, kw) {
        true => tokens.next().is_some(),
        false => false,
    }
}

/// Consumes the next token only if it is the delimiter `d`.
pub(super) fn accept_delimiter<I>(tokens: &mut Peekable<I>, d: &Delimiter) -> bool
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    match peek_delimiter(tokens, d) {
        true => tokens.next().is_some(),
        false => false,
    }
}

pub(super) fn expect_keyword<I>(tokens: &mut Peekable<I>, kw: &Keyword) -> Result<Position, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let expecting = format!("'{}'", kw);
    let t = next_token(tokens, &expecting)?;
    match t.as_type().check_keyword(kw) {
        true => Ok(t.into_position()),
        false => Err(unexpected(t, &expecting)),
    }
}

pub(super) fn expect_delimiter<I>(tokens: &mut Peekable<I>, d: &Delimiter) -> Result<Position, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let expecting = format!("'{}'", d);
    let t = next_token(tokens, &expecting)?;
    match t.as_type().check_delimiter(d) {
        true => Ok(t.into_position()),
        false => Err(unexpected(t, &expecting)),
    }
}

pub(super) fn expect_identifier<I>(tokens: &mut Peekable<I>) -> Result<(Identifier, Position), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let (pos, tk) = next_token(tokens, "an identifier")?.decouple();
    match tk {
        VhdlToken::Identifier(id) => Ok((id, pos)),
        other => Err(VhdlError::Expecting(
            pos,
            String::from("an identifier"),
            quote(&other),
        )),
    }
}

/// Collects tokens up to the first token satisfying `stop` outside of any
/// parentheses. The stopping token is consumed and returned separately.
pub(super) fn collect_until<I>(
    tokens: &mut Peekable<I>,
    stop: &dyn Fn(&VhdlToken) -> bool,
) -> Result<(Vec<Token<VhdlToken>>, Token<VhdlToken>), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut stmt = Vec::new();
    let mut depth: usize = 0;
    loop {
        let t = next_token(tokens, "';'")?;
        if depth == 0 && stop(t.as_type()) == true {
            return Ok((stmt, t));
        }
        if t.as_type().check_delimiter(&Delimiter::ParenL) {
            depth += 1;
        } else if t.as_type().check_delimiter(&Delimiter::ParenR) {
            depth = depth.saturating_sub(1);
        }
        stmt.push(t);
    }
}

/// Collects the tokens of a statement, consuming its terminating ';'.
pub(super) fn collect_statement<I>(tokens: &mut Peekable<I>) -> Result<Vec<Token<VhdlToken>>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    Ok(collect_until(tokens, &|t| t.check_delimiter(&Delimiter::Terminator))?.0)
}

/// Parses the remaining parts of a selected name beginning with `first`.
///
/// Returns the name and whether it ended with the `.all` suffix.
fn continue_selected_name<I>(
    tokens: &mut Peekable<I>,
    first: Identifier,
) -> Result<(SelectedName, bool), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut parts = vec![first];
    while accept_delimiter(tokens, &Delimiter::Dot) == true {
        if accept_keyword(tokens, &Keyword::All) == true {
            return Ok((SelectedName(parts), true));
        }
        parts.push(expect_identifier(tokens)?.0);
    }
    Ok((SelectedName(parts), false))
}

/// Parses a selected name: `prefix { . suffix } [ . all ]`.
pub(super) fn parse_selected_name<I>(
    tokens: &mut Peekable<I>,
) -> Result<(SelectedName, bool, Position), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let (first, pos) = expect_identifier(tokens)?;
    let (name, all) = continue_selected_name(tokens, first)?;
    Ok((name, all, pos))
}

/// Consumes the library names after the keyword LIBRARY through the ';'.
pub(super) fn parse_library_clause<I>(tokens: &mut Peekable<I>) -> Result<Vec<LibraryClause>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut libs = Vec::new();
    loop {
        let (name, pos) = expect_identifier(tokens)?;
        libs.push(LibraryClause { name: name, pos: pos });
        if accept_delimiter(tokens, &Delimiter::Comma) == false {
            break;
        }
    }
    expect_delimiter(tokens, &Delimiter::Terminator)?;
    Ok(libs)
}

/// Consumes the selected names after the keyword USE through the ';'.
pub(super) fn parse_use_clause<I>(tokens: &mut Peekable<I>) -> Result<Vec<UseClause>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut uses = Vec::new();
    loop {
        let (name, all, pos) = parse_selected_name(tokens)?;
        uses.push(UseClause::new(name, all, pos));
        if accept_delimiter(tokens, &Delimiter::Comma) == false {
            break;
        }
    }
    expect_delimiter(tokens, &Delimiter::Terminator)?;
    Ok(uses)
}

/// Consumes a context reference whose first identifier `first` was already taken.
fn parse_context_reference<I>(
    tokens: &mut Peekable<I>,
    first: Identifier,
    pos: Position,
) -> Result<Vec<Reference>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let (name, _) = continue_selected_name(tokens, first)?;
    let mut refs = vec![Reference::new(name, pos)];
    while accept_delimiter(tokens, &Delimiter::Comma) == true {
        let (name, _, pos) = parse_selected_name(tokens)?;
        refs.push(Reference::new(name, pos));
    }
    expect_delimiter(tokens, &Delimiter::Terminator)?;
    Ok(refs)
}

/// Consumes the remainder of an END statement: `[keywords] [name] ;`.
///
/// Assumes END was the last token consumed. Each of `keywords` is optional
/// but must appear in the given order. A closing name must match `name`.
pub(super) fn parse_ending<I>(
    tokens: &mut Peekable<I>,
    keywords: &[Keyword],
    name: &Identifier,
) -> Result<(), VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    for kw in keywords {
        if accept_keyword(tokens, kw) == false {
            break;
        }
    }
    if tokens
        .peek()
        .map(|t| t.as_type().as_identifier().is_some())
        .unwrap_or(false)
    {
        let (ending, pos) = expect_identifier(tokens)?;
        if &ending != name {
            return Err(VhdlError::EndingMismatch(
                pos,
                name.to_string(),
                ending.to_string(),
            ));
        }
    }
    expect_delimiter(tokens, &Delimiter::Terminator)?;
    Ok(())
}

/// Consumes the tokens of a region whose contents are not analyzed, through
/// its closing END keyword.
///
/// With no `closing` keyword, stops at the first END that does not close an
/// inner construct. Otherwise stops at `END <closing>`. Subprogram and
/// package bodies nested in the region are skipped as a whole. Returns the
/// skipped tokens.
pub(super) fn skip_region<I>(
    tokens: &mut Peekable<I>,
    closing: Option<&Keyword>,
) -> Result<Vec<Token<VhdlToken>>, VhdlError>
where
    I: Iterator<Item = Token<VhdlToken>>,
{
    let mut skipped = Vec::new();
    let mut depth: usize = 0;
    let mut parens: usize = 0;
    // a FUNCTION, PROCEDURE or PACKAGE awaiting its IS or ';'
    let mut pending_body = false;
    let mut after_colon = false;
    loop {
        let t = next_token(tokens, "'end'")?;
        match t.as_type() {
            VhdlToken::Keyword(Keyword::End) => {
                let inner = tokens
                    .peek()
                    .and_then(|n| n.as_type().as_keyword().copied());
                if let (Some(kw), Some(c)) = (inner, closing) {
                    if depth == 0 && &kw == c {
                        tokens.next();
                        return Ok(skipped);
                    }
                }
                if inner.map(|k| k.closes_inner_construct()) != Some(true) {
                    if depth == 0 && closing.is_none() {
                        return Ok(skipped);
                    }
                    depth = depth.saturating_sub(1);
                }
            }
            VhdlToken::Keyword(Keyword::Function)
            | VhdlToken::Keyword(Keyword::Procedure)
            | VhdlToken::Keyword(Keyword::Package) => {
                // entity classes in attribute specifications are preceded by ':'
                if parens == 0 && after_colon == false {
                    pending_body = true;
                }
            }
            VhdlToken::Keyword(Keyword::Is) => {
                if pending_body == true && peek_keyword(tokens, &Keyword::New) == false {
                    depth += 1;
                }
                pending_body = false;
            }
            VhdlToken::Delimiter(Delimiter::Terminator) => pending_body = false,
            VhdlToken::Delimiter(Delimiter::ParenL) => parens += 1,
            VhdlToken::Delimiter(Delimiter::ParenR) => parens = parens.saturating_sub(1),
            _ => (),
        }
        after_colon = t.as_type().check_delimiter(&Delimiter::Colon);
        skipped.push(t);
    }
}

/// Detects the names referenced within a list of tokens.
///
/// Attribute designators (after a tick), record element selections and formal
/// parts of named associations are not references.
pub fn collect_refs(tokens: &[Token<VhdlToken>]) -> Vec<Reference> {
    let mut refs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let id = match tokens[i].as_type().as_identifier() {
            Some(id) => id,
            None => {
                i += 1;
                continue;
            }
        };
        let is_suffix = i > 0
            && (tokens[i - 1]
                .as_type()
                .check_delimiter(&Delimiter::SingleQuote)
                || tokens[i - 1].as_type().check_delimiter(&Delimiter::Dot));
        let mut parts = vec![id.clone()];
        let mut j = i + 1;
        while j + 1 < tokens.len() && tokens[j].as_type().check_delimiter(&Delimiter::Dot) {
            match tokens[j + 1].as_type().as_identifier() {
                Some(next) => {
                    parts.push(next.clone());
                    j += 2;
                }
                None => break,
            }
        }
        let is_formal = tokens
            .get(j)
            .map(|t| t.as_type().check_delimiter(&Delimiter::Arrow))
            .unwrap_or(false);
        if is_suffix == false && is_formal == false {
            refs.push(Reference::new(
                SelectedName(parts),
                tokens[i].locate().clone(),
            ));
        }
        i = j;
    }
    refs
}

/// Detects only the expanded names (`lib.pkg.item`, `pkg.item`) within a list of tokens.
pub fn collect_expanded_refs(tokens: &[Token<VhdlToken>]) -> Vec<Reference> {
    collect_refs(tokens)
        .into_iter()
        .filter(|r| r.get_name().is_expanded())
        .collect()
}

/// Collects the leading simple name of every reference within a list of
/// tokens, without repeats.
pub fn collect_mentions(tokens: &[Token<VhdlToken>]) -> Vec<Identifier> {
    let mut names: Vec<Identifier> = Vec::new();
    for r in collect_refs(tokens) {
        let first = r.get_name().first();
        if names.contains(first) == false {
            names.push(first.clone());
        }
    }
    names
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(s: &str) -> Vec<Token<VhdlToken>> {
        VhdlTokenizer::read(s)
            .unwrap()
            .into_iter()
            .filter(|t| t.as_type().as_comment().is_none())
            .collect()
    }

    fn names(refs: &[Reference]) -> Vec<String> {
        refs.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn parse_use_clause_list() {
        let mut t = tokens("work.pkg_b.BYTE, work.pkg_c.all, ieee.numeric_std; entity").into_iter().peekable();
        let uses = parse_use_clause(&mut t).unwrap();
        assert_eq!(uses.len(), 3);
        assert_eq!(uses[0].get_name().to_string(), "work.pkg_b.BYTE");
        assert_eq!(uses[0].is_all(), false);
        assert_eq!(uses[1].to_string(), "work.pkg_c.all");
        assert_eq!(uses[1].get_name().len(), 2);
        assert_eq!(uses[2].is_all(), false);
        assert_eq!(t.next().unwrap().as_type().check_keyword(&Keyword::Entity), true);
    }

    #[test]
    fn refs_skip_attributes_and_formals() {
        let refs = collect_refs(&tokens(
            "BYTE'high + work.pkg_b.K + f(x => MAX) + r.field + (others => NUL)",
        ));
        assert_eq!(names(&refs), vec!["BYTE", "work.pkg_b.K", "f", "MAX", "r.field", "NUL"]);
        assert_eq!(refs[0].get_position(), &Position::place(1, 1));
    }

    #[test]
    fn expanded_refs_only() {
        let refs = collect_expanded_refs(&tokens("x <= work.pkg_a.K + y; u : entity work.top;"));
        assert_eq!(names(&refs), vec!["work.pkg_a.K", "work.top"]);
    }

    #[test]
    fn mentions_are_leading_names() {
        let found = collect_mentions(&tokens("x := MAX + max; y := r.field; return work.p.K;"));
        let found: Vec<String> = found.iter().map(|i| i.to_string()).collect();
        assert_eq!(found, vec!["x", "MAX", "y", "r", "work"]);
    }

    #[test]
    fn ending_names_must_match() {
        let name = Identifier::Basic("pkg_a".to_owned());
        let mut t = tokens("package PKG_A;").into_iter().peekable();
        assert_eq!(parse_ending(&mut t, &[Keyword::Package], &name), Ok(()));

        let mut t = tokens(";").into_iter().peekable();
        assert_eq!(parse_ending(&mut t, &[Keyword::Package], &name), Ok(()));

        let mut t = tokens("package pkg_b;").into_iter().peekable();
        assert_eq!(
            parse_ending(&mut t, &[Keyword::Package], &name),
            Err(VhdlError::EndingMismatch(
                Position::place(1, 9),
                "pkg_a".to_owned(),
                "pkg_b".to_owned()
            ))
        );
    }

    #[test]
    fn skip_nested_bodies() {
        let s = "\
    function f return integer is
    begin
        if true then return 1; end if;
        return work.pkg_a.K;
    end function;
    attribute a of f : function is 1;
begin
    process begin wait; end process;
end architecture rtl; entity";
        let mut t = tokens(s).into_iter().peekable();
        let skipped = skip_region(&mut t, None).unwrap();
        assert_eq!(names(&collect_expanded_refs(&skipped)), vec!["work.pkg_a.K"]);
        assert_eq!(t.next().unwrap().as_type().check_keyword(&Keyword::Architecture), true);
    }

    #[test]
    fn skip_until_closing_keyword() {
        let s = "procedure p is begin end procedure; end protected body; x";
        let mut t = tokens(s).into_iter().peekable();
        skip_region(&mut t, Some(&Keyword::Protected)).unwrap();
        assert_eq!(t.next().unwrap().as_type().check_keyword(&Keyword::Body), true);
    }

    #[test]
    fn unexpected_end_of_file() {
        let mut t = tokens("begin x <= y;").into_iter().peekable();
        assert_eq!(
            skip_region(&mut t, None),
            Err(VhdlError::UnexpectedEof(Position::place(1, 14), "'end'".to_owned()))
        );
    }

    #[test]
    fn units_before_syntax_error_are_kept() {
        let s = "package a is end package;\npackage b is\n  constant K integer;\nend package;";
        let (units, err) = VhdlParser::parse_units(tokens(s));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].get_name().to_string(), "a");
        assert_eq!(err.map(|e| e.locate().cloned()), Some(Some(Position::place(3, 3))));

        let (units, err) = VhdlParser::parse_units(tokens("package a is end package; package b is"));
        assert_eq!(units.len(), 1);
        assert_eq!(
            err,
            Some(VhdlError::UnexpectedEof(Position::place(1, 39), "'end'".to_owned()))
        );
    }

    #[test]
    fn selected_name_from_str() {
        let name = SelectedName::from_str("work.pkg_a").unwrap();
        assert_eq!(name.first(), &Identifier::Basic("WORK".to_owned()));
        assert_eq!(name.last().to_string(), "pkg_a");
        assert!(SelectedName::from_str("work..pkg").is_err());
    }

    #[test]
    fn parse_design_file() {
        let s = "\
library ieee;
use ieee.std_logic_1164.all;
use work.pkg_b.BYTE;
package pkg_c is
    constant K : BYTE;
end package;

package body pkg_c is
    constant K : BYTE := 3;
end package body pkg_c;

context ctx is
    library ieee;
    use ieee.numeric_std.all;
end context;

context work.ctx;
entity top is
    port (clk : in std_logic);
end entity;

architecture rtl of top is
begin
end rtl;
";
        let units = VhdlParser::read(s).unwrap().into_units();
        assert_eq!(units.len(), 5);
        assert_eq!(units[0].get_kind(), UnitKind::Package);
        assert_eq!(units[0].get_context().get_libraries().len(), 1);
        assert_eq!(units[0].get_context().get_uses().len(), 2);
        // context items only apply to the following unit
        assert_eq!(units[1].get_context().is_empty(), true);
        assert_eq!(units[1].get_kind(), UnitKind::PackageBody);
        assert_eq!(units[2].get_kind(), UnitKind::Context);
        assert_eq!(units[3].get_context().get_contexts()[0].to_string(), "work.ctx");
        assert_eq!(units[4].to_string(), "top(rtl)");
        assert_eq!(units[4].get_owner(), Some(&Identifier::Basic("top".to_owned())));
    }

    #[test]
    fn unknown_top_level_item() {
        let err = VhdlParser::read("signal s : bit;").unwrap_err();
        assert_eq!(
            err,
            VhdlError::Expecting(
                Position::place(1, 1),
                "a design unit".to_owned(),
                "'signal'".to_owned()
            )
        );
    }
}
