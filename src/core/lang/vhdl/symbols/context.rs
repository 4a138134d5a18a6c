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

use super::*;

/// A context declaration: a named, reusable group of context items.
#[derive(Debug, PartialEq)]
pub struct ContextDeclaration {
    name: Identifier,
    pos: Position,
    /// Context items written before the declaration.
    context: ContextClause,
    /// Context items the declaration provides.
    clause: ContextClause,
    refs: Vec<Reference>,
}

impl ContextDeclaration {
    /// Parses the items of a context declaration after `CONTEXT <name> IS`.
    pub fn from_tokens<I>(
        tokens: &mut Peekable<I>,
        name: Identifier,
        pos: Position,
        context: ContextClause,
    ) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let mut clause = ContextClause::new();
        loop {
            let t = next_token(tokens, "'end'")?;
            let kw = match t.as_type().as_keyword() {
                Some(Keyword::End) => break,
                Some(Keyword::Library) => Keyword::Library,
                Some(Keyword::Use) => Keyword::Use,
                Some(Keyword::Context) => Keyword::Context,
                _ => return Err(unexpected(t, "'library', 'use', 'context' or 'end'")),
            };
            clause.parse_item(tokens, &kw)?;
        }
        parse_ending(tokens, &[Keyword::Context], &name)?;
        Ok(Self {
            name: name,
            pos: pos,
            context: context,
            clause: clause,
            refs: Vec::new(),
        })
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    pub fn get_context(&self) -> &ContextClause {
        &self.context
    }

    /// References the context items this declaration makes available to the
    /// units that reference it.
    pub fn get_clause(&self) -> &ContextClause {
        &self.clause
    }

    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_items() {
        let s = "\
context bytes is
    library ieee;
    use ieee.std_logic_1164.all;
    use work.pkg_b.BYTE, work.pkg_c.all;
    context work.base;
end context bytes;";
        let units = VhdlParser::read(s).unwrap().into_units();
        let ctx = units[0].as_context().unwrap();
        assert_eq!(ctx.get_clause().get_libraries().len(), 1);
        assert_eq!(ctx.get_clause().get_uses().len(), 3);
        assert_eq!(ctx.get_clause().get_contexts().len(), 1);
    }

    #[test]
    fn signal_not_allowed() {
        let err = VhdlParser::read("context c is signal s : bit; end;").unwrap_err();
        assert_eq!(
            err,
            VhdlError::Expecting(
                Position::place(1, 14),
                "'library', 'use', 'context' or 'end'".to_owned(),
                "'signal'".to_owned()
            )
        );
    }
}
