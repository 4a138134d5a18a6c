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

use super::declaration::{parse_interface_list, Declaration};
use super::*;

#[derive(Debug, PartialEq)]
pub struct Entity {
    name: Identifier,
    pos: Position,
    context: ContextClause,
    generics: Vec<Declaration>,
    ports: Vec<Declaration>,
    /// Expanded names found in the entity's header and body.
    refs: Vec<Reference>,
}

impl Entity {
    /// Parses an entity after its ENTITY keyword. The declarative and
    /// statement parts are skipped.
    pub fn from_tokens<I>(
        tokens: &mut Peekable<I>,
        pos: Position,
        context: ContextClause,
    ) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let (name, _) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        let mut generics = Vec::new();
        let mut ports = Vec::new();
        if accept_keyword(tokens, &Keyword::Generic) == true {
            generics = parse_interface_list(tokens)?;
            expect_delimiter(tokens, &Delimiter::Terminator)?;
        }
        if accept_keyword(tokens, &Keyword::Port) == true {
            ports = parse_interface_list(tokens)?;
            expect_delimiter(tokens, &Delimiter::Terminator)?;
        }
        let mut refs: Vec<Reference> = generics
            .iter()
            .chain(ports.iter())
            .flat_map(|d| d.get_refs().iter())
            .filter(|r| r.get_name().is_expanded())
            .cloned()
            .collect();
        refs.append(&mut collect_expanded_refs(&skip_region(tokens, None)?));
        parse_ending(tokens, &[Keyword::Entity], &name)?;
        Ok(Self {
            name: name,
            pos: pos,
            context: context,
            generics: generics,
            ports: ports,
            refs: refs,
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

    pub fn get_generics(&self) -> &Vec<Declaration> {
        &self.generics
    }

    pub fn get_ports(&self) -> &Vec<Declaration> {
        &self.ports
    }

    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }
}
