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

#[derive(Debug, PartialEq)]
pub struct Configuration {
    name: Identifier,
    entity: Identifier,
    pos: Position,
    context: ContextClause,
    refs: Vec<Reference>,
}

impl Configuration {
    /// Parses a configuration declaration after its CONFIGURATION keyword.
    pub fn from_tokens<I>(
        tokens: &mut Peekable<I>,
        pos: Position,
        context: ContextClause,
    ) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let (name, _) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Of)?;
        let (entity, _) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        let refs = collect_expanded_refs(&skip_region(tokens, None)?);
        parse_ending(tokens, &[Keyword::Configuration], &name)?;
        Ok(Self {
            name: name,
            entity: entity,
            pos: pos,
            context: context,
            refs: refs,
        })
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_entity(&self) -> &Identifier {
        &self.entity
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    pub fn get_context(&self) -> &ContextClause {
        &self.context
    }

    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_block_configuration() {
        let s = "\
configuration cfg of top is
    for rtl
        for u0 : comp
            use entity work.adder(rtl);
        end for;
    end for;
end configuration cfg;";
        let units = VhdlParser::read(s).unwrap().into_units();
        assert_eq!(units[0].get_kind(), UnitKind::Configuration);
        assert_eq!(units[0].get_owner(), Some(&Identifier::Basic("top".to_owned())));
        let refs: Vec<String> = units[0].get_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(refs, vec!["work.adder"]);
    }
}
