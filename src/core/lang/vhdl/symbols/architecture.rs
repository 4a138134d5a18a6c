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
pub struct Architecture {
    name: Identifier,
    entity: Identifier,
    pos: Position,
    context: ContextClause,
    refs: Vec<Reference>,
}

impl Architecture {
    /// Parses an architecture after its ARCHITECTURE keyword. Only the
    /// expanded names within its body are recorded.
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
        parse_ending(tokens, &[Keyword::Architecture], &name)?;
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

    /// Returns the name of the entity this architecture implements.
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
    fn instances_are_recorded() {
        let s = "\
architecture rtl of top is
    signal s : bit;
    component comp is
        port (x : in bit);
    end component;
begin
    u0 : entity work.adder port map (a => s);
    u1 : comp port map (x => s);
    gen : for i in 0 to 3 generate
    begin
    end generate;
    process begin
        wait;
    end process;
end architecture rtl;";
        let units = VhdlParser::read(s).unwrap().into_units();
        assert_eq!(units.len(), 1);
        let refs: Vec<String> = units[0].get_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(refs, vec!["work.adder"]);
        assert_eq!(units[0].to_string(), "top(rtl)");
    }
}
