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

use super::declaration::{Declaration, DeclarativePart};
use super::*;

#[derive(Debug, PartialEq)]
pub struct PackageBody {
    name: Identifier,
    pos: Position,
    context: ContextClause,
    decls: Vec<Declaration>,
    refs: Vec<Reference>,
}

impl PackageBody {
    /// Parses a package body after its PACKAGE BODY keywords.
    pub fn from_tokens<I>(
        tokens: &mut Peekable<I>,
        pos: Position,
        mut context: ContextClause,
    ) -> Result<Self, VhdlError>
    where
        I: Iterator<Item = Token<VhdlToken>>,
    {
        let (name, _) = expect_identifier(tokens)?;
        expect_keyword(tokens, &Keyword::Is)?;
        let (decls, mut uses, refs) = DeclarativePart::from_tokens(tokens)?.into_parts();
        expect_keyword(tokens, &Keyword::End)?;
        parse_ending(tokens, &[Keyword::Package, Keyword::Body], &name)?;
        context.add_uses(&mut uses);
        Ok(Self {
            name: name,
            pos: pos,
            context: context,
            decls: decls,
            refs: refs,
        })
    }

    /// Returns the name of the package this body completes.
    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    pub fn get_context(&self) -> &ContextClause {
        &self.context
    }

    pub fn get_decls(&self) -> &Vec<Declaration> {
        &self.decls
    }

    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn body_with_subprograms() {
        let s = "\
package body pkg_a is
    constant K : INTEGER := 1;
    function f(x : INTEGER) return INTEGER is
    begin
        return x + K;
    end function;
end package body pkg_a;";
        let units = VhdlParser::read(s).unwrap().into_units();
        let body = units[0].as_package_body().unwrap();
        assert_eq!(body.get_name(), &Identifier::Basic("PKG_A".to_owned()));
        assert_eq!(body.get_decls().len(), 2);
        assert_eq!(units[0].get_owner(), Some(body.get_name()));
    }

    #[test]
    fn short_ending() {
        let units = VhdlParser::read("package body p is end;").unwrap().into_units();
        assert_eq!(units.len(), 1);
    }
}
