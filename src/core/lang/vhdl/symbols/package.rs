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

use super::declaration::{parse_interface_list, DeclKind, Declaration, DeclarativePart};
use super::*;

/// A package declaration, or a package instantiation when `instance_of` is set.
#[derive(Debug, PartialEq)]
pub struct Package {
    name: Identifier,
    pos: Position,
    context: ContextClause,
    generics: Vec<Declaration>,
    decls: Vec<Declaration>,
    refs: Vec<Reference>,
    instance_of: Option<Reference>,
}

impl Package {
    /// Parses a package declaration after its PACKAGE keyword.
    ///
    /// `pos` is the position of the PACKAGE keyword and `context` is the
    /// context clause written before it.
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

        if accept_keyword(tokens, &Keyword::New) == true {
            let (target, _, target_pos) = parse_selected_name(tokens)?;
            let rest = collect_statement(tokens)?;
            return Ok(Self {
                name: name,
                pos: pos,
                context: context,
                generics: Vec::new(),
                decls: Vec::new(),
                refs: collect_refs(&rest),
                instance_of: Some(Reference::new(target, target_pos)),
            });
        }

        let mut generics = Vec::new();
        if accept_keyword(tokens, &Keyword::Generic) == true {
            generics = parse_interface_list(tokens)?;
            // a generic map makes this a generic-mapped package
            if accept_keyword(tokens, &Keyword::Generic) == true {
                expect_keyword(tokens, &Keyword::Map)?;
                collect_until(tokens, &|t| t.check_delimiter(&Delimiter::Terminator))?;
            } else {
                expect_delimiter(tokens, &Delimiter::Terminator)?;
            }
        }
        let (decls, mut uses, refs) = DeclarativePart::from_tokens(tokens)?.into_parts();
        expect_keyword(tokens, &Keyword::End)?;
        parse_ending(tokens, &[Keyword::Package], &name)?;
        context.add_uses(&mut uses);

        Ok(Self {
            name: name,
            pos: pos,
            context: context,
            generics: generics,
            decls: decls,
            refs: refs,
            instance_of: None,
        })
    }

    pub fn get_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_position(&self) -> &Position {
        &self.pos
    }

    /// References the context clause, including any use clauses written
    /// within the package's declarative part.
    pub fn get_context(&self) -> &ContextClause {
        &self.context
    }

    pub fn get_generics(&self) -> &Vec<Declaration> {
        &self.generics
    }

    pub fn get_decls(&self) -> &Vec<Declaration> {
        &self.decls
    }

    pub fn get_refs(&self) -> &Vec<Reference> {
        &self.refs
    }

    /// Returns the uninstantiated package this package is an instance of.
    pub fn get_instance_of(&self) -> Option<&Reference> {
        self.instance_of.as_ref()
    }

    /// Iterates over the deferred constants declared by the package.
    pub fn deferred_constants(&self) -> impl Iterator<Item = &Declaration> {
        self.decls
            .iter()
            .filter(|d| d.get_kind() == &DeclKind::DeferredConstant)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn package(s: &str) -> Package {
        match VhdlParser::read(s).unwrap().into_units().remove(0) {
            DesignUnit::Package(p) => p,
            _ => panic!("not a package"),
        }
    }

    #[test]
    fn package_with_deferred_constant() {
        let p = package(
            "\
use work.pkg_b.BYTE;
package pkg_c is
    constant K : BYTE;
end package;",
        );
        assert_eq!(p.get_name(), &Identifier::Basic("pkg_c".to_owned()));
        assert_eq!(p.get_position(), &Position::place(2, 1));
        assert_eq!(p.get_context().get_uses()[0].to_string(), "work.pkg_b.BYTE");
        assert_eq!(p.deferred_constants().count(), 1);
        assert_eq!(p.get_instance_of(), None);
    }

    #[test]
    fn generic_package_and_nested_use() {
        let p = package(
            "\
package fifo_pkg is
    generic (type T; DEPTH : natural := 4);
    use work.pkg_b.all;
    type mem is array (0 to DEPTH-1) of T;
end package fifo_pkg;",
        );
        assert_eq!(p.get_generics().len(), 2);
        assert_eq!(p.get_decls().len(), 1);
        assert_eq!(p.get_context().get_uses()[0].to_string(), "work.pkg_b.all");
    }

    #[test]
    fn package_instantiation() {
        let p = package("package byte_fifo is new work.fifo_pkg generic map (T => BYTE);");
        assert_eq!(
            p.get_instance_of().unwrap().to_string(),
            "work.fifo_pkg"
        );
        let refs: Vec<String> = p.get_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(refs, vec!["BYTE"]);
    }

    #[test]
    fn ending_must_match() {
        assert_eq!(
            VhdlParser::read("package a is end package b;").unwrap_err(),
            VhdlError::EndingMismatch(Position::place(1, 26), "a".to_owned(), "b".to_owned())
        );
    }
}
