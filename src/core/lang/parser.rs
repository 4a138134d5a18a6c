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

use super::lexer::Token;

pub trait Parse<T> {
    type SymbolType;
    type SymbolError;

    /// Builds every symbol found in `tokens`, stopping at the first error.
    fn parse(tokens: Vec<Token<T>>) -> Result<Vec<Self::SymbolType>, Self::SymbolError>;
}
