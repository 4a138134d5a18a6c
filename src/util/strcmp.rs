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

/// Compares to string references `s0` and `s1` with case conversion.
///
/// Returns `true` if they are deemed equivalent without regarding case sensitivity.
pub fn cmp_ignore_case(s0: &str, s1: &str) -> bool {
    let mut s0 = s0.chars().flat_map(|c| c.to_lowercase());
    let mut s1 = s1.chars().flat_map(|c| c.to_lowercase());
    loop {
        match (s0.next(), s1.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => (),
            _ => return false,
        }
    }
}

/// Compares to string references `s0` and `s1` with only ascii case conversion.
pub fn cmp_ascii_ignore_case(s0: &str, s1: &str) -> bool {
    s0.len() == s1.len()
        && s0
            .chars()
            .zip(s1.chars())
            .all(|(a, b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ignore_case() {
        assert_eq!(cmp_ignore_case("PKG_A", "pkg_a"), true);
        assert_eq!(cmp_ignore_case("pkg_a", "pkg_b"), false);
        assert_eq!(cmp_ignore_case("pkg", "pkg_a"), false);
        assert_eq!(cmp_ignore_case("ÄB", "äb"), true);
    }

    #[test]
    fn ascii_ignore_case() {
        assert_eq!(cmp_ascii_ignore_case("ELAB", "elab"), true);
        assert_eq!(cmp_ascii_ignore_case("elab", "elabs"), false);
        assert_eq!(cmp_ascii_ignore_case("ÄB", "äb"), false);
    }
}
