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

use glob::{Pattern, PatternError};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, PartialEq, Clone)]
pub struct Style(Pattern);

impl Style {
    fn inner(&self) -> &Pattern {
        &self.0
    }
}

impl From<Pattern> for Style {
    fn from(value: Pattern) -> Self {
        Self(value)
    }
}

impl FromStr for Style {
    type Err = FilesetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() == true {
            return Err(FilesetError::EmptyPattern);
        }
        match Pattern::new(&("**/".to_owned() + s)) {
            Ok(p) => Ok(p.into()),
            Err(e) => Err(FilesetError::PatternError(s.to_string(), e)),
        }
    }
}

#[derive(Debug)]
pub enum FilesetError {
    EmptyPattern,
    PatternError(String, PatternError),
    MissingPath(PathBuf),
}

impl std::error::Error for FilesetError {}

impl std::fmt::Display for FilesetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::EmptyPattern => write!(f, "empty pattern"),
            Self::PatternError(p, e) => write!(f, "'{}' {}", p, e.to_string().to_lowercase()),
            Self::MissingPath(p) => write!(f, "path {:?} does not exist", p),
        }
    }
}

/// The set of glob-style patterns selecting source files from directories.
#[derive(Debug, PartialEq)]
pub struct Fileset {
    patterns: Vec<Style>,
}

impl Fileset {
    pub fn new(patterns: &[String]) -> Result<Self, FilesetError> {
        Ok(Self {
            patterns: patterns
                .iter()
                .map(|p| Style::from_str(p))
                .collect::<Result<Vec<Style>, FilesetError>>()?,
        })
    }

    /// Checks if the `file` matches any of the patterns (case-insensitive).
    pub fn matches(&self, file: &str) -> bool {
        let match_opts = glob::MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.inner().matches_with(file, match_opts) == true)
    }

    /// Collects the source files named by `paths`.
    ///
    /// Files are always kept. Directories are walked recursively, honoring
    /// ignore files, and keep the files matching the patterns in sorted
    /// order. A path given twice is only collected once.
    pub fn gather(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, FilesetError> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();
        for path in paths {
            if path.is_file() == true {
                if seen.insert(path.clone()) == true {
                    files.push(path.clone());
                }
            } else if path.is_dir() == true {
                for f in self.walk(path) {
                    if seen.insert(f.clone()) == true {
                        files.push(f);
                    }
                }
            } else {
                return Err(FilesetError::MissingPath(path.clone()));
            }
        }
        Ok(files)
    }

    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkBuilder::new(dir)
            .hidden(false)
            .build()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && self.matches(&p.to_string_lossy()))
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn default_set() -> Fileset {
        Fileset::new(&["*.vhd".to_owned(), "*.vhdl".to_owned()]).unwrap()
    }

    #[test]
    fn detect_vhdl_files() {
        let fset = default_set();
        assert_eq!(fset.matches("filename.vhd"), true);
        assert_eq!(fset.matches("filename.VHD"), true);
        assert_eq!(fset.matches("rtl/filename.VHdL"), true);
        assert_eq!(fset.matches("filename.v"), false);
        assert_eq!(fset.matches("filename"), false);
        assert_eq!(fset.matches("filename.sv"), false);
    }

    #[test]
    fn bad_patterns() {
        assert_eq!(Fileset::new(&["".to_owned()]).is_err(), true);
        assert_eq!(Fileset::new(&["[".to_owned()]).is_err(), true);
    }

    #[test]
    fn gather_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("rtl/sub")).unwrap();
        std::fs::write(root.join("rtl/b.vhd"), "").unwrap();
        std::fs::write(root.join("rtl/a.vhd"), "").unwrap();
        std::fs::write(root.join("rtl/sub/c.vhdl"), "").unwrap();
        std::fs::write(root.join("rtl/notes.txt"), "").unwrap();
        std::fs::write(root.join("extra.txt"), "").unwrap();

        let files = default_set()
            .gather(&[root.join("rtl"), root.join("extra.txt"), root.join("rtl/a.vhd")])
            .unwrap();
        assert_eq!(
            files,
            vec![
                root.join("rtl/a.vhd"),
                root.join("rtl/b.vhd"),
                root.join("rtl/sub/c.vhdl"),
                root.join("extra.txt"),
            ]
        );
    }

    #[test]
    fn missing_path() {
        let dir = tempfile::tempdir().unwrap();
        match default_set().gather(&[dir.path().join("missing")]) {
            Err(FilesetError::MissingPath(_)) => (),
            _ => panic!("expected a missing path error"),
        }
    }
}
