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

use crate::util::anyerror::{AnyError, Fault};
use serde_derive::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const CONFIG_FILE: &str = "vhdelab.toml";

/// Directory under the user's home directory holding the global configuration.
pub const GLOBAL_DIR: &str = ".vhdelab";

pub const GLOBAL_FILE: &str = "config.toml";

pub trait FromFile: FromStr
where
    Self: Sized,
    <Self as std::str::FromStr>::Err: 'static + std::error::Error,
{
    fn from_file(path: &PathBuf) -> Result<Self, Fault> {
        // try to open the file in read-only mode
        let text = std::fs::read_to_string(&path)?;
        Ok(Self::from_str(&text)?)
    }
}

/// How strictly to treat a deferred constant whose package has no body.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Allow,
    Warn,
    Error,
}

impl Default for Level {
    fn default() -> Self {
        Self::Warn
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    library: Option<String>,
    patterns: Option<Vec<String>>,
}

impl General {
    /// Merges any populated data from `rhs` into attributes that do not already
    /// have data defined in `self`.
    pub fn merge(&mut self, rhs: Option<Self>) {
        if let Some(rhs) = rhs {
            if self.library.is_none() {
                self.library = rhs.library;
            }
            if self.patterns.is_none() {
                self.patterns = rhs.patterns;
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PragmaConfig {
    directive: Option<String>,
}

impl PragmaConfig {
    pub fn merge(&mut self, rhs: Option<Self>) {
        if let Some(rhs) = rhs {
            if self.directive.is_none() {
                self.directive = rhs.directive;
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Check {
    #[serde(rename = "deferred-constants")]
    deferred_constants: Option<Level>,
    #[serde(rename = "unused-imports")]
    unused_imports: Option<bool>,
}

impl Check {
    pub fn merge(&mut self, rhs: Option<Self>) {
        if let Some(rhs) = rhs {
            if self.deferred_constants.is_none() {
                self.deferred_constants = rhs.deferred_constants;
            }
            if self.unused_imports.is_none() {
                self.unused_imports = rhs.unused_imports;
            }
        }
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    general: Option<General>,
    pragma: Option<PragmaConfig>,
    check: Option<Check>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the new information to the existing configuration to combine data.
    ///
    /// Existing data in `self` has precedence over any incoming data from `rhs`.
    pub fn append(&mut self, rhs: Self) {
        match &mut self.general {
            Some(v) => v.merge(rhs.general),
            None => self.general = rhs.general,
        }
        match &mut self.pragma {
            Some(v) => v.merge(rhs.pragma),
            None => self.pragma = rhs.pragma,
        }
        match &mut self.check {
            Some(v) => v.merge(rhs.check),
            None => self.check = rhs.check,
        }
    }

    /// Returns the name of the working library (default `work`).
    pub fn get_library(&self) -> &str {
        self.general
            .as_ref()
            .and_then(|g| g.library.as_deref())
            .unwrap_or("work")
    }

    /// Returns the glob-style patterns of files collected from directories.
    pub fn get_patterns(&self) -> Vec<String> {
        match self.general.as_ref().and_then(|g| g.patterns.as_ref()) {
            Some(p) => p.clone(),
            None => vec![String::from("*.vhd"), String::from("*.vhdl")],
        }
    }

    /// Returns the word that follows '@' in a pragma comment (default `elab`).
    pub fn get_directive(&self) -> &str {
        self.pragma
            .as_ref()
            .and_then(|p| p.directive.as_deref())
            .unwrap_or(crate::core::lang::vhdl::pragma::DEFAULT_DIRECTIVE)
    }

    pub fn get_deferred_constants(&self) -> Level {
        self.check
            .as_ref()
            .and_then(|c| c.deferred_constants)
            .unwrap_or_default()
    }

    pub fn warn_unused_imports(&self) -> bool {
        self.check
            .as_ref()
            .and_then(|c| c.unused_imports)
            .unwrap_or(true)
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl FromFile for Config {
    fn from_file(path: &PathBuf) -> Result<Self, Fault> {
        // verify the path exists
        if path.is_file() == false {
            return Err(AnyError(format!(
                "failed to locate configuration file \"{}\"",
                path.display()
            )))?;
        }
        let contents = std::fs::read_to_string(&path)?;
        match Self::from_str(&contents) {
            Ok(r) => Ok(r),
            Err(e) => Err(AnyError(format!(
                "failed to parse \"{}\" file: {}",
                path.display(),
                e
            )))?,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Locality {
    Explicit,
    Local,
    Global,
}

/// The configuration files found for a single run, before being combined.
#[derive(Debug, PartialEq)]
pub struct Configs {
    inner: Vec<(PathBuf, Config, Locality)>,
}

impl Configs {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    /// Loads the configuration file at `file`.
    pub fn load(mut self, file: PathBuf, lvl: Locality) -> Result<Self, Fault> {
        let cfg = Config::from_file(&file)?;
        self.inner.push((file, cfg, lvl));
        Ok(self)
    }

    /// Loads the configuration file at `file` only if it exists.
    pub fn load_if_exists(self, file: PathBuf, lvl: Locality) -> Result<Self, Fault> {
        match file.is_file() {
            true => self.load(file, lvl),
            false => Ok(self),
        }
    }

    /// Loads every configuration layer: the `explicit` file (which must
    /// exist), the local file in the current directory, and the global file
    /// in the user's home directory.
    pub fn discover(explicit: Option<&PathBuf>) -> Result<Self, Fault> {
        Self::discover_from(explicit, &PathBuf::from("."), home::home_dir().as_ref())
    }

    /// Loads the configuration layers with the local file read from `cwd`
    /// and the global file read under `home`.
    fn discover_from(
        explicit: Option<&PathBuf>,
        cwd: &PathBuf,
        home: Option<&PathBuf>,
    ) -> Result<Self, Fault> {
        let mut configs = Self::new();
        if let Some(path) = explicit {
            configs = configs.load(path.clone(), Locality::Explicit)?;
        }
        configs = configs.load_if_exists(cwd.join(CONFIG_FILE), Locality::Local)?;
        if let Some(home) = home {
            configs =
                configs.load_if_exists(home.join(GLOBAL_DIR).join(GLOBAL_FILE), Locality::Global)?;
        }
        Ok(configs)
    }

    /// Lists the files that were loaded.
    pub fn get_files(&self) -> Vec<&PathBuf> {
        self.inner.iter().map(|(p, _, _)| p).collect()
    }
}

impl From<Configs> for Config {
    /// Transform the multi-layered configurations into a single level.
    ///
    /// This function processes configurations in the following order:
    /// 1. EXPLICIT
    /// 2. LOCAL
    /// 3. GLOBAL
    ///
    /// Once a value is set (not None), then it will not be overridden by any
    /// configuration file later in the processing order.
    fn from(value: Configs) -> Self {
        let mut single = Config::new();
        let mut layers = value.inner;
        for lvl in [Locality::Explicit, Locality::Local, Locality::Global] {
            while let Some(i) = layers.iter().position(|p| p.2 == lvl) {
                single.append(layers.remove(i).1);
            }
        }
        single
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const C_0: &str = r#"
# This is a blank configuration file.
"#;

    const C_1: &str = r#"
[general]
library = "lib_a"
patterns = ["*.vhd"]

[pragma]
directive = "order"

[check]
deferred-constants = "error"
unused-imports = false
"#;

    #[test]
    fn parse_empty_config() {
        let cfg = Config::from_str(C_0).unwrap();
        assert_eq!(cfg, Config::new());
        assert_eq!(cfg.get_library(), "work");
        assert_eq!(cfg.get_patterns(), vec!["*.vhd", "*.vhdl"]);
        assert_eq!(cfg.get_directive(), "elab");
        assert_eq!(cfg.get_deferred_constants(), Level::Warn);
        assert_eq!(cfg.warn_unused_imports(), true);
    }

    #[test]
    fn parse_full_config() {
        let cfg = Config::from_str(C_1).unwrap();
        assert_eq!(cfg.get_library(), "lib_a");
        assert_eq!(cfg.get_patterns(), vec!["*.vhd"]);
        assert_eq!(cfg.get_directive(), "order");
        assert_eq!(cfg.get_deferred_constants(), Level::Error);
        assert_eq!(cfg.warn_unused_imports(), false);
    }

    #[test]
    fn reject_unknown_keys() {
        assert_eq!(Config::from_str("[general]\nlibary = \"x\"\n").is_err(), true);
        assert_eq!(Config::from_str("[checks]\n").is_err(), true);
        assert_eq!(
            Config::from_str("[check]\ndeferred-constants = \"sometimes\"\n").is_err(),
            true
        );
    }

    #[test]
    fn higher_layers_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, text: &str| -> PathBuf {
            let path = dir.path().join(name);
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(text.as_bytes()).unwrap();
            path
        };
        let global = write("global.toml", C_1);
        let local = write("local.toml", "[general]\nlibrary = \"mine\"\n");
        let cfg: Config = Configs::new()
            .load(global, Locality::Global)
            .unwrap()
            .load(local, Locality::Local)
            .unwrap()
            .into();
        assert_eq!(cfg.get_library(), "mine");
        // unset locally so the global value is kept
        assert_eq!(cfg.get_patterns(), vec!["*.vhd"]);
        assert_eq!(cfg.get_directive(), "order");
    }

    #[test]
    fn explicit_file_beats_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        std::fs::create_dir_all(home.join(GLOBAL_DIR)).unwrap();
        std::fs::write(
            home.join(GLOBAL_DIR).join(GLOBAL_FILE),
            "[pragma]\ndirective = \"global\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[general]\nlibrary = \"local\"\npatterns = [\"*.vhd\"]\n",
        )
        .unwrap();
        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&explicit, "[general]\nlibrary = \"explicit\"\n").unwrap();

        let configs =
            Configs::discover_from(Some(&explicit), &dir.path().to_path_buf(), Some(&home))
                .unwrap();
        assert_eq!(configs.get_files().len(), 3);
        assert_eq!(configs.get_files()[0], &explicit);
        let cfg: Config = configs.into();
        assert_eq!(cfg.get_library(), "explicit");
        // fields the explicit file leaves unset fall through to the lower layers
        assert_eq!(cfg.get_patterns(), vec!["*.vhd"]);
        assert_eq!(cfg.get_directive(), "global");
    }

    #[test]
    fn missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert_eq!(Configs::discover(Some(&missing)).is_err(), true);
        assert_eq!(
            Configs::new()
                .load_if_exists(missing, Locality::Local)
                .unwrap()
                .get_files()
                .len(),
            0
        );
    }
}
