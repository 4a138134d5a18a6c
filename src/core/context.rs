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

use crate::core::config::{Config, Configs};
use crate::core::fileset::Fileset;
use crate::core::library::Library;
use crate::error::{Error, Hint};
use crate::util::anyerror::Fault;
use colored::Colorize;
use std::path::PathBuf;

/// The settings shared by every command of a single run.
#[derive(Debug, PartialEq)]
pub struct Context {
    config: Config,
    config_files: Vec<PathBuf>,
    verbose: bool,
}

impl Context {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            config_files: Vec::new(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Loads and combines the configuration layers, starting with the
    /// `explicit` file when one is given.
    pub fn configs(mut self, explicit: Option<&PathBuf>) -> Result<Self, Fault> {
        let configs = Configs::discover(explicit)?;
        self.config_files = configs.get_files().into_iter().cloned().collect();
        self.config = Config::from(configs);
        Ok(self)
    }

    /// Replaces the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Prints a progress message when running verbosely.
    pub fn info(&self, msg: &str) {
        if self.verbose == true {
            eprintln!("{}: {}", "info".cyan(), msg);
        }
    }

    /// Reads every source file found at `paths` into the working library.
    pub fn load_library(&self, paths: &[PathBuf]) -> Result<Library, Fault> {
        for file in &self.config_files {
            self.info(&format!("using configuration {:?}", file));
        }
        let files = Fileset::new(&self.config.get_patterns())?.gather(paths)?;
        if files.is_empty() == true {
            return Err(Error::NoSourceFiles(Hint::FilePatterns))?;
        }
        let mut lib = Library::new(self.config.get_library())?;
        for file in &files {
            let count = lib.load(file, self.config.get_directive())?;
            self.info(&format!("read {} unit(s) from {:?}", count, file));
        }
        Ok(lib.link())
    }
}
