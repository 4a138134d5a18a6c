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

use std::path::PathBuf;
use std::str::FromStr;
use vhdelab::core::config::Config;
use vhdelab::core::context::Context;
use vhdelab::core::diagnostic::{count_errors, Severity};
use vhdelab::core::elab::Elaborator;
use vhdelab::core::lang::vhdl::symbols::SelectedName;
use vhdelab::core::library::Library;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("packages.vhd")
}

fn load(config: Config) -> Library {
    Context::new()
        .config(config)
        .load_library(&[fixture()])
        .unwrap()
}

fn position(order: &[String], name: &str) -> usize {
    order.iter().position(|n| n == name).unwrap()
}

#[test]
fn packages_elaborate_in_dependency_order() {
    let lib = load(Config::new());
    assert_eq!(lib.len(), 4);
    assert_eq!(lib.get_diagnostics().len(), 0);

    let elab = Elaborator::new(&lib, &Config::new());
    let order: Vec<String> = elab
        .steps(&elab.order().unwrap())
        .iter()
        .map(|s| s.get_name().to_string())
        .collect();
    assert_eq!(order, vec!["pkg_a", "pkg_b", "pkg_c", "pkg_d"]);

    // pkg_c needs pkg_b.BYTE
    assert!(position(&order, "pkg_b") < position(&order, "pkg_c"));
    // pkg_d needs pkg_b.BYTE and all of pkg_c
    assert!(position(&order, "pkg_b") < position(&order, "pkg_d"));
    assert!(position(&order, "pkg_c") < position(&order, "pkg_d"));
    // pkg_a needs nothing
    let a = lib.find(&SelectedName::from_str("pkg_a").unwrap()).unwrap();
    assert_eq!(elab.dependencies_of(a), Vec::<usize>::new());
}

#[test]
fn every_pragma_is_planned() {
    let lib = load(Config::new());
    let elab = Elaborator::new(&lib, &Config::new());
    let reports = elab.run_pragmas();

    let plans: Vec<(String, Vec<String>)> = reports
        .iter()
        .map(|r| {
            (
                r.get_target().to_string(),
                r.get_steps().iter().map(|s| s.get_name().to_string()).collect(),
            )
        })
        .collect();
    assert_eq!(
        plans,
        vec![
            (String::from("pkg_a"), vec![String::from("pkg_a")]),
            (String::from("pkg_b"), vec![String::from("pkg_b")]),
            (
                String::from("pkg_c"),
                vec![String::from("pkg_b"), String::from("pkg_c")]
            ),
            (
                String::from("pkg_d"),
                vec![
                    String::from("pkg_b"),
                    String::from("pkg_c"),
                    String::from("pkg_d")
                ]
            ),
        ]
    );
    assert!(reports.iter().all(|r| r.has_errors() == false));
}

#[test]
fn deferred_constants_without_bodies_are_warnings() {
    let lib = load(Config::new());
    let elab = Elaborator::new(&lib, &Config::new());
    let diagnostics: Vec<_> = elab.get_resolution().iter_diagnostics().collect();
    assert_eq!(diagnostics.len(), 4);
    assert!(diagnostics
        .iter()
        .all(|d| d.get_severity() == Severity::Warning));
    assert_eq!(count_errors(diagnostics.into_iter()), 0);

    let strict: Config = "[check]\ndeferred-constants = \"error\"".parse().unwrap();
    let elab = Elaborator::new(&lib, &strict);
    assert_eq!(count_errors(elab.get_resolution().iter_diagnostics()), 4);
}

#[test]
fn order_serializes_to_json() {
    let lib = load(Config::new());
    let elab = Elaborator::new(&lib, &Config::new());
    let target = elab
        .find(&SelectedName::from_str("work.pkg_c").unwrap())
        .unwrap();
    let json = serde_json::to_value(elab.steps(&elab.plan(target).unwrap())).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["pkg_b", "pkg_c"]);
    assert_eq!(json[0]["kind"], "package");
}
