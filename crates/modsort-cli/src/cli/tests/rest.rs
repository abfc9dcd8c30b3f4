//! Tests for normalize and extract.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_normalize_many() {
    match parse(&["modsort", "normalize", "jei-1.20.1.jar", "[JEI] x.jar"]) {
        CliCommand::Normalize { names } => {
            assert_eq!(names, vec!["jei-1.20.1.jar", "[JEI] x.jar"]);
        }
        _ => panic!("expected Normalize"),
    }
}

#[test]
fn cli_parse_normalize_needs_a_name() {
    assert!(Cli::try_parse_from(["modsort", "normalize"]).is_err());
}

#[test]
fn cli_parse_extract() {
    match parse(&["modsort", "extract", "page.html"]) {
        CliCommand::Extract { path } => assert_eq!(path, PathBuf::from("page.html")),
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["modsort", "status"]).is_err());
}
