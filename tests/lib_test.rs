//! Library integration tests.

use gearlog_setup::config::{EnvFile, BASIC_BACKEND_ENV};
use gearlog_setup::requirements::{builtin_requirements, Version};
use gearlog_setup::SetupError;

#[test]
fn error_types_are_public() {
    let err = SetupError::step("clone", "git clone failed");
    assert!(err.to_string().contains("git clone failed"));
    assert_eq!(SetupError::Cancelled.to_string(), "Setup cancelled by user");
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> gearlog_setup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use gearlog_setup::cli::{Cli, Commands};

    let cli = Cli::parse_from(["gearlog-setup", "check", "--json"]);
    if let Some(Commands::Check(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Check command");
    }
}

#[test]
fn node_version_comparison() {
    let node = builtin_requirements()
        .into_iter()
        .find(|r| r.name == "node")
        .unwrap();
    assert_eq!(node.minimum, Version::new(18, 0));
    assert!(!Version::parse_tolerant("v16.14.0").unwrap().meets(node.minimum));
    assert!(Version::parse_tolerant("v20.1.0").unwrap().meets(node.minimum));
}

#[test]
fn version_comparison_is_lexicographic() {
    let required = Version::new(8, 3);
    for (x, y, z) in [(8, 3, 0), (8, 4, 1), (9, 0, 0), (8, 2, 99), (7, 9, 9), (10, 0, 5)] {
        let full = format!("{}.{}.{}", x, y, z);
        let short = format!("{}.{}", x, y);
        let expected = (x, y) >= (8, 3);
        assert_eq!(Version::parse_tolerant(&full).unwrap().meets(required), expected, "{full}");
        assert_eq!(Version::parse_tolerant(&short).unwrap().meets(required), expected, "{short}");
    }
}

#[test]
fn env_file_update_has_single_key() {
    let mut env = EnvFile::parse(&BASIC_BACKEND_ENV.replace("DB_DATABASE=gearlog", "DB_DATABASE=old"));
    env.set("DB_DATABASE", "gearlog");
    env.set("DB_DATABASE", "gearlog");
    let rendered = env.render();
    let matches: Vec<&str> = rendered
        .lines()
        .filter(|l| l.starts_with("DB_DATABASE="))
        .collect();
    assert_eq!(matches, vec!["DB_DATABASE=gearlog"]);
    assert_eq!(rendered, BASIC_BACKEND_ENV);
}
