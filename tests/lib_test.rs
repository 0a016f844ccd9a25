//! Library integration tests.

use basecamp::SetupError;

#[test]
fn error_types_are_public() {
    let err = SetupError::InterpreterNotFound {
        searched: "python3, python".into(),
    };
    assert!(err.to_string().contains("python3"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> basecamp::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use basecamp::cli::{Cli, Commands};
    use clap::Parser;

    // Actually test parsing with parse_from
    let cli = Cli::parse_from(["basecamp", "status", "--json"]);
    assert!(cli.command.is_some());

    if let Some(Commands::Status(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Status command");
    }
}
