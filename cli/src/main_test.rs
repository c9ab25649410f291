use super::*;
use clap::CommandFactory;

#[test]
fn ws_url_maps_scheme() {
    assert_eq!(ws_url("http://127.0.0.1:3000").unwrap(), "ws://127.0.0.1:3000/api/ws");
    assert_eq!(ws_url("https://todo.example.com/").unwrap(), "wss://todo.example.com/api/ws");
    assert!(matches!(ws_url("ftp://nope"), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn rm_requires_an_id() {
    let result = Cli::try_parse_from(["ticklist", "rm"]);
    assert!(result.is_err());
}

#[test]
fn add_accepts_text_argument() {
    let cli = Cli::try_parse_from(["ticklist", "add", "Buy milk"]).unwrap();
    match cli.command {
        Command::Add { text } => assert_eq!(text, "Buy milk"),
        other => panic!("expected Add, got {other:?}"),
    }
}
