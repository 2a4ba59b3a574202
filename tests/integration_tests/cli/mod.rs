#[path = "mod_cli.rs"]
mod cli_tests;
