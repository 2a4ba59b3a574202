#[path = "mod_builder.rs"]
mod builder_tests;
#[path = "mod_raw.rs"]
mod raw_tests;
