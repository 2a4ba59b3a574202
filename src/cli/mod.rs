mod command;
mod runner;
mod util;

pub use command::Command;
pub use runner::{OutputMode, Response, execute, render, run, run_with_format};
pub use util::{exit_code, parse_output_mode};
