//! Edit scripts: recorded sequences of edit events replayed against a tree.

pub mod event;
pub mod parse;

pub use event::EditEvent;
pub use parse::{parse_script, parse_script_file};
