//! Output formatting for CLI.

mod json;
mod text;

pub use json::{AccountOutput, JsonFormatter, ServiceOutput};
pub use text::TextFormatter;
