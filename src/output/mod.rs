pub mod json;
pub mod terminal;

pub use json::output_json;
pub use terminal::TerminalWriter;
