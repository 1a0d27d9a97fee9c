pub mod command;
pub mod shell;

pub use command::CapturedOutput;
