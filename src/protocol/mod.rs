//! Command Protocol
//!
//! Line-oriented text commands for driving a cache interactively.

mod command;
mod response;

pub use command::Command;
pub use response::Response;
