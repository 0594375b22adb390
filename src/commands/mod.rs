pub mod json_file;
pub mod process_command;
pub mod public_key_command;
pub mod sign_command;

pub use self::{process_command::*, public_key_command::*, sign_command::*};
