//! Session interpretation: command vocabulary and the per-user state machine.

pub mod command;
pub mod machine;

pub use command::{Command, Inbound, ParamsArgs, RawCommand};
pub use machine::{step, validate_credential_shape, Step};
