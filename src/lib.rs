pub use constants::BASE_STEP_HZ;
pub use error::{Error, Result};
pub use interpreter::{Interpreter, Status};

pub mod constants;
mod error;
mod instruction;
mod interpreter;
mod opcode;
mod operations;
pub mod state;
