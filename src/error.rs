use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading or running a program.
///
/// Faults raised by the loaded program itself (an invalid return) surface as
/// recoverable errors rather than aborting the host.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("program is {len} bytes but only {capacity} bytes fit above the program start")]
    ProgramTooLarge { len: usize, capacity: usize },
    #[error("return with an empty call stack (pc now {pc:#06x})")]
    StackUnderflow { pc: u16 },
}
