pub mod command;
pub mod context;
pub mod history;
pub mod registry;
pub mod render;
pub mod session;

pub use command::{Command, BUILTIN_COMMANDS, HELP_ALIAS};
pub use context::ConsoleContext;
pub use history::History;
pub use registry::{CommandEntry, CommandRegistry, LookupError, RegistrationError};
pub use session::{ConsoleSession, LineOutcome, SessionError, SessionSettings};
