pub mod cli;
pub mod session;

pub use cli::Cli;
pub use session::{run_session, Command, CommandError, Session};
