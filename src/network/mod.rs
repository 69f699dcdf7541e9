pub mod connection;
pub mod events;
pub mod framing;
pub mod listener;
pub mod stdio;

pub use connection::serve_connection;
pub use events::ConnectionInfo;
pub use framing::{Frame, LineReader};
pub use listener::ConsoleListener;
pub use stdio::{serve_stdio, serve_stdio_streams};
