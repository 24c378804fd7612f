//! The editor scripting service: resolves specifier chains against open
//! editors and serves them over a Unix socket.
pub mod dispatch;
pub mod error;
pub mod property;
pub mod registry;
pub mod resolver;
pub mod server;

pub use dispatch::Service;
pub use error::ScriptError;
pub use property::Property;
pub use registry::{Editor, EditorId, Registry, SharedEditor};
pub use resolver::{resolve, ObjectSelector, Target};
pub use server::{serve_connection, Server};
