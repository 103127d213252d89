//! Progress event system.
//!
//! The collection controller reports progress through a
//! [`CollectEventHandler`]; the CLI installs a console implementation.
//! Handlers observe, they never steer: every method has a no-op default.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::{CollectEventHandler, NoOpHandler};
