#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Background tasks started and stopped with the host process
//!
//! The host resolves a [`TaskList`] once, initializes every task in list
//! order at startup and shuts them down again when the process stops.

mod list;
mod signal;
mod task;
mod tasks;

pub use list::TaskList;
pub use signal::ShutdownSignal;
pub use task::{Task, TaskState};
pub use tasks::{CreateGistTask, ShutdownAfterWorkCompletedTask, StartupTask};
