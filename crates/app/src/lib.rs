#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod console;
pub mod log;
pub mod settings;
