#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod envelope;
mod error;
mod gym;
mod member;
mod name;
mod request;
mod validation;

pub use envelope::*;
pub use error::*;
pub use gym::*;
pub use member::*;
pub use name::*;
pub use request::*;
pub use validation::*;
