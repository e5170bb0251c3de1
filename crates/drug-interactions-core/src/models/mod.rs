//! Domain models for the drug interaction checker.

mod age;
mod interaction;
mod outcome;
mod pair;

pub use age::*;
pub use interaction::*;
pub use outcome::*;
pub use pair::*;
