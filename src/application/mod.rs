pub mod check;
pub mod error;
pub mod selector;

pub use check::{CheckReport, CheckService};
pub use error::CheckError;
