pub mod args;
pub mod report;

pub use args::{Args, OutputFormat};
pub use report::{render, render_error};
