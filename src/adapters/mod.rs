pub mod vim;

pub use vim::{VimConfig, VimSession};
