//! Command handlers, one module per subcommand.

pub mod completion;
pub mod fill;
pub mod status;
pub mod stop;
pub mod version;
pub mod write;
