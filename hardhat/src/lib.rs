pub mod artifact;
pub mod build_info;
pub mod cmds;
pub mod error;
pub mod utils;

pub use artifact::*;
pub use build_info::BuildInfo;
pub use error::HardhatError;
