//! # CLI Commands / CLI 命令
//!
//! One module per subcommand of the `lingua-report` binary.

pub mod languages;
pub mod render;
