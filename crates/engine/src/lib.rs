//! Documentation run engine
//!
//! Finds TypeScript declarations without JSDoc comments, has them
//! synthesized, splices the comments into the files and publishes the
//! result as a pull request.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod engine;
pub mod exclusion;
mod file_state;
pub mod lister;
pub mod publish;
mod scanner;
pub mod workspace;

pub use engine::{DocEngine, RunReport, RunState};
pub use exclusion::ExclusionFilter;
pub use file_state::FileState;
pub use lister::{FileLister, LocalFileLister};
pub use scanner::Scanner;
