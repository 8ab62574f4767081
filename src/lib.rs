pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod gh;
pub mod git;
pub mod output;
pub mod request;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::{AgentPrError, Result};
pub use gh::{CommentPoster, PrReference, ReviewPoster};
