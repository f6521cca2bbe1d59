//! Core types and traits for the tsdocbot documentation generator
//!
//! This crate provides the foundational abstractions used throughout the
//! tsdocbot system, including:
//!
//! - **Syntax model**: Parser-independent nodes, spans and comment tokens
//! - **Declarations**: Documentation work items and the existing-doc index
//! - **Configuration**: System configuration management
//! - **Error handling**: Unified error types and retry helpers
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod declarations;
pub mod error;
pub mod retry;
pub mod syntax;

// Re-export main types for convenience
pub use config::{Config, FilesConfig, GeneratorConfig, LlmConfig, RepositoryConfig};
pub use declarations::{DeclarationKind, DocKey, DocWorkItem, ExistingDoc, ExistingDocIndex};
pub use error::{Error, Result, ResultExt};
pub use retry::{with_retry, RetryPolicy};
pub use syntax::{
    CommentKind, CommentToken, LineSpan, NodeKind, SyntaxNode, SyntaxTree, Visibility,
};
