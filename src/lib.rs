//! lilydoc - document information engine for LilyPond editing tools
//!
//! This crate answers questions an editor shell or build runner has about
//! a music-notation document: which dialect it is written in, which
//! LilyPond version it declares, which files it reaches through `\include`,
//! which file a compile job should target, and which output stems that
//! job is expected to produce. Derived facts are cached and revalidated
//! against buffer edits and file modification times.

pub mod basenames;
pub mod cache;
pub mod config;
pub mod context;
pub mod docinfo;
pub mod document;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod mode;
pub mod resolve;
pub mod scratch;
pub mod token;
pub mod utils;
pub mod variables;
