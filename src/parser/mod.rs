//! Tokenizing INI text into logical lines and classifying them.
//!
//! This module handles:
//! - Comment removal and backslash continuations
//! - Section header and `key = value` recognition

pub mod grammar;
pub mod reader;

pub use grammar::Line;
pub use reader::{LineReader, LogicalLine};
