//! Virtual indentation for C-like code.
//!
//! Renderers feed a buffer's coarse tokens through a [`ScopeTracker`] one line
//! at a time and draw each line indented by the depth it reports, regardless of
//! the whitespace actually in the file. [`IndentPass`] drives the tracker over a
//! window of visible lines and [`CTokenizer`] provides tokens for C-family
//! sources.

pub mod lexer;
pub mod pass;
pub mod scope;
pub mod token;

pub use lexer::CTokenizer;
pub use pass::{consumed_tabs, IndentPass};
pub use scope::{ScopeTracker, MAX_NESTING_DEPTH};
pub use token::{TokenKind, Tokenizer, Tokens};
