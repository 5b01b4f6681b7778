//! An in-place JSON tokenizer, flat-array tree navigator, and stack-only
//! streaming emitter, for targets where a heap is unavailable or
//! undesirable.
//!
//! # Design
//!
//! The parser ([`parse_buffer`]/[`parse_str`]) never allocates and never
//! copies the input: it scans `input` once and writes a flat, depth-tagged,
//! preorder array of [`Token`]s — fixed-size records that only remember an
//! offset, a length, a [`TokenType`], and a nesting level. Both `input` and
//! the `Token` storage are supplied by the caller, so the whole parse runs
//! in caller-controlled memory.
//!
//! [`nav`] walks that array with nothing but index arithmetic and level
//! comparisons — no parent pointers, no recursion, no allocation — so a
//! caller can navigate a parsed document on a stack of a few words.
//!
//! [`emit`] is the dual: a streaming writer that holds its nesting state in
//! a caller-supplied stack of [`emit::Frame`]s and calls a writer closure
//! byte by byte, so producing JSON costs no more memory than the deepest
//! container being built.
//!
//! # Example
//!
//! ```
//! use flatjson::{nav, parse_str, Token};
//!
//! let input = r#"{"name":"ampere","amps":3,"tags":["sensor","v2"]}"#;
//! let mut tokens = [Token::default(); 16];
//! let n = parse_str(input, &mut tokens).unwrap();
//! let tokens = &tokens[..n];
//!
//! let root = nav::root(tokens).unwrap();
//! assert_eq!(tokens[root].token_type(), flatjson::TokenType::Object);
//!
//! let name_key = nav::child(tokens, root).unwrap();
//! assert_eq!(tokens[name_key].extent_str(input), "\"name\"");
//! let name_value = nav::next_sibling(tokens, name_key).unwrap();
//! assert_eq!(tokens[name_value].extent_str(input), "\"ampere\"");
//! ```
//!
//! Re-emitting a parsed value (or building one from scratch) goes through
//! [`emit::Emitter`]:
//!
//! ```
//! use flatjson::emit::{Emitter, Frame};
//!
//! let mut out = Vec::new();
//! let mut frames = [Frame::default(); 8];
//! let mut emitter = Emitter::new(&mut frames, |b| out.push(b));
//! emitter
//!     .object_open()
//!     .key_string("name", "ampere")
//!     .key_integer("amps", 3)
//!     .object_close();
//! emitter.finish().unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), r#"{"name":"ampere","amps":3}"#);
//! ```

pub mod emit;
pub mod nav;
mod parser;
mod token;
mod util;

mod error;

pub use emit::Emitter;
pub use error::JsonError;
pub use parser::{parse_buffer, parse_buffer_with_log, parse_str};
pub use token::{Token, TokenType, MAX_TOKEN_DEPTH};
pub use util::Log;
