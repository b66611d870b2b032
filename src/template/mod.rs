//! Template discovery, parsing and rendering
//!
//! Templates live in the directories of a [`SearchPath`] and are handed to a
//! [`TemplateEngine`], which checks their syntax, reports the variables they
//! expect from the caller and renders them.
//!
//! # Example
//!
//! ```text
//! templates/
//!   greeting.txt        Hello {{ name }}!
//!   nginx/vhost.conf    server_name {{ server_name }}; ...
//! ```
//!
//! `greeting.txt` has one free variable, `name`.

mod engine;
mod resolver;
mod search_path;

pub use engine::{MiniJinjaEngine, ParsedTemplate, TemplateEngine, TemplateSource};
pub use resolver::resolve;
pub use search_path::SearchPath;
