//! Parser for the template expression syntax
//!
//! The template syntax is the secondary dialect: a tokenizer feeds a Pratt
//! parser for the expression grammar, and a scanner splits template text
//! into literal runs and `#{...}` expression spans.

mod pratt;
mod template;
mod tokenizer;

pub use pratt::{Precedence, parse_expression};
pub use template::{TemplateExpression, TemplatePart, parse_template};
pub use tokenizer::{Spanned, Token, tokenize};

pub(crate) use tokenizer::quoted_string;
