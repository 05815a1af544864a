pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod description;
pub mod error;
pub mod layout_dump;
pub mod parser;
pub mod railroad;
pub mod render;
pub mod tokenizer;
pub mod translate;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use error::{Error, ErrorKind, Result};
pub use parser::parse;
pub use render::{RenderedRule, render_description, render_document, render_grammar, render_rule};
