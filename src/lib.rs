//! Configurator - render configuration-file templates from the command line
//!
//! A template is looked up by name on a search path, its free variables are
//! discovered statically and exposed as `--<name>=VALUE` flags, and the
//! rendered text is returned once every variable has a value.
//!
//! # Example
//!
//! ```rust,no_run
//! use configurator::{Configurator, MiniJinjaEngine, SearchPath};
//!
//! let engine = MiniJinjaEngine::new(SearchPath::new(vec!["templates".into()]));
//! let app = Configurator::new(engine);
//!
//! let args = vec!["greeting.txt".to_string(), "--name=World".to_string()];
//! let output = app.run(&args).unwrap();
//! assert_eq!(output, "Hello World!");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod lister;
pub mod logging;
pub mod renderer;
pub mod template;

pub use config::{ConfigError, Settings};
pub use context::{Context, RawOptions, VariableSet};
pub use error::{ConfiguratorError, ExitStatus};
pub use lister::list_templates;
pub use renderer::{usage, Configurator, Invocation};
pub use template::{MiniJinjaEngine, ParsedTemplate, SearchPath, TemplateEngine};

/// Program name used in usage and help text
pub const PROGRAM: &str = "configurator";
