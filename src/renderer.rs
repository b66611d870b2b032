//! The render pipeline behind every invocation

use tracing::debug;

use crate::context::{bind, validate, Binding};
use crate::error::ConfiguratorError;
use crate::lister::list_templates;
use crate::template::{resolve, TemplateEngine};

/// What the first argument asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation<'a> {
    Help,
    List,
    Template(&'a str),
}

impl<'a> Invocation<'a> {
    /// Classify `args` without touching the filesystem
    pub fn from_args(args: &'a [String]) -> Result<Self, ConfiguratorError> {
        match args.first().map(String::as_str) {
            None => Err(ConfiguratorError::NoTemplate { usage: usage() }),
            Some("list") => Ok(Invocation::List),
            Some("--help" | "-h") => Ok(Invocation::Help),
            Some(name) => Ok(Invocation::Template(name)),
        }
    }
}

/// Runs one command against an injected template engine
#[derive(Debug, Clone)]
pub struct Configurator<E> {
    engine: E,
}

impl<E: TemplateEngine> Configurator<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Execute the command described by `args` (program name excluded).
    ///
    /// Returns the text destined for stdout. Every failure carries the
    /// diagnostic and exit status for the caller to report.
    pub fn run(&self, args: &[String]) -> Result<String, ConfiguratorError> {
        let template_name = match Invocation::from_args(args)? {
            Invocation::List => return list_templates(self.engine.search_path()),
            Invocation::Help => return Ok(usage()),
            Invocation::Template(name) => name,
        };

        let parsed = resolve(&self.engine, template_name)?;
        let vars = self.engine.find_free_variables(&parsed)?;

        let options = match bind(template_name, &vars, args)? {
            Binding::Options(options) => options,
            Binding::Help(help) => return Ok(help),
        };
        let context = validate(&vars, &options)?;

        debug!(template = %parsed.name, variables = context.len(), "rendering");
        self.engine.render(&parsed, &context)
    }
}

/// Top-level usage text
pub fn usage() -> String {
    let program = crate::PROGRAM;
    format!(
        "Usage: {program} TEMPLATE [CONTEXT_VARIABLES]\n\
         Usage: {program} list\n\
         \n\
         This program takes configuration file templates and renders\n\
         them with the supplied arguments as context variables.\n\
         \n\
         Run \"{program} list\" to show a list of the available templates."
    )
}
