//! Template engine seam and its minijinja implementation

use std::fs;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment, ErrorKind};
use tracing::debug;

use super::search_path::SearchPath;
use crate::context::{Context, VariableSet};
use crate::error::{ConfiguratorError, Span};

/// Functions every environment provides as globals
const BUILTIN_GLOBALS: &[&str] = &["range", "dict", "debug", "namespace"];

/// Raw template text located on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

/// A template whose syntax has been checked.
///
/// Only the checked source is kept; each engine operation compiles it
/// again in a fresh environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub name: String,
    pub path: PathBuf,
    source: String,
}

impl ParsedTemplate {
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Capabilities the render pipeline needs from a template engine
pub trait TemplateEngine {
    /// Directories templates are loaded from, in precedence order
    fn search_path(&self) -> &SearchPath;

    /// Locate and read a template; `Ok(None)` when no directory has it
    fn load(&self, name: &str) -> Result<Option<TemplateSource>, ConfiguratorError>;

    fn parse(&self, source: TemplateSource) -> Result<ParsedTemplate, ConfiguratorError>;

    /// Names referenced by the template but not defined inside it
    fn find_free_variables(&self, parsed: &ParsedTemplate)
        -> Result<VariableSet, ConfiguratorError>;

    fn render(&self, parsed: &ParsedTemplate, context: &Context)
        -> Result<String, ConfiguratorError>;
}

/// Jinja2-compatible engine backed by minijinja
#[derive(Debug, Clone)]
pub struct MiniJinjaEngine {
    search_path: SearchPath,
}

impl MiniJinjaEngine {
    pub fn new(search_path: SearchPath) -> Self {
        Self { search_path }
    }

    fn environment<'source>(&self) -> Environment<'source> {
        let mut env = Environment::new();

        // Output is configuration text, never HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);

        // include/extends/import resolve through the same search path
        let search_path = self.search_path.clone();
        env.set_loader(move |name| match search_path.read(name) {
            Ok(found) => Ok(found.map(|(_, source)| source)),
            Err(err) => Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("could not read template \"{name}\""),
            )
            .with_source(err)),
        });

        env
    }

    /// Convert an engine error into a diagnostic with source context
    fn report(
        &self,
        parsed_name: &str,
        parsed_source: &str,
        err: minijinja::Error,
    ) -> ConfiguratorError {
        let message = match err.detail() {
            Some(detail) => format!("{}: {}", err.kind(), detail),
            None => err.kind().to_string(),
        };

        // The failure may come from an included template
        let (name, source) = match err.name() {
            Some(name) if name != parsed_name => match self.search_path.read(name) {
                Ok(Some((_, source))) => (name.to_string(), source),
                _ => (parsed_name.to_string(), parsed_source.to_string()),
            },
            _ => (parsed_name.to_string(), parsed_source.to_string()),
        };

        let span = err
            .range()
            .or_else(|| err.line().map(|line| line_span(&source, line)))
            .unwrap_or(0..0);

        ConfiguratorError::template(&name, &source, span, message)
    }
}

/// Byte span of a 1-based line
fn line_span(source: &str, line: usize) -> Span {
    let mut start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return start..start + text.trim_end_matches('\n').len();
        }
        start += text.len();
    }
    source.len()..source.len()
}

/// Whether `name` appears inside template tags only as a call target.
///
/// A builtin global used as a plain value (`{{ debug }}`) stays a free
/// variable so the caller's value shadows it.
fn only_called(source: &str, name: &str) -> bool {
    let mut rest = source;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let close = match after.chars().next() {
            Some('{') => "}}",
            Some('%') => "%}",
            Some('#') => "#}",
            _ => {
                rest = after;
                continue;
            }
        };
        let body = &after[1..];
        let end = body.find(close).unwrap_or(body.len());
        if close != "#}" && !tag_calls_only(&body[..end], name) {
            return false;
        }
        rest = &body[(end + close.len()).min(body.len())..];
    }
    true
}

fn tag_calls_only(tag: &str, name: &str) -> bool {
    let bytes = tag.as_bytes();
    let mut i = 0;
    let mut prev = b' ';
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'\'' || c == b'"' {
            // Skip string literals
            i += 1;
            while i < bytes.len() && bytes[i] != c {
                i += if bytes[i] == b'\\' { 2 } else { 1 };
            }
            i += 1;
            prev = c;
        } else if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            if &tag[start..i] == name && prev != b'.' {
                let next = tag[i..].trim_start();
                let keyword_arg = next.starts_with('=') && !next.starts_with("==");
                if !next.starts_with('(') && !keyword_arg {
                    return false;
                }
            }
            prev = b'a';
        } else {
            if !c.is_ascii_whitespace() {
                prev = c;
            }
            i += 1;
        }
    }
    true
}

impl TemplateEngine for MiniJinjaEngine {
    fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    fn load(&self, name: &str) -> Result<Option<TemplateSource>, ConfiguratorError> {
        let Some(path) = self.search_path.find(name) else {
            return Ok(None);
        };
        let source = fs::read_to_string(&path).map_err(|source| ConfiguratorError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(template = %name, path = %path.display(), "loaded template");

        Ok(Some(TemplateSource {
            name: name.to_string(),
            path,
            source,
        }))
    }

    fn parse(&self, source: TemplateSource) -> Result<ParsedTemplate, ConfiguratorError> {
        self.environment()
            .template_from_named_str(&source.name, &source.source)
            .map_err(|err| self.report(&source.name, &source.source, err))?;

        Ok(ParsedTemplate {
            name: source.name,
            path: source.path,
            source: source.source,
        })
    }

    fn find_free_variables(
        &self,
        parsed: &ParsedTemplate,
    ) -> Result<VariableSet, ConfiguratorError> {
        let env = self.environment();
        let template = env
            .template_from_named_str(&parsed.name, &parsed.source)
            .map_err(|err| self.report(&parsed.name, &parsed.source, err))?;

        let vars: VariableSet = template
            .undeclared_variables(false)
            .into_iter()
            .filter(|name| {
                !(BUILTIN_GLOBALS.contains(&name.as_str()) && only_called(&parsed.source, name))
            })
            .collect();
        debug!(template = %parsed.name, variables = ?vars, "discovered free variables");

        Ok(vars)
    }

    fn render(
        &self,
        parsed: &ParsedTemplate,
        context: &Context,
    ) -> Result<String, ConfiguratorError> {
        let env = self.environment();
        let template = env
            .template_from_named_str(&parsed.name, &parsed.source)
            .map_err(|err| self.report(&parsed.name, &parsed.source, err))?;

        template
            .render(context)
            .map_err(|err| self.report(&parsed.name, &parsed.source, err))
    }
}
