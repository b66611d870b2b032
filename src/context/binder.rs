//! Command-line flags generated from a template's variables

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use tracing::debug;

use super::{RawOptions, VariableSet};
use crate::error::ConfiguratorError;
use crate::PROGRAM;

// Not valid template identifiers, so they never collide with a variable flag
const TEMPLATE_ARG: &str = "template-name";
const HELP_ARG: &str = "show-help";
const EXTRA_ARG: &str = "extra-arguments";

/// Result of parsing the arguments given after a template name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Every declared variable mapped to its value, if supplied
    Options(RawOptions),
    /// Help was requested; carries the generated help text
    Help(String),
}

/// Parse `args` against one `--<name>=VALUE` flag per variable.
///
/// `args[0]` is the template name itself.
pub fn bind(
    template_name: &str,
    vars: &VariableSet,
    args: &[String],
) -> Result<Binding, ConfiguratorError> {
    let command = build_command(template_name, vars);
    let argv = std::iter::once(PROGRAM.to_string()).chain(args.iter().cloned());

    let matches = match command.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(Binding::Help(err.render().to_string().trim_end().to_string()));
        }
        Err(err) => {
            return Err(ConfiguratorError::InvalidArguments {
                message: err.render().to_string().trim_end().to_string(),
            });
        }
    };

    if let Some(extra) = matches.get_many::<String>(EXTRA_ARG) {
        debug!(ignored = ?extra.collect::<Vec<_>>(), "ignoring extra positional arguments");
    }

    let mut options = RawOptions::new();
    for name in vars.iter() {
        let value = matches.get_one::<String>(name).cloned();
        debug!(variable = %name, provided = value.is_some(), "bound variable flag");
        options.insert(name, value);
    }

    Ok(Binding::Options(options))
}

fn build_command(template_name: &str, vars: &VariableSet) -> Command {
    let mut help = Arg::new(HELP_ARG)
        .short('h')
        .action(ArgAction::Help)
        .help("Print help");
    // A variable called `help` owns `--help`; `-h` still works
    if !vars.contains("help") {
        help = help.long("help");
    }

    let mut command = Command::new(PROGRAM)
        .override_usage(format!("{PROGRAM} {template_name} [--VAR=VALUE ...]"))
        .about(format!("Render the \"{template_name}\" template"))
        .disable_help_flag(true)
        .args_override_self(true)
        .arg(Arg::new(TEMPLATE_ARG).required(true).hide(true))
        .arg(
            Arg::new(EXTRA_ARG)
                .num_args(1..)
                .action(ArgAction::Append)
                .hide(true),
        )
        .arg(help);

    for name in vars.iter() {
        command = command.arg(
            Arg::new(name.to_string())
                .long(name.to_string())
                .value_name("VALUE")
                .allow_hyphen_values(true)
                .help(format!("You must provide a value for \"{name}\".")),
        );
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn options(binding: Binding) -> RawOptions {
        match binding {
            Binding::Options(options) => options,
            Binding::Help(text) => panic!("unexpected help: {text}"),
        }
    }

    #[test]
    fn test_binds_equals_and_separate_values() {
        let vars: VariableSet = ["host", "port"].into_iter().collect();
        let bound = options(
            bind(
                "app.conf",
                &vars,
                &args(&["app.conf", "--host=db.local", "--port", "5432"]),
            )
            .unwrap(),
        );
        assert_eq!(bound.get("host"), Some("db.local"));
        assert_eq!(bound.get("port"), Some("5432"));
    }

    #[test]
    fn test_absent_flags_are_explicit() {
        let vars: VariableSet = ["host", "port"].into_iter().collect();
        let bound = options(bind("app.conf", &vars, &args(&["app.conf", "--host=x"])).unwrap());
        assert_eq!(bound.len(), 2);
        assert_eq!(bound.get("port"), None);
    }

    #[test]
    fn test_hyphen_values_and_empty_values() {
        let vars: VariableSet = ["offset", "suffix"].into_iter().collect();
        let bound = options(
            bind(
                "t",
                &vars,
                &args(&["t", "--offset", "-5", "--suffix="]),
            )
            .unwrap(),
        );
        assert_eq!(bound.get("offset"), Some("-5"));
        assert_eq!(bound.get("suffix"), Some(""));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let vars: VariableSet = ["name"].into_iter().collect();
        let bound = options(bind("t", &vars, &args(&["t", "--name=a", "--name=b"])).unwrap());
        assert_eq!(bound.get("name"), Some("b"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let vars: VariableSet = ["name"].into_iter().collect();
        let err = bind("t", &vars, &args(&["t", "--nmae=World"])).unwrap_err();
        assert!(matches!(err, ConfiguratorError::InvalidArguments { .. }));
        assert!(err.to_string().contains("--nmae"));
    }

    #[test]
    fn test_extra_positionals_are_ignored() {
        let vars: VariableSet = ["name"].into_iter().collect();
        let bound = options(
            bind(
                "t",
                &vars,
                &args(&["t", "stray", "--name=World", "more"]),
            )
            .unwrap(),
        );
        assert_eq!(bound.len(), 1);
        assert_eq!(bound.get("name"), Some("World"));
    }

    #[test]
    fn test_help_lists_generated_flags() {
        let vars: VariableSet = ["name"].into_iter().collect();
        match bind("greeting.txt", &vars, &args(&["greeting.txt", "--help"])).unwrap() {
            Binding::Help(text) => {
                assert!(text.contains("--name <VALUE>"));
                assert!(text.contains("You must provide a value for \"name\"."));
                assert!(text.contains("greeting.txt"));
            }
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_variable_named_help_keeps_long_flag() {
        let vars: VariableSet = ["help"].into_iter().collect();
        let bound = options(bind("t", &vars, &args(&["t", "--help=yes"])).unwrap());
        assert_eq!(bound.get("help"), Some("yes"));

        let short = bind("t", &vars, &args(&["t", "-h"])).unwrap();
        assert!(matches!(short, Binding::Help(_)));
    }
}
