//! Configurator CLI
//!
//! Usage:
//!   configurator TEMPLATE [--VAR=VALUE ...]
//!   configurator list
//!   configurator --help | -h

use std::process::ExitCode;

use configurator::{
    logging, usage, Configurator, ConfiguratorError, ExitStatus, Invocation, MiniJinjaEngine,
    Settings,
};

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match execute(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::from(ExitStatus::Ok.code())
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_status().code())
        }
    }
}

fn execute(args: &[String]) -> Result<String, ConfiguratorError> {
    // Usage errors and top-level help never depend on configuration
    if Invocation::from_args(args)? == Invocation::Help {
        return Ok(usage());
    }

    let settings = Settings::discover()?;
    let app = Configurator::new(MiniJinjaEngine::new(settings.search_path));
    app.run(args)
}
