//! Templar - Command line entry point
//!
//! Loads a templating document, builds the variable registry and runs one
//! interpolation command against it.

mod cli;
mod document;
mod logging;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use templar_application::variable_resolver::{
    Interpolator, UrlParamSerializer, VariableRegistry, parse_scoped_vars, to_query_string,
};
use tracing::debug;

use cli::{Cli, Command};

fn main() -> ExitCode {
    logging::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let document = document::load(&cli.variables)?;
    let path = cli.variables.display();
    let mut registry = VariableRegistry::from_document(document)
        .with_context(|| format!("invalid variables in {path}"))?;

    for assignment in &cli.builtins {
        let (name, text) = assignment
            .split_once('=')
            .with_context(|| format!("expected NAME=TEXT, got `{assignment}`"))?;
        registry.set_builtin(name, text);
    }

    let scoped = parse_scoped_vars(&cli.scoped).context("invalid --scoped value")?;
    let scoped = (!scoped.is_empty()).then_some(&scoped);
    debug!(
        variables = registry.len(),
        scoped = cli.scoped.len(),
        "registry ready"
    );

    let interpolator = Interpolator::new(&registry);

    match cli.command {
        Command::Replace { text, format } => {
            println!("{}", interpolator.replace(&text, scoped, format.as_deref()));
        }
        Command::Text { text } => {
            println!("{}", interpolator.replace_with_text(&text, scoped));
        }
        Command::Highlight { text } => {
            println!("{}", interpolator.highlight_variables_as_html(&text));
        }
        Command::Exists { text } => {
            return Ok(if interpolator.variable_exists(&text) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::UrlParams => {
            let params = UrlParamSerializer::new(&registry).url_params(scoped);
            println!("{}", to_query_string(&params));
        }
        Command::AdhocFilters { datasource } => {
            let filters = registry.get_adhoc_filters(&datasource);
            let json = serde_json::to_string_pretty(&filters)
                .context("failed to serialize adhoc filters")?;
            println!("{json}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
