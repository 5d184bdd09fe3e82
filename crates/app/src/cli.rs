//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "templar", version, about = "Interpolate template variables into text")]
pub struct Cli {
    /// Templating document (JSON, or YAML for `.yaml`/`.yml` files)
    #[arg(long, env = "TEMPLAR_VARIABLES")]
    pub variables: PathBuf,

    /// Built-in pseudo-variable text, as NAME=TEXT
    #[arg(long = "builtin", value_name = "NAME=TEXT")]
    pub builtins: Vec<String>,

    /// Call-scoped override, as NAME=VALUE (commas make a multi-value)
    #[arg(long, value_name = "NAME=VALUE")]
    pub scoped: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace references with formatted values
    Replace {
        /// Text to interpolate
        text: String,

        /// Format used when a reference has no inline format
        #[arg(long)]
        format: Option<String>,
    },

    /// Replace references with display text
    Text {
        /// Text to interpolate
        text: String,
    },

    /// Wrap references to known variables in highlight spans
    Highlight {
        /// Text to highlight
        text: String,
    },

    /// Exit successfully if the text references a known variable
    Exists {
        /// Text to inspect
        text: String,
    },

    /// Print the URL query string of the variable values
    UrlParams,

    /// Print the adhoc filters applying to a data source as JSON
    AdhocFilters {
        /// Data source name
        datasource: String,
    },
}
