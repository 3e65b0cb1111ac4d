use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "routelint",
    version,
    about = "Attribute-routing lint for ASP.NET controllers",
    after_help = r#"Examples:
  routelint check --repo .
  routelint check --repo . --format sarif > routelint.sarif
  routelint check --repo . --rule ASP004 --rule ASP005
  routelint check --repo . --kebab-case
  routelint fix --repo . --dry-run
  routelint rules
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Sarif,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze route templates and print diagnostics.
    Check {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
        /// Output format: text|sarif.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Run only these rule ids (repeatable); default is every rule
        /// enabled by default.
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Also run the opt-in kebab-case url rule (ASP008).
        #[arg(long)]
        kebab_case: bool,
        /// Also run the opt-in [controller] placeholder rule (ASP010).
        #[arg(long)]
        no_placeholder: bool,
    },
    /// Apply the mechanical fixes attached to diagnostics.
    Fix {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
        /// Run only these rule ids (repeatable).
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Print what would change without writing files.
        #[arg(long)]
        dry_run: bool,
    },
    /// List the rule descriptors and exit.
    Rules,
}
