use anyhow::Result;
use clap::Parser;
use routelint::analyzer::CancelFlag;
use routelint::cli::{self, OutputFormat};
use routelint::diagnostics::{self, Diagnostic};
use routelint::rules::RuleSet;
use routelint::scan::ScanOptions;
use routelint::{runner, sarif};

fn rule_set(rules: &[String], kebab_case: bool, no_placeholder: bool) -> Result<RuleSet> {
    let mut set = if rules.is_empty() {
        RuleSet::default()
    } else {
        RuleSet::from_ids(rules)?
    };
    if kebab_case {
        set.enable("ASP008");
    }
    if no_placeholder {
        set.enable("ASP010");
    }
    Ok(set)
}

fn print_text(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!(
            "{}:{}:{}: {} [{}] {}",
            diag.path,
            diag.line,
            diag.column,
            diag.severity.sarif_level(),
            diag.rule_id,
            diag.message
        );
    }
    eprintln!("{} diagnostics", diagnostics.len());
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    let cancel = CancelFlag::new();

    match args.command {
        cli::Command::Check {
            repo,
            no_ignore,
            format,
            rules,
            kebab_case,
            no_placeholder,
        } => {
            let set = rule_set(&rules, kebab_case, no_placeholder)?;
            let diagnostics =
                runner::check_repo(&repo, ScanOptions::new(no_ignore), &set, &cancel)?;
            match format {
                OutputFormat::Text => print_text(&diagnostics),
                OutputFormat::Sarif => println!("{}", sarif::to_string_pretty(&diagnostics)?),
            }
            if !diagnostics.is_empty() {
                std::process::exit(1);
            }
            Ok(())
        }
        cli::Command::Fix {
            repo,
            no_ignore,
            rules,
            dry_run,
        } => {
            let set = rule_set(&rules, false, false)?;
            let summary =
                runner::fix_repo(&repo, ScanOptions::new(no_ignore), &set, dry_run, &cancel)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        cli::Command::Rules => {
            for descriptor in diagnostics::DESCRIPTORS {
                println!(
                    "{}  {:<7}  {}  {}",
                    descriptor.id,
                    descriptor.severity.sarif_level(),
                    if descriptor.enabled_by_default {
                        "on "
                    } else {
                        "off"
                    },
                    descriptor.title
                );
            }
            Ok(())
        }
    }
}
