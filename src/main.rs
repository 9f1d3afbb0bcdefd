// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Error;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use yaconf::{
    commands::{self, GenerateOptions, DEFAULT_ENV_EXAMPLE_PATH, DEFAULT_OUTPUT_PATH},
    resolver::{DEFAULT_LOCAL_ENV_PATH, DEFAULT_TEMPLATE_PATH},
    Environment,
};

#[derive(Parser)]
#[command(name = "yaconf", version, about = "Typed configuration from YAML templates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate Rust config structs, .env.example and .env.local from the template
    Generate {
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
        #[arg(long, default_value = DEFAULT_ENV_EXAMPLE_PATH)]
        env_example: PathBuf,
        #[arg(long, default_value = DEFAULT_LOCAL_ENV_PATH)]
        env_local: PathBuf,
    },
    /// Check that .env.example declares every variable the template references
    Validate {
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
        #[arg(long, default_value = DEFAULT_ENV_EXAMPLE_PATH)]
        env_example: PathBuf,
    },
    /// Resolve the configuration and print it as YAML
    Show {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Error> {
    match command {
        Command::Generate {
            template,
            output,
            env_example,
            env_local,
        } => {
            let options = GenerateOptions {
                template,
                output,
                env_example,
                env_local,
            };
            let report = commands::generate(&options)?;
            for name in &report.collisions {
                println!("warning: struct name {} is used by more than one mapping; kept the first", name);
            }
            if !report.local_written {
                println!("{} already exists, left unchanged", options.env_local.display());
            }
            println!(
                "Generated {} structs and {} variables into {}",
                report.structs,
                report.variables,
                options.output.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { template, env_example } => {
            println!("Validating configuration...");
            let report = commands::validate(&template, &env_example)?;
            if !report.missing.is_empty() {
                println!("Missing environment variables: {}", report.missing.join(", "));
                return Ok(ExitCode::FAILURE);
            }
            if !report.extra.is_empty() {
                println!("Warning: extra environment variables: {}", report.extra.join(", "));
            }
            println!("Configuration validation passed");
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { dir } => {
            let yaml = commands::show(&dir, Environment::from_process())?;
            print!("{}", yaml);
            Ok(ExitCode::SUCCESS)
        }
    }
}
