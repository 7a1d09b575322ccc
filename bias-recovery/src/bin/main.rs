// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

mod task;
mod version;

use std::path::PathBuf;

use bias_profile::Profile;
use bias_recovery_tools::config::RecoveryConfig;
use bias_recovery_tools::{keys, simulate, table, vectors};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use version::VERSION_BUILD;

#[derive(Parser, Debug)]
#[command(
    author = "Dusk Network B.V. All Rights Reserved.",
    version = &VERSION_BUILD[..],
    about = "Sets up and checks the bias circuit",
)]
struct Cli {
    /// Configuration file path
    #[clap(long, short, env = "BIAS_RECOVERY_CONFIG", value_parser)]
    config: Option<PathBuf>,

    /// Profile directory, instead of the one resolved from
    /// BIAS_PROFILE_PATH
    #[clap(long, short, value_parser)]
    profile: Option<PathBuf>,

    /// Output log level
    #[clap(long)]
    log_level: Option<tracing::Level>,

    /// Sets different levels of verbosity
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile and cache the circuit keys
    Keys {
        /// Keeps untracked keys
        #[clap(short, long, value_parser = BoolishValueParser::new(), env = "BIAS_KEEP_KEYS")]
        keep: bool,
    },

    /// Validate the coefficient table and export it as JSON
    Table {
        /// Validate this table record instead of the compiled one
        #[clap(short, long, value_parser)]
        input: Option<PathBuf>,

        /// Directory the record is written to
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Check and write the test vectors
    Vectors {
        /// Check this vector set instead of the canonical one
        #[clap(short, long, value_parser)]
        input: Option<PathBuf>,

        /// Directory the vector files are written to
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,

        /// Also prove every vector with the uniform circuit
        #[clap(long)]
        prove: bool,
    },

    /// Sample the bias distribution and compare it with Beta(2,5)
    Simulate {
        #[clap(short = 'n', long)]
        samples: Option<u32>,

        #[clap(short, long)]
        seed: Option<u64>,

        #[clap(short, long)]
        threads: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut config = RecoveryConfig::load(args.config.as_deref())?;
    if let Some(log_level) = args.log_level {
        config.log_level = Some(log_level.to_string());
    }

    let profile = match &args.profile {
        Some(dir) => Profile::at(dir)?,
        None => Profile::from_env()?,
    };

    let level = config.log_level()?;
    let command = args.command;

    task::run(
        move |profile| match command {
            Command::Keys { keep } => keys::exec(profile, keep),
            Command::Table { input, output } => {
                table::exec(input.as_deref(), output.as_deref())
            }
            Command::Vectors {
                input,
                output,
                prove,
            } => {
                let output = output.unwrap_or(config.vectors.output);
                let keys = if prove || config.vectors.prove {
                    Some(keys::uniform_keys(profile)?)
                } else {
                    None
                };
                vectors::exec(input.as_deref(), &output, keys.as_ref())
            }
            Command::Simulate {
                samples,
                seed,
                threads,
            } => {
                let mut simulation = config.simulation;
                simulation.samples = samples.unwrap_or(simulation.samples);
                simulation.seed = seed.unwrap_or(simulation.seed);
                simulation.threads = threads.unwrap_or(simulation.threads);
                simulate::exec(&simulation).map(|_| ())
            }
        },
        profile,
        level,
        args.verbose,
    )?;

    Ok(())
}
