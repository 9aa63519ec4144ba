pub mod catalog;
pub mod cli;
pub mod dates;
pub mod fields_cmd;
pub mod frame;
pub mod io_utils;
pub mod join;
pub mod pipeline;
pub mod project;
pub mod sink;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("stats19_tidy", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Tidy(args) => pipeline::execute(&args),
        Commands::Fields(args) => fields_cmd::execute(&args),
    }
}
