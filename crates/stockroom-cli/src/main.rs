// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, bail};
use config::Config;
use std::env;
use std::path::PathBuf;
use stockroom_app::{AppState, ItemStore};
use stockroom_testkit::{InventoryFaker, sample_items};
use tracing::info;

const DEMO_SEED: u64 = 2026;
const DEMO_ITEM_COUNT: usize = 24;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `stockroom --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let filter = logging::env_filter(config.log_level())?;
    let log_path = config.log_path()?;
    let store = initial_store(SeedSource::resolve(&options, &config))?;
    if options.check_only {
        return Ok(());
    }

    logging::init(filter, &log_path)?;
    info!(
        config = %options.config_path.display(),
        items = store.len(),
        "starting stockroom"
    );

    let mut state = AppState::with_store(store);
    stockroom_tui::run_app(&mut state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeedSource {
    Sample,
    Demo,
    Empty,
}

impl SeedSource {
    fn resolve(options: &CliOptions, config: &Config) -> Self {
        if options.demo {
            Self::Demo
        } else if options.empty || !config.seed_sample_items() {
            Self::Empty
        } else {
            Self::Sample
        }
    }
}

fn initial_store(source: SeedSource) -> Result<ItemStore> {
    match source {
        SeedSource::Sample => ItemStore::with_items(sample_items()).context("seed sample items"),
        SeedSource::Demo => Ok(InventoryFaker::new(DEMO_SEED).store(DEMO_ITEM_COUNT)),
        SeedSource::Empty => Ok(ItemStore::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    empty: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        empty: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--empty" => {
                options.empty = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.demo && options.empty {
        bail!("--demo and --empty cannot be combined; pick one starting inventory");
    }

    Ok(options)
}

fn print_help() {
    println!("stockroom");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Start with {DEMO_ITEM_COUNT} generated items");
    println!("  --empty                  Start with no items");
    println!("  --check                  Validate config and startup, then exit");
    println!("  --help                   Show this help");
}
