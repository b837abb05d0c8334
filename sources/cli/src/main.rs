use std::process::exit;

use anyhow::Result;
use args::{Cli, Command};
use clap::Parser;
use intrinsic::{
    object::{
        class::ClassRegistry,
        layout::{footprint, ObjectModel},
    },
    ArrayError, ArrayFactory, ArrayKind,
};
use tracing::{debug, error, Level};
use tracing_subscriber::fmt;

mod args;

fn run(args: &Cli) -> Result<()> {
    let model = ObjectModel::new(args.layout.config())?;
    debug!(config = ?model.config(), "using object model");

    match &args.command {
        Command::Footprint {
            descriptor,
            length,
            contained,
        } => {
            let kind = ArrayKind::from_descriptor(descriptor)
                .map_err(|e| ArrayError::InvalidArgument(e.to_string()))?;
            let bytes = footprint(&model, kind, *length, *contained)?;

            println!("{bytes}");
        }
        Command::New { descriptor, length } => {
            let class = ClassRegistry::global().for_descriptor(descriptor)?;
            let factory = ArrayFactory::new(model);
            let array = factory.create_new_dyn(&class, *length)?;

            println!(
                "{} {} length={} footprint={}",
                array.class_name(),
                class.descriptor(),
                array.len(),
                array.footprint()
            );
        }
    }

    Ok(())
}

fn main() {
    let args = Cli::parse();

    let format = fmt::format()
        .with_ansi(false)
        .without_time()
        .with_level(true)
        .with_target(false)
        .with_thread_names(false)
        .with_source_location(args.verbose)
        .compact();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .event_format(format)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        error!("{e:#}");
        exit(1);
    }
}
