use clap::{Args, Parser, Subcommand};
use intrinsic::object::layout::LayoutConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub layout: LayoutArgs,

    #[arg(long, short, global = true)]
    /// Emit debug logs on stderr
    pub verbose: bool,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[arg(long, global = true, default_value_t = LayoutConfig::DEFAULT_HEADER_BYTES)]
    /// Bytes taken by the object header and length field of a standalone array
    pub header_bytes: usize,

    #[arg(long, global = true, default_value_t = LayoutConfig::DEFAULT_OBJECT_ALIGNMENT)]
    /// Alignment every standalone array is padded to
    pub alignment: usize,
}

impl LayoutArgs {
    pub fn config(&self) -> LayoutConfig {
        LayoutConfig {
            header_bytes: self.header_bytes,
            object_alignment: self.alignment,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the footprint of an array type at a given length
    Footprint {
        /// Array descriptor, e.g. `[I` or `[Ljava/lang/Object;`
        descriptor: String,

        #[arg(allow_negative_numbers = true)]
        length: i64,

        #[arg(long)]
        /// Size the array as embedded in an enclosing object
        contained: bool,
    },

    /// Create an array through the factory and describe it
    New {
        /// Array descriptor of a registered array class
        descriptor: String,

        #[arg(allow_negative_numbers = true)]
        length: i64,
    },
}
