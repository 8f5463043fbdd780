use std::path::PathBuf;

use clap::Args;
use pngmerge_core::CodecOptions;

use crate::CliResult;

/// Recovers the hidden image (with 4 bit precision) from a merged image
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Merged image that carries the secret
    #[arg(
        short = 'i',
        long = "in",
        value_name = "carrier image",
        required = true
    )]
    pub carrier: PathBuf,

    /// Recovered image will be stored as file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub output_file: PathBuf,
}

impl UnveilArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        pngmerge_core::commands::unveil(&self.carrier, &self.output_file, options)
    }
}
