use std::path::PathBuf;

use clap::Args;
use pngmerge_core::CodecOptions;

use crate::CliResult;

/// Hides a secret PNG image inside a cover PNG image of the same geometry
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Cover image, stays visible. Used readonly.
    #[arg(short = 'c', long = "cover", value_name = "cover image", required = true)]
    pub cover: PathBuf,

    /// Secret image, hidden in the low bits of the cover. Used readonly.
    #[arg(short = 's', long = "secret", value_name = "secret image", required = true)]
    pub secret: PathBuf,

    /// Final image will be stored as file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub write_to_file: PathBuf,
}

impl MergeArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        pngmerge_core::commands::merge(&self.cover, &self.secret, &self.write_to_file, options)
    }
}
