use clap::{Parser, Subcommand};
use pngmerge_core::{CodecOptions, CrcPolicy};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// How to treat chunk checksums that do not match: ignore, warn or strict
    #[arg(long = "crc", global = true, default_value = "warn", value_name = "policy")]
    pub crc_policy: CrcPolicy,

    /// zlib compression level of the written image, 0 (none) to 9 (best)
    #[arg(
        long,
        global = true,
        default_value_t = pngmerge_core::options::DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9),
        value_name = "level"
    )]
    pub compression_level: u32,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions::default()
            .with_crc_policy(self.crc_policy)
            .with_compression_level(self.compression_level)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Merge(merge::MergeArgs),
    Unveil(unveil::UnveilArgs),
    Inspect(inspect::InspectArgs),
}
