mod cli;
mod commands;

use std::error::Error;

use clap::Parser;
use log::error;
use pngmerge_core::PngMergeError;

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = Result<T, PngMergeError>;

fn main() -> CliResult<()> {
    env_logger::init();
    let args = CliArgs::parse();
    let options = args.codec_options();

    match args.command {
        Commands::Merge(m) => m.run(options),
        Commands::Unveil(u) => u.run(options),
        Commands::Inspect(i) => i.run(options),
    }
    .inspect_err(|e| error!("{}: {}", e.kind(), report(e)))
}

/// the error message followed by all of its causes
fn report(e: &PngMergeError) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_the_whole_cause_chain() {
        let e = PngMergeError::Image {
            path: "secret.png".into(),
            source: Box::new(PngMergeError::InvalidSignature),
        };

        assert_eq!(
            report(&e),
            "Failed to decode secret.png: Not a valid PNG container: bad signature"
        );
    }

    #[test]
    fn should_report_an_incompatibility_once() {
        let e = PngMergeError::from(pngmerge_core::Incompatibility::Width {
            cover: 4,
            secret: 5,
        });

        assert_eq!(
            report(&e),
            "Images are not compatible: Width mismatch: cover=4, secret=5"
        );
    }
}
