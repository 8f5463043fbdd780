use std::path::Path;

use crate::api::inspect::{self, ChunkInfo};
use crate::{CodecOptions, PngMergeError};

pub fn merge(
    cover: &Path,
    secret: &Path,
    output: &Path,
    options: CodecOptions,
) -> Result<(), PngMergeError> {
    crate::api::merge::prepare()
        .with_options(options)
        .with_cover(cover)
        .with_secret(secret)
        .with_output(output)
        .execute()
}

pub fn unveil(carrier: &Path, output: &Path, options: CodecOptions) -> Result<(), PngMergeError> {
    crate::api::unveil::prepare()
        .with_options(options)
        .from_carrier(carrier)
        .with_output(output)
        .execute()
}

pub fn inspect(image: &Path, options: &CodecOptions) -> Result<Vec<ChunkInfo>, PngMergeError> {
    inspect::chunks(image, options)
}
