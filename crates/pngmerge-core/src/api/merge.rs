use std::path::{Path, PathBuf};

use log::info;

use crate::{merge_images, png, CodecOptions, PngMergeError};

pub fn prepare() -> MergeApi {
    MergeApi::default()
}

#[derive(Default, Debug)]
pub struct MergeApi {
    cover: Option<PathBuf>,
    secret: Option<PathBuf>,
    output: Option<PathBuf>,
    options: CodecOptions,
}

impl MergeApi {
    /// Use the given codec options
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// The image that stays visible, its high nibbles end up in the output
    pub fn with_cover<A: AsRef<Path>>(mut self, cover: A) -> Self {
        self.cover = Some(cover.as_ref().to_path_buf());
        self
    }

    /// The image to hide, it must have the same geometry as the cover
    pub fn with_secret<A: AsRef<Path>>(mut self, secret: A) -> Self {
        self.secret = Some(secret.as_ref().to_path_buf());
        self
    }

    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Decodes both images, checks them, merges them and writes the result.
    /// Nothing is written unless all steps before succeeded.
    pub fn execute(self) -> Result<(), PngMergeError> {
        let Some(cover) = self.cover else {
            return Err(PngMergeError::CoverNotSet);
        };
        let Some(secret) = self.secret else {
            return Err(PngMergeError::SecretNotSet);
        };
        let Some(output) = self.output else {
            return Err(PngMergeError::TargetNotSet);
        };

        let cover = png::decode_file(&cover, &self.options)?;
        let secret = png::decode_file(&secret, &self.options)?;
        let merged = merge_images(&cover, &secret)?;
        png::save_as(&merged, &output, &self.options)?;

        info!("Merged image written to {}", output.display());
        Ok(())
    }
}
