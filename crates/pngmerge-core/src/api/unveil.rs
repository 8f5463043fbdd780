use std::path::{Path, PathBuf};

use log::info;

use crate::{lsb, png, CodecOptions, PngMergeError};

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default, Debug)]
pub struct UnveilApi {
    carrier: Option<PathBuf>,
    output: Option<PathBuf>,
    options: CodecOptions,
}

impl UnveilApi {
    /// Use the given codec options
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// This is the merged image that carries the secret in its low nibbles
    pub fn from_carrier(mut self, carrier: impl AsRef<Path>) -> Self {
        self.carrier = Some(carrier.as_ref().to_path_buf());
        self
    }

    /// This is where the recovered secret image will be written to
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Execute the unveil process and blocks until it is finished
    pub fn execute(self) -> Result<(), PngMergeError> {
        let Some(carrier) = self.carrier else {
            return Err(PngMergeError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(PngMergeError::TargetNotSet);
        };

        let carrier = png::decode_file(&carrier, &self.options)?;
        let secret = lsb::unveil(&carrier)?;
        png::save_as(&secret, &output, &self.options)?;

        info!("Unveiled image written to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::{DecodedImage, ImageHeader};
    use tempfile::tempdir;

    #[test]
    fn should_write_the_recovered_secret() {
        let temp_dir = tempdir().unwrap();
        let carrier_path = temp_dir.path().join("carrier.png");
        let output = temp_dir.path().join("secret.png");
        let carrier = DecodedImage::new(ImageHeader::new(2, 1, 8, 0), vec![0, 0xA5, 0x3C]);
        png::save_as(&carrier, &carrier_path, &CodecOptions::default()).unwrap();

        prepare()
            .from_carrier(&carrier_path)
            .with_output(&output)
            .execute()
            .expect("Failed to unveil");

        let secret = png::decode_file(&output, &CodecOptions::default()).unwrap();
        assert_eq!(secret.data(), &[0, 0x50, 0xC0]);
    }

    #[test]
    fn should_insist_on_carrier_and_output() {
        assert!(matches!(
            prepare().with_output("x.png").execute(),
            Err(PngMergeError::CarrierNotSet)
        ));
        assert!(matches!(
            prepare().from_carrier("x.png").execute(),
            Err(PngMergeError::TargetNotSet)
        ));
    }
}
