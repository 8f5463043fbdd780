use std::path::PathBuf;

use clap::Args;
use pngmerge_core::api::inspect::ChunkInfo;
use pngmerge_core::CodecOptions;

use crate::CliResult;

/// Lists the chunks of PNG images
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// the PNG image files to inspect
    #[arg(required = true, value_name = "image files")]
    pub images: Vec<PathBuf>,
}

impl InspectArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        for image in self.images.iter() {
            let chunks = pngmerge_core::commands::inspect(image, &options)?;

            println!("# Chunks of `{}`", image.display());
            println!();
            print!("{}", to_table(&chunks));
            println!();
        }
        Ok(())
    }
}

fn to_table(chunks: &[ChunkInfo]) -> String {
    let mut out = String::new();
    out.push_str("| type | length     | crc        | crc ok | critical |\n");
    out.push_str("|------|------------|------------|--------|----------|\n");
    for c in chunks {
        out.push_str(&format!(
            "| {:4} | {:10} | {:#010x} | {:6} | {:8} |\n",
            c.chunk_type.to_string(),
            c.length,
            c.crc,
            if c.crc_valid { "yes" } else { "no" },
            if c.is_critical() { "yes" } else { "no" },
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pngmerge_core::png::ChunkType;

    #[test]
    fn should_render_one_row_per_chunk() {
        let table = to_table(&[ChunkInfo {
            chunk_type: ChunkType::IEND,
            length: 0,
            crc: 0xAE42_6082,
            crc_valid: true,
        }]);

        let rows: Vec<_> = table.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[2],
            "| IEND |          0 | 0xae426082 | yes    | yes      |"
        );
    }
}
