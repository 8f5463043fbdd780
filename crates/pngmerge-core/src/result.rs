use crate::error::PngMergeError;

pub type Result<E> = std::result::Result<E, PngMergeError>;
