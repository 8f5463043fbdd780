pub mod inspect;
pub mod merge;
pub mod unveil;
