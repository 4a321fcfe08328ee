//! Mapping from the markdown tree to the flat document model.

pub mod flatten;
pub mod images;
pub mod runs;
pub mod table;
