pub mod instruction;
pub mod writer;
