pub mod errors;
pub mod pagination;
