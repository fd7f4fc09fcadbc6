pub mod extract;
pub mod pagination;
