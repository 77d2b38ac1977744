pub mod paging;
pub mod sort;

pub use paging::Paging;
pub use sort::Sort;
