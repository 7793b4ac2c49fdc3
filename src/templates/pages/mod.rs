pub mod index;

pub use index::{index_page, record_list, IndexVm};
