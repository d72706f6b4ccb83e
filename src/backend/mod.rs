pub mod memory;
pub mod storage;
pub mod traits;
pub mod types;

pub use memory::MemoryRepository;
pub use storage::{DirStorage, MemoryStorage};
pub use traits::{ListingRepository, ObjectStorage};
pub use types::{ChangeEvent, ChangeKind, LISTINGS_TABLE};
