pub mod memory;
pub mod queue;
pub mod types;

pub use memory::MemoryScheduler;
pub use queue::RequestQueue;
pub use types::ReportScheduler;
