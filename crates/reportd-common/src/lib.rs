pub mod error;
pub mod refs;
pub mod rendering;
pub mod request;
pub mod telemetry;

pub use error::RequestError;
pub use refs::{CohortDefinitionRef, ReportDefinitionRef, UserRef};
pub use rendering::RenderingMode;
pub use request::{Priority, ReportRequest};
