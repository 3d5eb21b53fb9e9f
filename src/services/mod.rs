pub mod collection_service;
pub mod conversion_service;
pub mod grading_service;
pub mod session_service;

pub use collection_service::CollectionService;
pub use conversion_service::{ConversionOutcome, ConversionService};
pub use grading_service::GradingService;
pub use session_service::SessionService;
