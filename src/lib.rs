pub mod executor;
pub mod metadata;
pub mod model;
pub mod telemetry;
pub mod traits;

// Re-export common types for convenience
pub use executor::*;
pub use model::*;
pub use traits::*;
