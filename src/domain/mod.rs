// Feature registry and predictor capabilities
pub mod ml;

// Request and response envelopes
pub mod prediction;

// Domain-specific error types
pub mod errors;
