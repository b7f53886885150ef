pub mod ml;
pub mod router;
pub mod validation;
