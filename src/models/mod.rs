pub mod assessment;
pub mod batch;
pub mod patterns;
pub mod snapshot;
