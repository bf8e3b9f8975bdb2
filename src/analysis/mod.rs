pub mod customer;
pub mod development;
pub mod revenue;
pub mod thresholds;
pub mod website;
