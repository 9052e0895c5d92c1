pub mod cascade;
pub mod lookup;
pub mod ml;
pub mod normalize;
pub mod stats; // Classification statistics records (PII-filtered)
