pub mod buckets;
pub mod dashboard;
pub mod ranking;
pub mod rating;
pub mod resolver;
