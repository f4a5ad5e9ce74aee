pub mod advice;
pub mod analytics;
pub mod seed;
