pub mod args;
pub mod dataset;
pub mod error;
pub mod model;
pub mod report;
pub mod utils;
