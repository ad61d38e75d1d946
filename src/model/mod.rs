pub mod config;
pub mod constants;
pub mod curves;
pub mod decay;
pub mod driver_update;
pub mod rating_model;
pub mod rating_tracker;
pub mod season_transition;
pub mod season_weight;
pub mod structures;
pub mod team_update;

pub use config::{ConfigError, RatingConfig};
pub use rating_model::{compute_ratings, RatingModel};
