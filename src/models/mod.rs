/// Модели предикции

pub mod prediction;
pub mod regression;

pub use prediction::{predict_project_completion, PredictionOutcome, DEFAULT_DAYS_AHEAD};
pub use regression::{fit_line, r_squared, LinearTrend, TrendFit};
