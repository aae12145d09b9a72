/// Модуль предобработки данных

pub mod aggregation;

pub use aggregation::aggregate_day_metrics;
