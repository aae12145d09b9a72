//! Предикция хода строительства
//!
//! Чистая батч-вычислялка поверх утвержденных partes diárias: агрегация
//! в посуточные метрики, два независимых линейных тренда (накопительные
//! часы и стоимость по индексу дня), проекция на заданное число дней
//! вперед и оценка уверенности через R².

use ndarray::Array1;

use crate::models::regression::{fit_line, r_squared, LinearTrend, TrendFit};
use crate::preprocessing::aggregate_day_metrics;
use crate::provider::{HistoricalDataProvider, ProviderError};
use crate::types::{
    ConfidenceSummary, DayMetric, HistoricalSummary, NoHistoricalData, PredictionResult,
    ProjectionSummary, TrendSummary,
};

pub const DEFAULT_DAYS_AHEAD: i64 = 30;

/// Исход предикции: результат либо мягкий отказ "нет истории".
/// Отказ — штатный путь, не ошибка; жесткие отказы чтения данных
/// идут отдельно, через Err(ProviderError).
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success(PredictionResult),
    NoData(NoHistoricalData),
}

/// Единственная публичная точка входа движка.
///
/// `days_ahead` по умолчанию 30; ноль и отрицательные значения не
/// валидируются — проекция просто сдвигается назад или остается на месте.
pub async fn predict_project_completion<P>(
    provider: &P,
    project_id: i64,
    days_ahead: Option<i64>,
) -> Result<PredictionOutcome, ProviderError>
where
    P: HistoricalDataProvider + ?Sized,
{
    let days_ahead = days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD);
    let reports = provider.fetch_approved_daily_reports(project_id).await?;
    let metrics = aggregate_day_metrics(&reports);
    Ok(build_prediction(project_id, days_ahead, &metrics))
}

/// Сборка результата по готовым метрикам. Чистая функция: одинаковый
/// вход — одинаковый выход, байт в байт.
pub fn build_prediction(
    project_id: i64,
    days_ahead: i64,
    metrics: &[DayMetric],
) -> PredictionOutcome {
    let Some(last) = metrics.last() else {
        return PredictionOutcome::NoData(NoHistoricalData::new());
    };

    let x: Array1<f64> = metrics.iter().map(|m| m.day_index as f64).collect();
    let hours_y: Array1<f64> = metrics.iter().map(|m| m.cumulative_hours).collect();
    let cost_y: Array1<f64> = metrics.iter().map(|m| m.cumulative_cost).collect();

    let (hours_trend, hours_r2) = resolve_fit(&x, &hours_y);
    let (cost_trend, cost_r2) = resolve_fit(&x, &cost_y);

    let target_day_index = last.day_index + days_ahead;
    let projected_hours = hours_trend.value_at(target_day_index as f64);
    let projected_cost = cost_trend.value_at(target_day_index as f64);

    let days = metrics.len();
    let mean_hours_per_day = hours_y[days - 1] / days as f64;
    let mean_cost_per_day = cost_y[days - 1] / days as f64;

    PredictionOutcome::Success(PredictionResult {
        success: true,
        project_id,
        days_ahead,
        historical: HistoricalSummary {
            days_analyzed: days,
            current_cumulative_hours: fixed2(last.cumulative_hours),
            current_cumulative_cost: fixed2(last.cumulative_cost),
            average_hours_per_day: fixed2(mean_hours_per_day),
            average_cost_per_day: fixed2(mean_cost_per_day),
        },
        projection: ProjectionSummary {
            target_day_index,
            projected_cumulative_hours: fixed2(projected_hours),
            projected_cumulative_cost: fixed2(projected_cost),
            additional_hours: fixed2(projected_hours - last.cumulative_hours),
            additional_cost: fixed2(projected_cost - last.cumulative_cost),
        },
        confidence: ConfidenceSummary {
            hours_r_squared: percent2(hours_r2),
            cost_r_squared: percent2(cost_r2),
            level: confidence_level(cost_r2).to_string(),
        },
        trend: TrendSummary {
            hours_per_day: fixed2(hours_trend.slope),
            cost_per_day: fixed2(cost_trend.slope),
        },
    })
}

/// Вырожденный подбор (одна точка) схлопывается в плоский тренд через
/// среднее с нулевой уверенностью — вместо NaN в ответе.
fn resolve_fit(x: &Array1<f64>, y: &Array1<f64>) -> (LinearTrend, f64) {
    match fit_line(x, y) {
        TrendFit::Line(trend) => {
            let r2 = r_squared(x, y, &trend);
            (trend, r2)
        }
        TrendFit::InsufficientVariance { mean_y } => (
            LinearTrend {
                slope: 0.0,
                intercept: mean_y,
            },
            0.0,
        ),
    }
}

/// Качественная метка уверенности по R² тренда стоимости.
pub fn confidence_level(cost_r2: f64) -> &'static str {
    if cost_r2 > 0.7 {
        "High"
    } else if cost_r2 > 0.4 {
        "Medium"
    } else {
        "Low"
    }
}

fn fixed2(value: f64) -> String {
    format!("{value:.2}")
}

fn percent2(r_squared: f64) -> String {
    format!("{:.2}%", r_squared * 100.0)
}
