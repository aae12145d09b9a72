/// Типы данных для движка предикции

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// "Parte Diária" — финализированный дневной отчет по объекту (obra).
/// Движок получает только записи с approved = true, отсортированные по дате.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub document_id: String,
    pub project_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub items: Vec<WorkItem>,
}

/// Строка дневного отчета: часы и ставка одного работника/категории.
/// Поля приходят из внешнего ERP и бывают пустыми или нечисловыми,
/// поэтому парсим их толерантно (см. `non_negative_or_zero`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub hours_worked: f64,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_price: f64,
}

impl WorkItem {
    pub fn cost(&self) -> f64 {
        self.hours_worked * self.unit_price
    }
}

/// Агрегат по одному дню: дневные и накопительные метрики.
/// `day_index` — позиция в поданной последовательности (с 1),
/// не календарный номер дня.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMetric {
    pub day_index: i64,
    pub date: NaiveDate,
    pub hours_for_day: f64,
    pub cost_for_day: f64,
    pub cumulative_hours: f64,
    pub cumulative_cost: f64,
    pub average_hours_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSummary {
    pub days_analyzed: usize,
    pub current_cumulative_hours: String,
    pub current_cumulative_cost: String,
    pub average_hours_per_day: String,
    pub average_cost_per_day: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub target_day_index: i64,
    pub projected_cumulative_hours: String,
    pub projected_cumulative_cost: String,
    pub additional_hours: String,
    pub additional_cost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSummary {
    /// R² тренда часов в процентах, например "97.31%"
    pub hours_r_squared: String,
    /// R² тренда стоимости в процентах
    pub cost_r_squared: String,
    /// "High" | "Medium" | "Low" — по R² тренда стоимости
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub hours_per_day: String,
    pub cost_per_day: String,
}

/// Успешный результат предикции. Все денежные/часовые значения
/// форматируются с двумя знаками после запятой — так ожидают
/// существующие потребители API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub success: bool,
    pub project_id: i64,
    pub days_ahead: i64,
    pub historical: HistoricalSummary,
    pub projection: ProjectionSummary,
    pub confidence: ConfidenceSummary,
    pub trend: TrendSummary,
}

/// Мягкий отказ: по объекту нет ни одной утвержденной parte diária.
/// Это штатный исход, а не ошибка — HTTP слой мапит его в 404.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoHistoricalData {
    pub success: bool,
    pub message: String,
}

impl NoHistoricalData {
    pub fn new() -> Self {
        Self {
            success: false,
            message: "Insufficient historical data for prediction".to_string(),
        }
    }
}

impl Default for NoHistoricalData {
    fn default() -> Self {
        Self::new()
    }
}

/// Ответ эндпоинта /predicao-obra/:projectId/metricas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub project_id: i64,
    pub total_days: usize,
    pub metricas: Vec<DayMetric>,
}

/// Приведение значения из внешней системы к неотрицательному числу:
/// число или числовая строка — как есть; отсутствие, мусор, отрицательные
/// и нефинитные значения — 0.0.
pub fn non_negative_or_zero(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(non_negative_or_zero(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(non_negative_or_zero(&json!(7.5)), 7.5);
        assert_eq!(non_negative_or_zero(&json!("12.25")), 12.25);
        assert_eq!(non_negative_or_zero(&json!(" 3 ")), 3.0);
    }

    #[test]
    fn coerces_garbage_to_zero() {
        assert_eq!(non_negative_or_zero(&json!(null)), 0.0);
        assert_eq!(non_negative_or_zero(&json!("n/a")), 0.0);
        assert_eq!(non_negative_or_zero(&json!(-4.0)), 0.0);
        assert_eq!(non_negative_or_zero(&json!({"x": 1})), 0.0);
    }

    #[test]
    fn work_item_deserializes_leniently() {
        let item: WorkItem =
            serde_json::from_value(json!({"hoursWorked": "8", "unitPrice": null})).unwrap();
        assert_eq!(item.hours_worked, 8.0);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.cost(), 0.0);

        let item: WorkItem = serde_json::from_value(json!({})).unwrap();
        assert_eq!(item.hours_worked, 0.0);
        assert_eq!(item.unit_price, 0.0);
    }
}
