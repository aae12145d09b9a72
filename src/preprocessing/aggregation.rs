//! Агрегация дневных отчетов в посуточные метрики

use crate::types::{DailyReport, DayMetric};

/// Преобразует упорядоченную последовательность partes diárias в
/// последовательность DayMetric с накопительными итогами.
///
/// Контракт: вход уже отфильтрован (approved = true) и отсортирован
/// по дате по возрастанию — это обязанность поставщика данных, здесь
/// порядок не проверяется и не меняется. Индекс дня — позиция записи
/// в поданном порядке (с 1), даты могут повторяться и иметь пропуски.
///
/// Пустой вход дает пустой выход; стадия никогда не падает.
pub fn aggregate_day_metrics(reports: &[DailyReport]) -> Vec<DayMetric> {
    let mut cumulative_hours = 0.0;
    let mut cumulative_cost = 0.0;

    reports
        .iter()
        .enumerate()
        .map(|(i, report)| {
            let hours_for_day: f64 = report.items.iter().map(|item| item.hours_worked).sum();
            let cost_for_day: f64 = report.items.iter().map(|item| item.cost()).sum();

            cumulative_hours += hours_for_day;
            cumulative_cost += cost_for_day;

            let day_index = (i + 1) as i64;
            DayMetric {
                day_index,
                date: report.date,
                hours_for_day,
                cost_for_day,
                cumulative_hours,
                cumulative_cost,
                average_hours_per_day: cumulative_hours / day_index as f64,
            }
        })
        .collect()
}
