//! Линейная регрессия методом наименьших квадратов

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Подобранная прямая y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Результат подбора: либо прямая, либо вырожденный случай
/// (нулевая дисперсия по x — для индексов дней возможен только при n = 1).
/// Вызывающий обязан обработать обе ветки, нефинитные числа наружу
/// не выходят.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendFit {
    Line(LinearTrend),
    InsufficientVariance { mean_y: f64 },
}

/// МНК по точкам (x[i], y[i]).
///
/// slope = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
/// intercept = (Σy − slope·Σx) / n
///
/// Пустой вход трактуется как плоский нулевой тренд — {0, 0},
/// без ошибки.
pub fn fit_line(x: &Array1<f64>, y: &Array1<f64>) -> TrendFit {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    if n == 0 {
        return TrendFit::Line(LinearTrend {
            slope: 0.0,
            intercept: 0.0,
        });
    }

    let n_f = n as f64;
    let sum_x = x.sum();
    let sum_y = y.sum();
    let sum_xy = x.dot(y);
    let sum_xx = x.dot(x);

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return TrendFit::InsufficientVariance { mean_y: sum_y / n_f };
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;
    TrendFit::Line(LinearTrend { slope, intercept })
}

/// Коэффициент детерминации R² = 1 − SS_res / SS_tot для уже
/// подобранного тренда. Обычно в (−∞, 1]; для накопительных сумм,
/// растущих примерно линейно, близок к 1.
///
/// Вырожденный случай SS_tot ≈ 0 (все y одинаковы): 1.0, если
/// остатки тоже нулевые, иначе 0.0 — NaN в ответ не попадает.
pub fn r_squared(x: &Array1<f64>, y: &Array1<f64>, trend: &LinearTrend) -> f64 {
    let n = y.len();
    if n == 0 {
        return 0.0;
    }

    let mean_y = y.sum() / n as f64;
    let ss_total: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ss_residual: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(xv, yv)| (yv - trend.value_at(*xv)).powi(2))
        .sum();

    if ss_total < f64::EPSILON {
        return if ss_residual < f64::EPSILON { 1.0 } else { 0.0 };
    }

    1.0 - ss_residual / ss_total
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOL: f64 = 1e-9;

    #[test]
    fn fits_a_perfect_line_exactly() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![10.0, 20.0, 30.0];
        match fit_line(&x, &y) {
            TrendFit::Line(trend) => {
                assert!((trend.slope - 10.0).abs() < TOL);
                assert!(trend.intercept.abs() < TOL);
                assert!((r_squared(&x, &y, &trend) - 1.0).abs() < TOL);
            }
            TrendFit::InsufficientVariance { .. } => panic!("expected a line"),
        }
    }

    #[test]
    fn empty_input_is_a_flat_zero_trend() {
        let x = Array1::<f64>::zeros(0);
        let y = Array1::<f64>::zeros(0);
        assert_eq!(
            fit_line(&x, &y),
            TrendFit::Line(LinearTrend {
                slope: 0.0,
                intercept: 0.0
            })
        );
    }

    #[test]
    fn single_point_is_degenerate() {
        let x = array![1.0];
        let y = array![42.0];
        assert_eq!(
            fit_line(&x, &y),
            TrendFit::InsufficientVariance { mean_y: 42.0 }
        );
    }

    #[test]
    fn fits_noisy_data_with_positive_slope() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![8.0, 15.0, 22.0, 31.0, 38.0];
        match fit_line(&x, &y) {
            TrendFit::Line(trend) => {
                assert!(trend.slope > 7.0 && trend.slope < 8.0);
                let r2 = r_squared(&x, &y, &trend);
                assert!(r2 > 0.99 && r2 <= 1.0);
            }
            TrendFit::InsufficientVariance { .. } => panic!("expected a line"),
        }
    }

    #[test]
    fn projection_arithmetic() {
        let trend = LinearTrend {
            slope: 5.0,
            intercept: 2.0,
        };
        assert_eq!(trend.value_at(10.0), 52.0);
    }

    #[test]
    fn r_squared_can_be_negative_for_a_bad_fit() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![10.0, 0.0, 10.0];
        let trend = LinearTrend {
            slope: 100.0,
            intercept: -100.0,
        };
        assert!(r_squared(&x, &y, &trend) < 0.0);
    }

    #[test]
    fn r_squared_of_flat_series_is_finite() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![5.0, 5.0, 5.0];
        let flat = LinearTrend {
            slope: 0.0,
            intercept: 5.0,
        };
        assert_eq!(r_squared(&x, &y, &flat), 1.0);

        let off = LinearTrend {
            slope: 0.0,
            intercept: 6.0,
        };
        assert_eq!(r_squared(&x, &y, &off), 0.0);
    }
}
