use crate::analysis::thresholds::{SEASONALITY_MIN_POINTS, VOLATILE_GROWTH_RATE};
use crate::models::patterns::{RevenuePattern, RevenueStability, RevenueTrend, Seasonality};
use crate::models::snapshot::RevenuePoint;

/// Classify a chronological revenue series.
/// Points whose growth rate is absent or zero are skipped for trend, average
/// and stability.
pub fn classify_revenue(series: &[RevenuePoint]) -> RevenuePattern {
    let Some(latest) = series.last() else {
        return RevenuePattern::NoData;
    };

    let growth_rates: Vec<f64> = series
        .iter()
        .filter_map(|p| p.growth_rate)
        .filter(|r| *r != 0.0)
        .collect();
    let total: f64 = growth_rates.iter().sum();

    let trend = if total > 0.0 {
        RevenueTrend::Growing
    } else {
        RevenueTrend::Declining
    };

    let avg_growth_rate = if growth_rates.is_empty() {
        0.0
    } else {
        total / growth_rates.len() as f64
    };

    let stability = if growth_rates.iter().all(|r| r.abs() < VOLATILE_GROWTH_RATE) {
        RevenueStability::Stable
    } else {
        RevenueStability::Volatile
    };

    RevenuePattern::Analyzed {
        trend,
        avg_growth_rate,
        seasonality: detect_seasonality(series),
        stability,
        current_mrr: latest.revenue,
    }
}

fn detect_seasonality(series: &[RevenuePoint]) -> Seasonality {
    if series.len() < SEASONALITY_MIN_POINTS {
        Seasonality::InsufficientData
    } else {
        Seasonality::NotImplemented
    }
}
