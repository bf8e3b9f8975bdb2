use crate::analysis::thresholds::{
    EARLY_STAGE_NEW_USER_RATIO, GROWTH_STAGE_NEW_USER_RATIO, HIGH_ENGAGEMENT_BOUNCE_RATE,
    RETAINED_SESSIONS_PER_USER, TRAFFIC_DECLINE_FACTOR, TRAFFIC_GROWTH_FACTOR,
};
use crate::models::patterns::{EngagementQuality, GrowthPhase, Retention, TrafficTrend, WebsitePattern};
use crate::models::snapshot::WebsitePoint;

pub fn classify_website(series: &[WebsitePoint]) -> WebsitePattern {
    if series.is_empty() {
        return WebsitePattern::NoData;
    }

    let daily_users: Vec<f64> = series.iter().map(|p| p.daily_users).collect();
    let avg_bounce = mean(series.iter().map(|p| p.bounce_rate));

    WebsitePattern::Analyzed {
        traffic_trend: detect_trend(&daily_users),
        engagement_quality: if avg_bounce < HIGH_ENGAGEMENT_BOUNCE_RATE {
            EngagementQuality::High
        } else {
            EngagementQuality::Low
        },
        user_retention: if series.iter().any(|p| p.sessions_per_user > RETAINED_SESSIONS_PER_USER) {
            Retention::Good
        } else {
            Retention::NeedsWork
        },
        growth_phase: categorize_growth(series),
    }
}

/// Split-half comparison: mean of the later half against the earlier half.
/// Odd-length series put the extra point in the later half.
pub fn detect_trend(values: &[f64]) -> TrafficTrend {
    if values.len() < 2 {
        return TrafficTrend::InsufficientData;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_mean = mean(first.iter().copied());
    let second_mean = mean(second.iter().copied());

    if second_mean > first_mean * TRAFFIC_GROWTH_FACTOR {
        TrafficTrend::Growing
    } else if second_mean < first_mean * TRAFFIC_DECLINE_FACTOR {
        TrafficTrend::Declining
    } else {
        TrafficTrend::Stable
    }
}

fn categorize_growth(series: &[WebsitePoint]) -> GrowthPhase {
    let new_user_ratio = mean(series.iter().map(|p| {
        if p.users > 0.0 {
            p.new_users / p.users
        } else {
            0.0
        }
    }));

    if new_user_ratio > EARLY_STAGE_NEW_USER_RATIO {
        GrowthPhase::EarlyStage
    } else if new_user_ratio > GROWTH_STAGE_NEW_USER_RATIO {
        GrowthPhase::GrowthStage
    } else {
        GrowthPhase::MatureStage
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(daily_users: f64, new_users: f64, users: f64, bounce_rate: f64, sessions_per_user: f64) -> WebsitePoint {
        WebsitePoint {
            daily_users,
            new_users,
            users,
            bounce_rate,
            sessions_per_user,
        }
    }

    #[test]
    fn trend_needs_two_points() {
        assert_eq!(detect_trend(&[]), TrafficTrend::InsufficientData);
        assert_eq!(detect_trend(&[10.0]), TrafficTrend::InsufficientData);
    }

    #[test]
    fn split_half_trend_uses_ten_percent_band() {
        assert_eq!(detect_trend(&[100.0, 100.0, 120.0, 120.0]), TrafficTrend::Growing);
        assert_eq!(detect_trend(&[100.0, 100.0, 80.0, 80.0]), TrafficTrend::Declining);
        assert_eq!(detect_trend(&[100.0, 100.0, 105.0, 95.0]), TrafficTrend::Stable);
        // 110 is exactly the growth boundary and stays stable.
        assert_eq!(detect_trend(&[100.0, 110.0]), TrafficTrend::Stable);
    }

    #[test]
    fn odd_length_puts_extra_point_in_second_half() {
        // first = [10], second = [10, 40] -> 25 > 11
        assert_eq!(detect_trend(&[10.0, 10.0, 40.0]), TrafficTrend::Growing);
    }

    #[test]
    fn all_zero_traffic_is_stable() {
        assert_eq!(detect_trend(&[0.0, 0.0, 0.0]), TrafficTrend::Stable);
    }

    #[test]
    fn empty_series_has_no_data() {
        assert_eq!(classify_website(&[]), WebsitePattern::NoData);
    }

    #[test]
    fn single_entry_is_classified_with_insufficient_trend() {
        let pattern = classify_website(&[day(50.0, 10.0, 50.0, 40.0, 2.0)]);
        assert_eq!(
            pattern,
            WebsitePattern::Analyzed {
                traffic_trend: TrafficTrend::InsufficientData,
                engagement_quality: EngagementQuality::High,
                user_retention: Retention::Good,
                growth_phase: GrowthPhase::MatureStage,
            }
        );
    }

    #[test]
    fn zero_users_count_as_zero_ratio() {
        let series = vec![day(10.0, 9.0, 10.0, 60.0, 1.0), day(10.0, 5.0, 0.0, 60.0, 1.0)];
        let WebsitePattern::Analyzed { growth_phase, engagement_quality, user_retention, .. } =
            classify_website(&series)
        else {
            panic!("expected analyzed website");
        };

        // (0.9 + 0.0) / 2 = 0.45
        assert_eq!(growth_phase, GrowthPhase::GrowthStage);
        assert_eq!(engagement_quality, EngagementQuality::Low);
        assert_eq!(user_retention, Retention::NeedsWork);
    }

    #[test]
    fn mostly_new_users_is_early_stage() {
        let series = vec![day(10.0, 8.0, 10.0, 30.0, 1.0), day(12.0, 9.0, 10.0, 30.0, 1.0)];
        let WebsitePattern::Analyzed { growth_phase, .. } = classify_website(&series) else {
            panic!("expected analyzed website");
        };
        assert_eq!(growth_phase, GrowthPhase::EarlyStage);
    }

    #[test]
    fn engagement_and_retention_edges_fall_on_the_weak_side() {
        let series = vec![day(10.0, 2.0, 10.0, 40.0, 1.5), day(10.0, 2.0, 10.0, 60.0, 1.5)];
        let WebsitePattern::Analyzed { engagement_quality, user_retention, .. } = classify_website(&series)
        else {
            panic!("expected analyzed website");
        };

        // mean bounce rate is exactly 50
        assert_eq!(engagement_quality, EngagementQuality::Low);
        assert_eq!(user_retention, Retention::NeedsWork);
    }
}
