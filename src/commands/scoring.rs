use crate::analysis::thresholds::*;
use crate::models::assessment::*;
use crate::models::patterns::*;
use crate::models::snapshot::{AccountSnapshot, Engagement};

const SECONDS_PER_DAY: i64 = 86_400;

/// Classify every category of a snapshot. Pure and total: empty inputs
/// produce `no_data` categories instead of errors.
pub fn classify(snapshot: &AccountSnapshot) -> PatternReport {
    PatternReport {
        revenue: crate::analysis::revenue::classify_revenue(&snapshot.revenue_series),
        development: crate::analysis::development::classify_development(snapshot.developer.as_ref()),
        customer: crate::analysis::customer::classify_customer(snapshot.customer.as_ref()),
        website: crate::analysis::website::classify_website(&snapshot.website_series),
    }
}

/// First match wins, in the order below.
pub fn determine_user_type(patterns: &PatternReport) -> UserType {
    let dev_score = patterns.productivity_score();
    let mrr = patterns.current_mrr();

    if dev_score > ACTIVE_PRODUCTIVITY && mrr > FOUNDER_MRR {
        UserType::TechnicalFounder
    } else if dev_score > ACTIVE_PRODUCTIVITY {
        UserType::Developer
    } else if mrr > ENTERPRISE_MRR {
        UserType::EnterpriseCustomer
    } else if mrr > BUSINESS_MRR {
        UserType::BusinessCustomer
    } else {
        UserType::StandardUser
    }
}

pub fn health_score(patterns: &PatternReport) -> u8 {
    let mut score = BASE_SCORE;

    match patterns.revenue_trend() {
        Some(RevenueTrend::Growing) => score += REVENUE_TREND_DELTA,
        Some(RevenueTrend::Declining) => score -= REVENUE_TREND_DELTA,
        None => {}
    }

    match patterns.engagement() {
        Some(Engagement::High) => score += ENGAGEMENT_DELTA,
        Some(Engagement::Low) => score -= ENGAGEMENT_DELTA,
        _ => {}
    }

    if matches!(
        patterns.activity_level(),
        Some(ActivityLevel::Active | ActivityLevel::VeryActive)
    ) {
        score += ACTIVITY_HEALTH_BONUS;
    }

    clamp_score(score)
}

pub fn risk_factors(patterns: &PatternReport) -> u32 {
    let mut factors = 0;

    if patterns.revenue_trend() == Some(RevenueTrend::Declining) {
        factors += DECLINING_REVENUE_RISK;
    }
    if patterns.engagement() == Some(Engagement::Low) {
        factors += LOW_ENGAGEMENT_RISK;
    }
    if patterns.website_engagement() == Some(EngagementQuality::Low) {
        factors += LOW_WEBSITE_ENGAGEMENT_RISK;
    }

    factors
}

pub fn churn_risk(patterns: &PatternReport) -> ChurnRisk {
    ChurnRisk::from_factors(risk_factors(patterns))
}

pub fn growth_potential(patterns: &PatternReport) -> u8 {
    let mut score = BASE_SCORE;

    if patterns.revenue_trend() == Some(RevenueTrend::Growing) {
        score += REVENUE_TREND_DELTA;
    }
    if patterns.activity_level() == Some(ActivityLevel::VeryActive) {
        score += VERY_ACTIVE_GROWTH_BONUS;
    }
    if patterns.traffic_trend() == Some(TrafficTrend::Growing) {
        score += TRAFFIC_GROWTH_BONUS;
    }

    clamp_score(score)
}

/// Rules are applied in a fixed order; no dedup and no cap.
pub fn build_recommendations(health_score: u8, user_type: UserType, growth_potential: u8) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if health_score < HEALTH_CALL_THRESHOLD {
        recommendations.push(recommendation(
            RecommendationType::Revenue,
            Priority::High,
            "Schedule customer success call",
            "Health score below threshold",
            "Reduce churn risk by 40%",
        ));
    }

    if user_type == UserType::Developer {
        recommendations.push(recommendation(
            RecommendationType::Development,
            Priority::Medium,
            "Suggest code review automation",
            "High PR volume detected",
            "Save 5 hours per week",
        ));
    }

    if growth_potential > PREMIUM_OFFER_THRESHOLD {
        recommendations.push(recommendation(
            RecommendationType::Growth,
            Priority::High,
            "Offer premium features",
            "High engagement and growth potential",
            "Potential 30% revenue increase",
        ));
    }

    recommendations
}

pub fn assess(patterns: &PatternReport) -> AccountAssessment {
    let health_score = health_score(patterns);
    let growth_potential = growth_potential(patterns);
    let user_type = determine_user_type(patterns);

    AccountAssessment {
        health_score,
        churn_risk: churn_risk(patterns),
        growth_potential,
        user_type,
        recommendations: build_recommendations(health_score, user_type, growth_potential),
    }
}

pub fn extract_key_metrics(snapshot: &AccountSnapshot) -> KeyMetrics {
    let recent_start = snapshot.website_series.len().saturating_sub(DAILY_USERS_WINDOW);
    let recent_users: f64 = snapshot.website_series[recent_start..]
        .iter()
        .map(|p| p.daily_users)
        .sum();

    KeyMetrics {
        lifetime_value: snapshot.customer.as_ref().map_or(0.0, |c| c.lifetime_value),
        total_repos: snapshot.developer.as_ref().map_or(0, |d| d.total_repos),
        monthly_revenue: snapshot.revenue_series.last().map_or(0.0, |p| p.revenue),
        // Fixed seven-day denominator: missing days count as zero traffic.
        avg_daily_users: recent_users / DAILY_USERS_WINDOW as f64,
    }
}

/// Full derivation for one account. `retention_days` sets the expiry horizon.
pub fn analyze_account(
    account_id: &str,
    snapshot: &AccountSnapshot,
    generated_at: i64,
    retention_days: u32,
) -> AnalysisReport {
    let patterns = classify(snapshot);
    let assessment = assess(&patterns);

    AnalysisReport {
        account_id: account_id.to_string(),
        key_metrics: extract_key_metrics(snapshot),
        patterns,
        assessment,
        generated_at,
        expires_at: generated_at + i64::from(retention_days) * SECONDS_PER_DAY,
    }
}

fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

fn recommendation(
    kind: RecommendationType,
    priority: Priority,
    action: &str,
    reason: &str,
    impact: &str,
) -> Recommendation {
    Recommendation {
        kind,
        priority,
        action: action.to_string(),
        reason: reason.to_string(),
        impact: impact.to_string(),
    }
}
