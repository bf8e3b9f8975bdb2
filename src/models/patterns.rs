use crate::models::snapshot::Engagement;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTrend {
    Growing,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueStability {
    Stable,
    Volatile,
}

/// No seasonality algorithm exists yet; series long enough to analyze report `NotImplemented`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    InsufficientData,
    NotImplemented,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevenuePattern {
    NoData,
    Analyzed {
        trend: RevenueTrend,
        avg_growth_rate: f64,
        seasonality: Seasonality,
        stability: RevenueStability,
        current_mrr: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrEfficiency {
    Efficient,
    NeedsImprovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStyle {
    Active,
    Passive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DevelopmentPattern {
    NoData,
    Analyzed {
        activity_level: ActivityLevel,
        productivity_score: f64,
        pr_efficiency: PrEfficiency,
        most_active_day: String,
        most_active_hour: u32,
        collaboration_style: CollaborationStyle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTier {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseFrequency {
    Frequent,
    Occasional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CustomerPattern {
    NoData,
    Analyzed {
        customer_value: ValueTier,
        engagement: Engagement,
        purchase_frequency: PurchaseFrequency,
        cross_platform: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficTrend {
    Growing,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementQuality {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    Good,
    NeedsWork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPhase {
    EarlyStage,
    GrowthStage,
    MatureStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebsitePattern {
    NoData,
    Analyzed {
        traffic_trend: TrafficTrend,
        engagement_quality: EngagementQuality,
        user_retention: Retention,
        growth_phase: GrowthPhase,
    },
}

/// Per-category classification of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub revenue: RevenuePattern,
    pub development: DevelopmentPattern,
    pub customer: CustomerPattern,
    pub website: WebsitePattern,
}

impl PatternReport {
    pub fn revenue_trend(&self) -> Option<RevenueTrend> {
        match self.revenue {
            RevenuePattern::Analyzed { trend, .. } => Some(trend),
            RevenuePattern::NoData => None,
        }
    }

    pub fn current_mrr(&self) -> f64 {
        match self.revenue {
            RevenuePattern::Analyzed { current_mrr, .. } => current_mrr,
            RevenuePattern::NoData => 0.0,
        }
    }

    pub fn activity_level(&self) -> Option<ActivityLevel> {
        match self.development {
            DevelopmentPattern::Analyzed { activity_level, .. } => Some(activity_level),
            DevelopmentPattern::NoData => None,
        }
    }

    pub fn productivity_score(&self) -> f64 {
        match self.development {
            DevelopmentPattern::Analyzed { productivity_score, .. } => productivity_score,
            DevelopmentPattern::NoData => 0.0,
        }
    }

    pub fn engagement(&self) -> Option<Engagement> {
        match self.customer {
            CustomerPattern::Analyzed { engagement, .. } => Some(engagement),
            CustomerPattern::NoData => None,
        }
    }

    pub fn website_engagement(&self) -> Option<EngagementQuality> {
        match self.website {
            WebsitePattern::Analyzed { engagement_quality, .. } => Some(engagement_quality),
            WebsitePattern::NoData => None,
        }
    }

    pub fn traffic_trend(&self) -> Option<TrafficTrend> {
        match self.website {
            WebsitePattern::Analyzed { traffic_trend, .. } => Some(traffic_trend),
            WebsitePattern::NoData => None,
        }
    }
}
