//! Fixed threshold table shared by the pattern classifiers and the scorer.
//! Changing a value here moves both the classification boundary and every
//! score derived from it.

// Revenue
/// Any |growth_rate| at or above this marks the series volatile.
pub const VOLATILE_GROWTH_RATE: f64 = 20.0;
/// Minimum number of monthly points before seasonality is considered.
pub const SEASONALITY_MIN_POINTS: usize = 12;

// Development
pub const VERY_ACTIVE_PRODUCTIVITY: f64 = 100.0;
pub const ACTIVE_PRODUCTIVITY: f64 = 50.0;
pub const MODERATE_PRODUCTIVITY: f64 = 20.0;
/// Days
pub const EFFICIENT_PR_MERGE_TIME: f64 = 2.0;
pub const COLLABORATIVE_PR_COUNT: u64 = 10;

// Customer
pub const ENTERPRISE_LTV: f64 = 10_000.0;
pub const PREMIUM_LTV: f64 = 1_000.0;
pub const STANDARD_LTV: f64 = 100.0;
pub const FREQUENT_INVOICE_COUNT: u64 = 10;

// Website
pub const TRAFFIC_GROWTH_FACTOR: f64 = 1.1;
pub const TRAFFIC_DECLINE_FACTOR: f64 = 0.9;
/// Mean bounce rate (percent) below which engagement counts as high.
pub const HIGH_ENGAGEMENT_BOUNCE_RATE: f64 = 50.0;
pub const RETAINED_SESSIONS_PER_USER: f64 = 1.5;
pub const EARLY_STAGE_NEW_USER_RATIO: f64 = 0.7;
pub const GROWTH_STAGE_NEW_USER_RATIO: f64 = 0.3;
/// Days averaged for the `avg_daily_users` key metric.
pub const DAILY_USERS_WINDOW: usize = 7;

// User type
pub const FOUNDER_MRR: f64 = 1_000.0;
pub const ENTERPRISE_MRR: f64 = 5_000.0;
pub const BUSINESS_MRR: f64 = 500.0;

// Scores
pub const BASE_SCORE: i32 = 50;
pub const REVENUE_TREND_DELTA: i32 = 20;
pub const ENGAGEMENT_DELTA: i32 = 15;
pub const ACTIVITY_HEALTH_BONUS: i32 = 15;
pub const VERY_ACTIVE_GROWTH_BONUS: i32 = 20;
pub const TRAFFIC_GROWTH_BONUS: i32 = 10;

pub const DECLINING_REVENUE_RISK: u32 = 2;
pub const LOW_ENGAGEMENT_RISK: u32 = 2;
pub const LOW_WEBSITE_ENGAGEMENT_RISK: u32 = 1;

// Recommendations
pub const HEALTH_CALL_THRESHOLD: u8 = 70;
pub const PREMIUM_OFFER_THRESHOLD: u8 = 80;
