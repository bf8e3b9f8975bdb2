use serde::{Deserialize, Deserializer, Serialize};

/// Number of website analytics rows kept per snapshot.
pub const WEBSITE_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Engagement {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Engagement::High,
            "medium" => Engagement::Medium,
            "low" => Engagement::Low,
            "" | "unknown" => Engagement::Unknown,
            other => {
                log::debug!("Unrecognized engagement level '{other}', treating as unknown");
                Engagement::Unknown
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Engagement::High => "high",
            Engagement::Medium => "medium",
            Engagement::Low => "low",
            Engagement::Unknown => "unknown",
        }
    }
}

fn deserialize_engagement<'de, D>(deserializer: D) -> Result<Engagement, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Engagement::parse).unwrap_or_default())
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.trim().is_empty()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CustomerRecord {
    pub lifetime_value: f64,
    #[serde(deserialize_with = "deserialize_engagement")]
    pub engagement_level: Engagement,
    pub total_invoices: u64,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub stripe_customer_id: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_id")]
    pub shopify_customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeveloperRecord {
    pub productivity_score: f64,
    /// Days
    pub avg_pr_merge_time: f64,
    /// 0 = Sunday. Out-of-range values are kept and labelled `Unknown`.
    pub most_active_day: i64,
    pub most_active_hour: u32,
    pub total_prs: u64,
    pub total_repos: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebsitePoint {
    pub daily_users: f64,
    pub new_users: f64,
    pub users: f64,
    pub bounce_rate: f64,
    pub sessions_per_user: f64,
}

/// Point-in-time bundle of one account's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccountSnapshot {
    pub customer: Option<CustomerRecord>,
    pub developer: Option<DeveloperRecord>,
    /// Chronological.
    pub revenue_series: Vec<RevenuePoint>,
    /// Most recent last.
    pub website_series: Vec<WebsitePoint>,
}

impl AccountSnapshot {
    /// Trims the website series to the most recent `WEBSITE_WINDOW` rows.
    pub fn normalized(mut self) -> Self {
        let len = self.website_series.len();
        if len > WEBSITE_WINDOW {
            self.website_series.drain(..len - WEBSITE_WINDOW);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let snapshot: AccountSnapshot = serde_json::from_str(
            r#"{
                "customer": { "lifetime_value": 250.0, "engagement_level": "HIGH", "stripe_customer_id": "  " },
                "developer": { "productivity_score": 12 },
                "revenue_series": [{ "month": "2024-01", "revenue": 100.0 }]
            }"#,
        )
        .expect("parse snapshot");

        let customer = snapshot.customer.expect("customer");
        assert_eq!(customer.engagement_level, Engagement::High);
        assert_eq!(customer.total_invoices, 0);
        assert_eq!(customer.stripe_customer_id, None);

        let developer = snapshot.developer.expect("developer");
        assert_eq!(developer.avg_pr_merge_time, 0.0);
        assert_eq!(developer.most_active_day, 0);

        assert_eq!(snapshot.revenue_series[0].growth_rate, None);
        assert!(snapshot.website_series.is_empty());
    }

    #[test]
    fn unknown_engagement_labels_collapse_to_unknown() {
        assert_eq!(Engagement::parse("sky-high"), Engagement::Unknown);
        assert_eq!(Engagement::parse(" Low "), Engagement::Low);
    }

    #[test]
    fn normalized_keeps_most_recent_website_rows() {
        let website_series = (0..40)
            .map(|i| WebsitePoint {
                daily_users: i as f64,
                ..WebsitePoint::default()
            })
            .collect();
        let snapshot = AccountSnapshot {
            website_series,
            ..AccountSnapshot::default()
        }
        .normalized();

        assert_eq!(snapshot.website_series.len(), WEBSITE_WINDOW);
        assert_eq!(snapshot.website_series[0].daily_users, 10.0);
        assert_eq!(snapshot.website_series[29].daily_users, 39.0);
    }
}
