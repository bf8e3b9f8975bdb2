use crate::analysis::thresholds::{ENTERPRISE_LTV, FREQUENT_INVOICE_COUNT, PREMIUM_LTV, STANDARD_LTV};
use crate::models::patterns::{CustomerPattern, PurchaseFrequency, ValueTier};
use crate::models::snapshot::CustomerRecord;

pub fn classify_customer(customer: Option<&CustomerRecord>) -> CustomerPattern {
    let Some(customer) = customer else {
        return CustomerPattern::NoData;
    };

    CustomerPattern::Analyzed {
        customer_value: categorize_ltv(customer.lifetime_value),
        engagement: customer.engagement_level,
        purchase_frequency: if customer.total_invoices > FREQUENT_INVOICE_COUNT {
            PurchaseFrequency::Frequent
        } else {
            PurchaseFrequency::Occasional
        },
        cross_platform: customer.stripe_customer_id.is_some() && customer.shopify_customer_id.is_some(),
    }
}

pub fn categorize_ltv(lifetime_value: f64) -> ValueTier {
    if lifetime_value > ENTERPRISE_LTV {
        ValueTier::Enterprise
    } else if lifetime_value > PREMIUM_LTV {
        ValueTier::Premium
    } else if lifetime_value > STANDARD_LTV {
        ValueTier::Standard
    } else {
        ValueTier::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::Engagement;

    #[test]
    fn ltv_tiers() {
        assert_eq!(categorize_ltv(25_000.0), ValueTier::Enterprise);
        assert_eq!(categorize_ltv(10_000.0), ValueTier::Premium);
        assert_eq!(categorize_ltv(1_000.5), ValueTier::Premium);
        assert_eq!(categorize_ltv(1_000.0), ValueTier::Standard);
        assert_eq!(categorize_ltv(100.0), ValueTier::Basic);
    }

    #[test]
    fn cross_platform_needs_both_ids() {
        let mut customer = CustomerRecord {
            lifetime_value: 500.0,
            engagement_level: Engagement::Medium,
            total_invoices: 12,
            stripe_customer_id: Some("cus_123".to_string()),
            shopify_customer_id: None,
        };

        let CustomerPattern::Analyzed { cross_platform, purchase_frequency, customer_value, .. } =
            classify_customer(Some(&customer))
        else {
            panic!("expected analyzed customer");
        };
        assert!(!cross_platform);
        assert_eq!(purchase_frequency, PurchaseFrequency::Frequent);
        assert_eq!(customer_value, ValueTier::Standard);

        customer.shopify_customer_id = Some("shop_9".to_string());
        let CustomerPattern::Analyzed { cross_platform, .. } = classify_customer(Some(&customer)) else {
            panic!("expected analyzed customer");
        };
        assert!(cross_platform);
    }

    #[test]
    fn missing_customer_has_no_data() {
        assert_eq!(classify_customer(None), CustomerPattern::NoData);
    }

    #[test]
    fn ten_invoices_is_still_occasional() {
        let customer = CustomerRecord {
            total_invoices: 10,
            ..CustomerRecord::default()
        };
        let CustomerPattern::Analyzed { purchase_frequency, .. } = classify_customer(Some(&customer)) else {
            panic!("expected analyzed customer");
        };
        assert_eq!(purchase_frequency, PurchaseFrequency::Occasional);
    }
}
