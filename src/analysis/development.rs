use crate::analysis::thresholds::{
    ACTIVE_PRODUCTIVITY, COLLABORATIVE_PR_COUNT, EFFICIENT_PR_MERGE_TIME, MODERATE_PRODUCTIVITY,
    VERY_ACTIVE_PRODUCTIVITY,
};
use crate::models::patterns::{ActivityLevel, CollaborationStyle, DevelopmentPattern, PrEfficiency};
use crate::models::snapshot::DeveloperRecord;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn classify_development(developer: Option<&DeveloperRecord>) -> DevelopmentPattern {
    let Some(dev) = developer else {
        return DevelopmentPattern::NoData;
    };

    DevelopmentPattern::Analyzed {
        activity_level: categorize_activity(dev.productivity_score),
        productivity_score: dev.productivity_score,
        pr_efficiency: if dev.avg_pr_merge_time < EFFICIENT_PR_MERGE_TIME {
            PrEfficiency::Efficient
        } else {
            PrEfficiency::NeedsImprovement
        },
        most_active_day: day_name(dev.most_active_day).to_string(),
        most_active_hour: dev.most_active_hour,
        collaboration_style: if dev.total_prs > COLLABORATIVE_PR_COUNT {
            CollaborationStyle::Active
        } else {
            CollaborationStyle::Passive
        },
    }
}

pub fn categorize_activity(productivity_score: f64) -> ActivityLevel {
    if productivity_score > VERY_ACTIVE_PRODUCTIVITY {
        ActivityLevel::VeryActive
    } else if productivity_score > ACTIVE_PRODUCTIVITY {
        ActivityLevel::Active
    } else if productivity_score > MODERATE_PRODUCTIVITY {
        ActivityLevel::Moderate
    } else {
        ActivityLevel::Low
    }
}

/// 0 = Sunday; anything outside 0–6 is `Unknown`.
pub fn day_name(day: i64) -> &'static str {
    usize::try_from(day)
        .ok()
        .and_then(|i| DAY_NAMES.get(i))
        .copied()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_thresholds_are_exclusive() {
        assert_eq!(categorize_activity(120.0), ActivityLevel::VeryActive);
        assert_eq!(categorize_activity(100.0), ActivityLevel::Active);
        assert_eq!(categorize_activity(60.0), ActivityLevel::Active);
        assert_eq!(categorize_activity(50.0), ActivityLevel::Moderate);
        assert_eq!(categorize_activity(20.0), ActivityLevel::Low);
        assert_eq!(categorize_activity(0.0), ActivityLevel::Low);
    }

    #[test]
    fn day_names_cover_the_week_and_reject_out_of_range() {
        assert_eq!(day_name(0), "Sunday");
        assert_eq!(day_name(6), "Saturday");
        assert_eq!(day_name(9), "Unknown");
        assert_eq!(day_name(-1), "Unknown");
    }

    #[test]
    fn missing_developer_has_no_data() {
        assert_eq!(classify_development(None), DevelopmentPattern::NoData);
    }

    #[test]
    fn classifies_full_developer_record() {
        let dev = DeveloperRecord {
            productivity_score: 75.0,
            avg_pr_merge_time: 3.5,
            most_active_day: 2,
            most_active_hour: 14,
            total_prs: 11,
            total_repos: 4,
        };

        assert_eq!(
            classify_development(Some(&dev)),
            DevelopmentPattern::Analyzed {
                activity_level: ActivityLevel::Active,
                productivity_score: 75.0,
                pr_efficiency: PrEfficiency::NeedsImprovement,
                most_active_day: "Tuesday".to_string(),
                most_active_hour: 14,
                collaboration_style: CollaborationStyle::Active,
            }
        );
    }

    #[test]
    fn defaulted_record_is_efficient_and_passive() {
        let DevelopmentPattern::Analyzed { pr_efficiency, collaboration_style, most_active_day, .. } =
            classify_development(Some(&DeveloperRecord::default()))
        else {
            panic!("expected analyzed development");
        };

        assert_eq!(pr_efficiency, PrEfficiency::Efficient);
        assert_eq!(collaboration_style, CollaborationStyle::Passive);
        assert_eq!(most_active_day, "Sunday");
    }

    #[test]
    fn merge_time_and_pr_count_edges_are_exclusive() {
        let dev = DeveloperRecord {
            avg_pr_merge_time: 2.0,
            total_prs: 10,
            ..DeveloperRecord::default()
        };
        let DevelopmentPattern::Analyzed { pr_efficiency, collaboration_style, .. } =
            classify_development(Some(&dev))
        else {
            panic!("expected analyzed development");
        };

        assert_eq!(pr_efficiency, PrEfficiency::NeedsImprovement);
        assert_eq!(collaboration_style, CollaborationStyle::Passive);
    }
}
