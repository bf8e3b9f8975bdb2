use crate::commands::settings::state_dir;
use crate::error::{Error, Result};
use crate::models::assessment::{AnalysisReport, Recommendation};
use crate::models::snapshot::{
    AccountSnapshot, CustomerRecord, DeveloperRecord, Engagement, RevenuePoint, WebsitePoint,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Duration;

const DB_SCHEMA_VERSION: i64 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        log::warn!("state.db schema version {version} is newer than {DB_SCHEMA_VERSION}");
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            account_id TEXT PRIMARY KEY,
            active INTEGER NOT NULL DEFAULT 1,
            updated_at INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS unified_customers (
            account_id TEXT PRIMARY KEY REFERENCES accounts(account_id) ON DELETE CASCADE,
            lifetime_value REAL NOT NULL DEFAULT 0,
            engagement_level TEXT,
            total_invoices INTEGER NOT NULL DEFAULT 0,
            stripe_customer_id TEXT,
            shopify_customer_id TEXT
        );

        CREATE TABLE IF NOT EXISTS developer_activity (
            account_id TEXT PRIMARY KEY REFERENCES accounts(account_id) ON DELETE CASCADE,
            productivity_score REAL NOT NULL DEFAULT 0,
            avg_pr_merge_time REAL NOT NULL DEFAULT 0,
            most_active_day INTEGER NOT NULL DEFAULT 0,
            most_active_hour INTEGER NOT NULL DEFAULT 0,
            total_prs INTEGER NOT NULL DEFAULT 0,
            total_repos INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS revenue_analytics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT NOT NULL REFERENCES accounts(account_id) ON DELETE CASCADE,
            month TEXT NOT NULL,
            revenue REAL NOT NULL DEFAULT 0,
            growth_rate REAL
        );

        CREATE TABLE IF NOT EXISTS website_analytics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT NOT NULL REFERENCES accounts(account_id) ON DELETE CASCADE,
            daily_users REAL NOT NULL DEFAULT 0,
            new_users REAL NOT NULL DEFAULT 0,
            users REAL NOT NULL DEFAULT 0,
            bounce_rate REAL NOT NULL DEFAULT 0,
            sessions_per_user REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS ai_workflow_analysis (
            id TEXT PRIMARY KEY,
            account_id TEXT NOT NULL,
            health_score INTEGER NOT NULL,
            churn_risk TEXT NOT NULL,
            growth_potential INTEGER NOT NULL,
            report_json TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS account_alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT NOT NULL,
            recommendation_json TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        ",
    )?;
    Ok(())
}

fn apply_migration_2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_revenue_account_month ON revenue_analytics(account_id, month);
        CREATE INDEX IF NOT EXISTS idx_website_account ON website_analytics(account_id, id);
        CREATE INDEX IF NOT EXISTS idx_analysis_account_created ON ai_workflow_analysis(account_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_analysis_expires ON ai_workflow_analysis(expires_at);
        CREATE INDEX IF NOT EXISTS idx_alerts_account ON account_alerts(account_id);
        ",
    )?;
    Ok(())
}

pub fn get_db_connection(workspace_path: &str) -> Result<Connection> {
    let dir = state_dir(workspace_path);
    std::fs::create_dir_all(&dir)?;
    let conn = Connection::open(dir.join("state.db"))?;
    conn.busy_timeout(Duration::from_secs(5))?;
    initialize_schema(&conn)?;
    Ok(conn)
}

/// Replace every stored record of `account_id` with the contents of `snapshot`.
pub fn import_snapshot(conn: &Connection, account_id: &str, snapshot: &AccountSnapshot, active: bool) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let now = chrono::Utc::now().timestamp();

    tx.execute(
        "INSERT INTO accounts (account_id, active, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(account_id) DO UPDATE SET active = excluded.active, updated_at = excluded.updated_at",
        params![account_id, active, now],
    )?;

    for table in ["unified_customers", "developer_activity", "revenue_analytics", "website_analytics"] {
        tx.execute(&format!("DELETE FROM {table} WHERE account_id = ?1"), params![account_id])?;
    }

    if let Some(customer) = &snapshot.customer {
        tx.execute(
            "INSERT INTO unified_customers (account_id, lifetime_value, engagement_level, total_invoices, stripe_customer_id, shopify_customer_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account_id,
                customer.lifetime_value,
                customer.engagement_level.as_str(),
                customer.total_invoices as i64,
                customer.stripe_customer_id.as_deref(),
                customer.shopify_customer_id.as_deref(),
            ],
        )?;
    }

    if let Some(dev) = &snapshot.developer {
        tx.execute(
            "INSERT INTO developer_activity (account_id, productivity_score, avg_pr_merge_time, most_active_day, most_active_hour, total_prs, total_repos) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                account_id,
                dev.productivity_score,
                dev.avg_pr_merge_time,
                dev.most_active_day,
                dev.most_active_hour,
                dev.total_prs as i64,
                dev.total_repos as i64,
            ],
        )?;
    }

    for point in &snapshot.revenue_series {
        tx.execute(
            "INSERT INTO revenue_analytics (account_id, month, revenue, growth_rate) VALUES (?1, ?2, ?3, ?4)",
            params![account_id, point.month, point.revenue, point.growth_rate],
        )?;
    }

    for point in &snapshot.website_series {
        tx.execute(
            "INSERT INTO website_analytics (account_id, daily_users, new_users, users, bounce_rate, sessions_per_user) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account_id,
                point.daily_users,
                point.new_users,
                point.users,
                point.bounce_rate,
                point.sessions_per_user,
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}

pub fn list_accounts(conn: &Connection, only_active: bool) -> Result<Vec<String>> {
    let sql = if only_active {
        "SELECT account_id FROM accounts WHERE active = 1 ORDER BY account_id ASC"
    } else {
        "SELECT account_id FROM accounts ORDER BY account_id ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

/// Load the four record groups of one account. Revenue comes back
/// chronological, website rows are the latest `website_window` entries,
/// oldest first.
pub fn fetch_snapshot(conn: &Connection, account_id: &str, website_window: usize) -> Result<AccountSnapshot> {
    let known: Option<String> = conn
        .query_row(
            "SELECT account_id FROM accounts WHERE account_id = ?1",
            params![account_id],
            |row| row.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(Error::AccountNotFound(account_id.to_string()));
    }

    let customer = conn
        .query_row(
            "SELECT lifetime_value, engagement_level, total_invoices, stripe_customer_id, shopify_customer_id FROM unified_customers WHERE account_id = ?1",
            params![account_id],
            |row| {
                let engagement: Option<String> = row.get(1)?;
                let stripe: Option<String> = row.get(3)?;
                let shopify: Option<String> = row.get(4)?;
                Ok(CustomerRecord {
                    lifetime_value: row.get(0)?,
                    engagement_level: engagement.as_deref().map(Engagement::parse).unwrap_or_default(),
                    total_invoices: row.get::<_, i64>(2)?.max(0) as u64,
                    stripe_customer_id: stripe.filter(|id| !id.trim().is_empty()),
                    shopify_customer_id: shopify.filter(|id| !id.trim().is_empty()),
                })
            },
        )
        .optional()?;

    let developer = conn
        .query_row(
            "SELECT productivity_score, avg_pr_merge_time, most_active_day, most_active_hour, total_prs, total_repos FROM developer_activity WHERE account_id = ?1",
            params![account_id],
            |row| {
                Ok(DeveloperRecord {
                    productivity_score: row.get(0)?,
                    avg_pr_merge_time: row.get(1)?,
                    most_active_day: row.get(2)?,
                    most_active_hour: row.get::<_, i64>(3)?.clamp(0, 23) as u32,
                    total_prs: row.get::<_, i64>(4)?.max(0) as u64,
                    total_repos: row.get::<_, i64>(5)?.max(0) as u64,
                })
            },
        )
        .optional()?;

    let mut stmt = conn.prepare(
        "SELECT month, revenue, growth_rate FROM revenue_analytics WHERE account_id = ?1 ORDER BY month ASC, id ASC",
    )?;
    let revenue_series = stmt
        .query_map(params![account_id], |row| {
            Ok(RevenuePoint {
                month: row.get(0)?,
                revenue: row.get(1)?,
                growth_rate: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        "SELECT daily_users, new_users, users, bounce_rate, sessions_per_user FROM website_analytics WHERE account_id = ?1 ORDER BY id DESC LIMIT ?2",
    )?;
    let mut website_series = stmt
        .query_map(params![account_id, website_window as i64], |row| {
            Ok(WebsitePoint {
                daily_users: row.get(0)?,
                new_users: row.get(1)?,
                users: row.get(2)?,
                bounce_rate: row.get(3)?,
                sessions_per_user: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    website_series.reverse();

    Ok(AccountSnapshot {
        customer,
        developer,
        revenue_series,
        website_series,
    }
    .normalized())
}

/// Persist a report together with its alerts and return the report id.
/// Either both land or neither does.
pub fn store_analysis(
    conn: &Connection,
    report: &AnalysisReport,
    alerts: &[Recommendation],
) -> Result<String> {
    let tx = conn.unchecked_transaction()?;
    let id = insert_analysis(&tx, report)?;
    insert_alerts(&tx, &report.account_id, alerts, report.generated_at)?;
    tx.commit()?;
    Ok(id)
}

fn insert_analysis(conn: &Connection, report: &AnalysisReport) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let report_json = serde_json::to_string(report)?;
    let churn_risk = serde_json::to_value(report.assessment.churn_risk)?
        .as_str()
        .unwrap_or_default()
        .to_string();

    conn.execute(
        "INSERT INTO ai_workflow_analysis (id, account_id, health_score, churn_risk, growth_potential, report_json, created_at, expires_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            report.account_id,
            report.assessment.health_score,
            churn_risk,
            report.assessment.growth_potential,
            report_json,
            report.generated_at,
            report.expires_at,
        ],
    )?;

    Ok(id)
}

fn insert_alerts(
    conn: &Connection,
    account_id: &str,
    recommendations: &[Recommendation],
    created_at: i64,
) -> Result<()> {
    for recommendation in recommendations {
        conn.execute(
            "INSERT INTO account_alerts (account_id, recommendation_json, created_at) VALUES (?1, ?2, ?3)",
            params![account_id, serde_json::to_string(recommendation)?, created_at],
        )?;
    }
    Ok(())
}

pub fn load_alerts(conn: &Connection, account_id: &str) -> Result<Vec<Recommendation>> {
    let mut stmt = conn.prepare(
        "SELECT recommendation_json FROM account_alerts WHERE account_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![account_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.iter()
        .map(|raw| serde_json::from_str(raw).map_err(Error::from))
        .collect()
}

/// Newest report for the account that has not expired at `now`.
pub fn load_latest_analysis(conn: &Connection, account_id: &str, now: i64) -> Result<Option<AnalysisReport>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT report_json FROM ai_workflow_analysis WHERE account_id = ?1 AND expires_at > ?2 ORDER BY created_at DESC, rowid DESC LIMIT 1",
            params![account_id, now],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|json| serde_json::from_str(&json).map_err(Error::from))
        .transpose()
}

pub fn purge_expired_analyses(conn: &Connection, now: i64) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM ai_workflow_analysis WHERE expires_at <= ?1",
        params![now],
    )?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::{Priority, RecommendationType};

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        initialize_schema(&conn).expect("init schema");
        conn
    }

    #[test]
    fn schema_initialization_is_idempotent() {
        let conn = memory_db();
        initialize_schema(&conn).expect("re-init schema");

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("read version");
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn unknown_account_is_reported() {
        let conn = memory_db();
        let err = fetch_snapshot(&conn, "ghost", 30).expect_err("missing account");
        assert!(matches!(err, Error::AccountNotFound(id) if id == "ghost"));
    }

    #[test]
    fn website_rows_come_back_latest_window_oldest_first() {
        let conn = memory_db();
        let snapshot = AccountSnapshot {
            website_series: (1..=5)
                .map(|i| WebsitePoint {
                    daily_users: i as f64,
                    ..WebsitePoint::default()
                })
                .collect(),
            ..AccountSnapshot::default()
        };
        import_snapshot(&conn, "acct", &snapshot, true).expect("import");

        let fetched = fetch_snapshot(&conn, "acct", 3).expect("fetch");
        let users: Vec<f64> = fetched.website_series.iter().map(|p| p.daily_users).collect();
        assert_eq!(users, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn revenue_is_returned_in_month_order() {
        let conn = memory_db();
        let snapshot = AccountSnapshot {
            revenue_series: vec![
                RevenuePoint { month: "2024-03".to_string(), revenue: 300.0, growth_rate: Some(50.0) },
                RevenuePoint { month: "2024-01".to_string(), revenue: 100.0, growth_rate: None },
                RevenuePoint { month: "2024-02".to_string(), revenue: 200.0, growth_rate: Some(100.0) },
            ],
            ..AccountSnapshot::default()
        };
        import_snapshot(&conn, "acct", &snapshot, true).expect("import");

        let fetched = fetch_snapshot(&conn, "acct", 30).expect("fetch");
        let months: Vec<&str> = fetched.revenue_series.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(fetched.revenue_series[0].growth_rate, None);
    }

    #[test]
    fn list_accounts_filters_inactive() {
        let conn = memory_db();
        import_snapshot(&conn, "b", &AccountSnapshot::default(), true).expect("import b");
        import_snapshot(&conn, "a", &AccountSnapshot::default(), false).expect("import a");

        assert_eq!(list_accounts(&conn, true).expect("active"), vec!["b".to_string()]);
        assert_eq!(
            list_accounts(&conn, false).expect("all"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn stored_reports_expire() {
        let conn = memory_db();
        let report = crate::commands::scoring::analyze_account("acct", &AccountSnapshot::default(), 1_000, 7);
        store_analysis(&conn, &report, &[]).expect("store");

        let loaded = load_latest_analysis(&conn, "acct", 2_000).expect("load");
        assert_eq!(loaded, Some(report.clone()));

        assert_eq!(load_latest_analysis(&conn, "acct", report.expires_at).expect("load"), None);
        assert_eq!(purge_expired_analyses(&conn, report.expires_at).expect("purge"), 1);
    }

    #[test]
    fn failed_alert_write_rolls_back_the_report() {
        let conn = memory_db();
        let report = crate::commands::scoring::analyze_account("acct", &AccountSnapshot::default(), 1_000, 7);
        let alert = Recommendation {
            kind: RecommendationType::Revenue,
            priority: Priority::High,
            action: "Schedule a call".to_string(),
            reason: "Low health".to_string(),
            impact: "Retention".to_string(),
        };

        conn.execute_batch("DROP TABLE account_alerts;").expect("drop alerts table");
        assert!(store_analysis(&conn, &report, std::slice::from_ref(&alert)).is_err());
        assert_eq!(load_latest_analysis(&conn, "acct", 2_000).expect("load"), None);
    }

    #[test]
    fn report_and_alerts_are_stored_together() {
        let conn = memory_db();
        let report = crate::commands::scoring::analyze_account("acct", &AccountSnapshot::default(), 1_000, 7);
        let alerts = report.high_priority();

        store_analysis(&conn, &report, &alerts).expect("store");

        assert_eq!(load_latest_analysis(&conn, "acct", 2_000).expect("load"), Some(report));
        assert_eq!(load_alerts(&conn, "acct").expect("alerts"), alerts);
    }
}
