use crate::commands::db;
use crate::commands::scoring::analyze_account;
use crate::commands::settings::{load_effective_analysis_settings, EffectiveAnalysisSettings};
use crate::error::Result;
use crate::models::assessment::AnalysisReport;
use crate::models::batch::{AccountOutcome, AccountResult, BatchProgress, BatchReport};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Analyze every account listed in the workspace database.
pub async fn run_daily_analysis(workspace_path: String) -> Result<BatchReport> {
    run_daily_analysis_internal(&workspace_path, |progress| {
        log::debug!(
            "Analyzed {}/{} ({})",
            progress.current,
            progress.total,
            progress.account_id
        );
    })
    .await
}

pub async fn run_daily_analysis_internal<F>(workspace_path: &str, emit_progress: F) -> Result<BatchReport>
where
    F: FnMut(BatchProgress),
{
    let settings = load_effective_analysis_settings(workspace_path)?;

    let account_ids = {
        let conn = db::get_db_connection(workspace_path)?;
        let purged = db::purge_expired_analyses(&conn, chrono::Utc::now().timestamp())?;
        if purged > 0 {
            log::info!("Purged {purged} expired analyses");
        }
        db::list_accounts(&conn, settings.only_active_accounts)?
    };

    run_batch_analysis(workspace_path, account_ids, &settings, emit_progress).await
}

/// Analyze the given accounts on the blocking pool, at most
/// `settings.max_concurrency` at a time. A failure in one account is
/// recorded in its outcome and never aborts the batch. Outcomes keep the
/// order of `account_ids`.
pub async fn run_batch_analysis<F>(
    workspace_path: &str,
    account_ids: Vec<String>,
    settings: &EffectiveAnalysisSettings,
    mut emit_progress: F,
) -> Result<BatchReport>
where
    F: FnMut(BatchProgress),
{
    let started_at = chrono::Utc::now().timestamp();
    let total = account_ids.len();
    log::info!("Starting analysis of {total} accounts");

    let permits = Arc::new(Semaphore::new(settings.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, account_id) in account_ids.iter().cloned().enumerate() {
        let permits = Arc::clone(&permits);
        let workspace = workspace_path.to_string();
        let settings = settings.clone();

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let id = account_id.clone();
            let joined =
                tokio::task::spawn_blocking(move || analyze_and_persist(&workspace, &id, &settings)).await;
            (index, account_id, joined)
        });
    }

    let mut slots: Vec<Option<AccountOutcome>> = vec![None; total];
    let mut completed = 0;

    while let Some(joined) = tasks.join_next().await {
        let (index, account_id, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                log::error!("Batch task aborted: {e}");
                continue;
            }
        };

        completed += 1;
        emit_progress(BatchProgress {
            current: completed,
            total,
            account_id: account_id.clone(),
        });

        slots[index] = Some(AccountOutcome {
            result: to_account_result(&account_id, result),
            account_id,
        });
    }

    let outcomes = slots
        .into_iter()
        .zip(account_ids)
        .map(|(slot, account_id)| {
            slot.unwrap_or_else(|| AccountOutcome {
                account_id,
                result: AccountResult::Failed {
                    reason: "analysis task aborted".to_string(),
                },
            })
        })
        .collect();

    let report = BatchReport {
        started_at,
        finished_at: chrono::Utc::now().timestamp(),
        outcomes,
    };

    log::info!(
        "Daily analysis complete: {} scored, {} failed",
        report.scored_count(),
        report.failed_count()
    );

    Ok(report)
}

fn to_account_result(
    account_id: &str,
    result: std::result::Result<Result<(AnalysisReport, usize)>, JoinError>,
) -> AccountResult {
    match result {
        Ok(Ok((report, alerts_sent))) => {
            log::info!(
                "Analysis complete for account {account_id}: health {} churn {:?}",
                report.assessment.health_score,
                report.assessment.churn_risk
            );
            AccountResult::Scored {
                report: Box::new(report),
                alerts_sent,
            }
        }
        Ok(Err(e)) => {
            log::error!("Error analyzing account {account_id}: {e}");
            AccountResult::Failed { reason: e.to_string() }
        }
        Err(e) => {
            let reason = if e.is_panic() {
                "analysis panicked".to_string()
            } else {
                format!("analysis task failed: {e}")
            };
            log::error!("Error analyzing account {account_id}: {reason}");
            AccountResult::Failed { reason }
        }
    }
}

fn analyze_and_persist(
    workspace_path: &str,
    account_id: &str,
    settings: &EffectiveAnalysisSettings,
) -> Result<(AnalysisReport, usize)> {
    let conn = db::get_db_connection(workspace_path)?;
    let snapshot = db::fetch_snapshot(&conn, account_id, settings.website_window)?;

    let report = analyze_account(
        account_id,
        &snapshot,
        chrono::Utc::now().timestamp(),
        settings.retention_days,
    );
    let alerts = if settings.alerts_enabled {
        report.high_priority()
    } else {
        Vec::new()
    };
    if !alerts.is_empty() {
        log::warn!(
            "Account {account_id} has {} high-priority recommendations",
            alerts.len()
        );
    }
    db::store_analysis(&conn, &report, &alerts)?;
    let alerts_sent = alerts.len();

    Ok((report, alerts_sent))
}
