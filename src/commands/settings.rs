use crate::error::{Error, Result};
use crate::models::snapshot::WEBSITE_WINDOW;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;
pub const STATE_DIR: &str = ".signalscore";
const MIN_WEBSITE_WINDOW: u64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveAnalysisSettings {
    pub retention_days: u32,
    pub website_window: usize,
    pub max_concurrency: usize,
    pub alerts_enabled: bool,
    pub only_active_accounts: bool,
}

impl Default for EffectiveAnalysisSettings {
    fn default() -> Self {
        Self::from_value(&default_settings())
    }
}

impl EffectiveAnalysisSettings {
    fn from_value(settings: &Value) -> Self {
        Self {
            retention_days: settings
                .get("analysisRetentionDays")
                .and_then(Value::as_u64)
                .unwrap_or(7)
                .clamp(1, 90) as u32,
            website_window: settings
                .get("websiteWindow")
                .and_then(Value::as_u64)
                .unwrap_or(WEBSITE_WINDOW as u64)
                .clamp(MIN_WEBSITE_WINDOW, WEBSITE_WINDOW as u64) as usize,
            max_concurrency: settings
                .get("maxConcurrency")
                .and_then(Value::as_u64)
                .unwrap_or(4)
                .clamp(1, 64) as usize,
            alerts_enabled: settings
                .get("alertsEnabled")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            only_active_accounts: settings
                .get("onlyActiveAccounts")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        }
    }
}

pub fn load_effective_analysis_settings(workspace_path: &str) -> Result<EffectiveAnalysisSettings> {
    let settings = load_settings_from_disk(workspace_path)?;
    Ok(EffectiveAnalysisSettings::from_value(&settings))
}

pub fn load_settings_from_disk(workspace_path: &str) -> Result<Value> {
    let path = settings_path(workspace_path);
    ensure_state_dir(workspace_path)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed {}: {e}", path.display());
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(workspace_path: &str, settings: Value) -> Result<Value> {
    if !settings.is_object() {
        return Err(Error::Settings("settings update must be a JSON object".to_string()));
    }

    let path = settings_path(workspace_path);
    ensure_state_dir(workspace_path)?;

    let mut merged = load_settings_from_disk(workspace_path).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

pub fn state_dir(workspace_path: &str) -> PathBuf {
    Path::new(workspace_path).join(STATE_DIR)
}

fn settings_path(workspace_path: &str) -> PathBuf {
    state_dir(workspace_path).join("settings.json")
}

fn ensure_state_dir(workspace_path: &str) -> Result<()> {
    fs::create_dir_all(state_dir(workspace_path))?;
    Ok(())
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<()> {
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(path, raw)?;
    Ok(())
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    fill_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);

    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "analysisRetentionDays": 7,
        "websiteWindow": WEBSITE_WINDOW,
        "maxConcurrency": 4,
        "alertsEnabled": true,
        "onlyActiveAccounts": true
    })
}

fn fill_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        target_obj
            .entry(key.clone())
            .or_insert_with(|| default_value.clone());
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    let (Some(target_obj), Some(incoming_obj)) = (target.as_object_mut(), incoming.as_object()) else {
        return;
    };

    for (key, value) in incoming_obj {
        target_obj.insert(key.clone(), value.clone());
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "analysisRetentionDays", 1, 90, 7);
    clamp_u64(obj, "websiteWindow", MIN_WEBSITE_WINDOW, WEBSITE_WINDOW as u64, WEBSITE_WINDOW as u64);
    clamp_u64(obj, "maxConcurrency", 1, 64, 4);

    ensure_bool(obj, "alertsEnabled", true);
    ensure_bool(obj, "onlyActiveAccounts", true);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
