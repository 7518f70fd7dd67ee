// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `selves status` command implementation.
//!
//! Health-checks local storage and the chat proxy, and reports whether a
//! persona profile exists.

use std::io::IsTerminal;
use std::sync::Arc;

use colored::Colorize;
use selves_config::model::SelvesConfig;
use selves_core::{HealthStatus, PluginAdapter, SelvesError, StorageAdapter};
use selves_gateway::ProxyGateway;
use selves_storage::{SessionStore, SqliteStorage};
use serde::Serialize;

/// Health of one component, as printed by `selves status`.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    pub name: String,
    pub target: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentStatus {
    fn from_check(
        name: &str,
        target: &str,
        check: Result<HealthStatus, SelvesError>,
    ) -> Self {
        let (healthy, detail) = match check {
            Ok(HealthStatus::Healthy) => (true, None),
            Ok(HealthStatus::Degraded(detail)) => (false, Some(detail)),
            Ok(HealthStatus::Unhealthy(detail)) => (false, Some(detail)),
            Err(e) => (false, Some(e.to_string())),
        };
        Self {
            name: name.to_string(),
            target: target.to_string(),
            healthy,
            detail,
        }
    }
}

/// Full status report.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub storage: ComponentStatus,
    pub gateway: ComponentStatus,
    /// Names of the stored personas, past then future.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personas: Option<(String, String)>,
}

/// Run the `selves status` command.
///
/// `--json` prints the report as JSON; `--plain` (or a non-TTY stdout)
/// disables colors.
pub async fn run_status(config: &SelvesConfig, json: bool, plain: bool) -> Result<(), SelvesError> {
    let db_path = &config.storage.database_path;
    let (storage, personas) = match SqliteStorage::open(&config.storage).await {
        Ok(storage) => {
            let storage = Arc::new(storage);
            let check = storage.health_check().await;
            let sessions = SessionStore::new(storage.clone() as Arc<dyn StorageAdapter>);
            let personas = sessions
                .load_profile()
                .await
                .map(|p| (p.past_self.name, p.future_self.name));
            storage.close().await?;
            (ComponentStatus::from_check("storage", db_path, check), personas)
        }
        Err(e) => (
            ComponentStatus::from_check("storage", db_path, Err(e)),
            None,
        ),
    };

    let endpoint = &config.backend.endpoint;
    let gateway = match ProxyGateway::new(&config.backend) {
        Ok(gateway) => ComponentStatus::from_check("chat proxy", endpoint, gateway.health_check().await),
        Err(e) => ComponentStatus::from_check("chat proxy", endpoint, Err(e)),
    };

    let report = StatusReport {
        storage,
        gateway,
        personas,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&report, use_color);
    }
    Ok(())
}

fn print_report(report: &StatusReport, use_color: bool) {
    println!();
    println!("  selves status");
    println!("  {}", "-".repeat(35));
    print_component(&report.storage, use_color);
    print_component(&report.gateway, use_color);
    match &report.personas {
        Some((past, future)) => println!("    Personas: {past} (past), {future} (future)"),
        None => println!("    Personas: none yet, run `selves setup`"),
    }
    println!();
}

fn print_component(component: &ComponentStatus, use_color: bool) {
    let marker = match (component.healthy, use_color) {
        (true, true) => "✓".green().to_string(),
        (false, true) => "✗".red().to_string(),
        (true, false) => "[OK]".to_string(),
        (false, false) => "[FAIL]".to_string(),
    };
    println!("    {:<10} {marker} {}", format!("{}:", component.name), component.target);
    if let Some(detail) = &component.detail {
        println!("               {detail}");
    }
}
