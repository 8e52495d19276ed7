//! Dashboard widgets, KPIs and chart series filtered per role.
//!
//! [`filter_dashboard`] drops every section whose widget the role lacks and
//! scopes the rest. [`dashboard_config`] describes the dashboard a role gets.

use serde::{Deserialize, Serialize};

use crate::ability::Ability;
use crate::filter::Viewer;
use crate::record::Record;
use crate::vocabulary::{Role, Subject};

/// Requesters only see KPIs whose key mentions one of these.
const REQUESTER_KPIS: &[&str] = &[
    "openRequests",
    "myRequests",
    "pendingApprovals",
    "assetStatus",
    "maintenanceScheduled",
];

const REQUESTER_CATEGORIES: &[&str] = &["requests", "assets", "status"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub key: String,
    pub value: serde_json::Value,
    pub label: String,
    #[serde(default)]
    pub sensitive: bool,
    /// Explicit allow-list; absent means "decided by role".
    #[serde(default)]
    pub allowed_roles: Option<Vec<Role>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sector_id: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMetrics {
    pub total_cost: f64,
    pub cost_per_work_order: f64,
    pub budget_utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceMetrics {
    pub mttr: Option<f64>,
    pub mtbf: Option<f64>,
    pub uptime: Option<f64>,
    #[serde(default)]
    pub cost_metrics: Option<CostMetrics>,
}

/// KPIs the viewer may see.
pub fn filter_kpis(viewer: &Viewer, kpis: &[Kpi]) -> Vec<Kpi> {
    kpis.iter().filter(|kpi| kpi_visible(viewer.role, kpi)).cloned().collect()
}

fn kpi_visible(role: Option<Role>, kpi: &Kpi) -> bool {
    let Some(role) = role else {
        return false;
    };
    if role == Role::Admin {
        return true;
    }
    if kpi.sensitive {
        return false;
    }
    if let Some(allowed) = &kpi.allowed_roles
        && !allowed.contains(&role)
    {
        return false;
    }
    match role {
        // Operational metrics only, nothing financial.
        Role::Technician => {
            let key = kpi.key.to_lowercase();
            !key.contains("cost") && !key.contains("budget")
        }
        _ => REQUESTER_KPIS.iter().any(|allowed| kpi.key.contains(*allowed)),
    }
}

/// Chart points the viewer may see.
pub fn filter_chart(viewer: &Viewer, points: &[ChartPoint]) -> Vec<ChartPoint> {
    points
        .iter()
        .filter(|point| point_visible(viewer, point))
        .cloned()
        .collect()
}

fn point_visible(viewer: &Viewer, point: &ChartPoint) -> bool {
    let Some(role) = viewer.role else {
        return false;
    };
    if role == Role::Admin {
        return true;
    }
    if point.sensitive {
        return false;
    }
    let foreign_sector = point
        .sector_id
        .as_ref()
        .is_some_and(|s| !viewer.sector_ids.contains(s));
    if foreign_sector {
        return false;
    }
    match role {
        Role::Technician => match (&point.department_id, &viewer.department_id) {
            (Some(theirs), Some(mine)) => theirs == mine,
            (Some(_), None) => false,
            _ => true,
        },
        _ => point.category.as_deref().is_some_and(|category| {
            let category = category.to_lowercase();
            REQUESTER_CATEGORIES.iter().any(|c| category.contains(*c))
        }),
    }
}

/// A full dashboard payload. Sections left out stay out after filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpis: Option<Vec<Kpi>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_orders_over_time: Option<Vec<ChartPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_status: Option<Vec<ChartPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_performance: Option<Vec<ChartPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_metrics: Option<MaintenanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upcoming_maintenance: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_activity: Option<Vec<Record>>,
}

/// Role-specific dashboard settings for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub title: &'static str,
    pub description: &'static str,
    pub available_widgets: Vec<&'static str>,
    /// Milliseconds between refreshes.
    #[serde(rename = "refreshInterval")]
    pub refresh_interval_ms: u64,
    pub show_advanced_filters: bool,
    pub show_export_options: bool,
    pub default_date_range: &'static str,
}

/// Maintenance metrics with cost data removed for non-admins.
pub fn filter_maintenance_metrics(
    viewer: &Viewer,
    metrics: &MaintenanceMetrics,
) -> MaintenanceMetrics {
    match viewer.role {
        Some(Role::Admin) => metrics.clone(),
        Some(Role::Technician) => MaintenanceMetrics {
            cost_metrics: None,
            ..metrics.clone()
        },
        Some(Role::Requester) => MaintenanceMetrics {
            mttr: None,
            mtbf: None,
            uptime: metrics.uptime,
            cost_metrics: None,
        },
        None => MaintenanceMetrics {
            mttr: None,
            mtbf: None,
            uptime: None,
            cost_metrics: None,
        },
    }
}

/// Dashboard widgets available to `role`.
pub fn available_widgets(role: Option<Role>) -> Vec<&'static str> {
    let mut widgets = vec!["kpis"];
    let extra: &[&str] = match role {
        Some(Role::Admin) => &[
            "workOrdersChart",
            "assetStatusChart",
            "technicianPerformanceChart",
            "maintenanceMetrics",
            "upcomingMaintenance",
            "recentActivity",
            "costAnalysis",
            "trendAnalysis",
        ],
        Some(Role::Technician) => &[
            "workOrdersChart",
            "assetStatusChart",
            "technicianPerformanceChart",
            "upcomingMaintenance",
            "recentActivity",
        ],
        Some(Role::Requester) => &["myRequests", "requestStatus", "assetStatusChart"],
        None => &[],
    };
    widgets.extend_from_slice(extra);
    widgets
}

/// The sections of `data` the viewer may see, each scoped to the viewer.
pub fn filter_dashboard(viewer: &Viewer, data: &DashboardData) -> DashboardData {
    let widgets = available_widgets(viewer.role);
    let shown = |widget: &str| widgets.iter().any(|w| *w == widget);
    let chart = |widget: &str, points: &Option<Vec<ChartPoint>>| {
        points
            .as_deref()
            .filter(|_| shown(widget))
            .map(|points| filter_chart(viewer, points))
    };
    let items = |widget: &str, records: &Option<Vec<Record>>, keep: fn(&Viewer, &Record) -> bool| {
        records.as_deref().filter(|_| shown(widget)).map(|records| {
            records
                .iter()
                .filter(|item| keep(viewer, item))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    DashboardData {
        kpis: data
            .kpis
            .as_deref()
            .filter(|_| shown("kpis"))
            .map(|kpis| filter_kpis(viewer, kpis)),
        work_orders_over_time: chart("workOrdersChart", &data.work_orders_over_time),
        asset_status: chart("assetStatusChart", &data.asset_status),
        technician_performance: chart("technicianPerformanceChart", &data.technician_performance),
        maintenance_metrics: data
            .maintenance_metrics
            .as_ref()
            .filter(|_| shown("maintenanceMetrics"))
            .map(|metrics| filter_maintenance_metrics(viewer, metrics)),
        upcoming_maintenance: items(
            "upcomingMaintenance",
            &data.upcoming_maintenance,
            upcoming_visible,
        ),
        recent_activity: items("recentActivity", &data.recent_activity, activity_visible),
    }
}

fn upcoming_visible(viewer: &Viewer, item: &Record) -> bool {
    match viewer.role {
        Some(Role::Admin) => true,
        Some(Role::Technician) => viewer.assigned(item) || viewer.in_sector(item),
        Some(Role::Requester) => viewer.created(item),
        None => false,
    }
}

fn activity_visible(viewer: &Viewer, item: &Record) -> bool {
    match viewer.role {
        Some(Role::Admin) => true,
        Some(Role::Technician) => {
            viewer.assigned(item) || viewer.created(item) || viewer.in_sector(item)
        }
        Some(Role::Requester) => viewer.created(item),
        None => false,
    }
}

pub fn dashboard_description(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "Complete view of the maintenance system with all data and metrics",
        Some(Role::Technician) => {
            "Technical dashboard focused on work orders and operational maintenance"
        }
        Some(Role::Requester) => "Your maintenance requests and their status",
        None => "Maintenance management dashboard",
    }
}

/// Dashboard settings for the caller behind `ability`.
///
/// Export is offered to admins and to technicians who manage reports.
pub fn dashboard_config(ability: &Ability<'_>) -> DashboardConfig {
    let role = ability.role();
    let (title, refresh_interval_ms) = match role {
        Some(Role::Admin) => ("Administrative dashboard", 30_000),
        Some(Role::Technician) => ("Technical dashboard", 60_000),
        _ => ("Requests dashboard", 120_000),
    };
    DashboardConfig {
        title,
        description: dashboard_description(role),
        available_widgets: available_widgets(role),
        refresh_interval_ms,
        show_advanced_filters: matches!(role, Some(Role::Admin | Role::Technician)),
        show_export_options: ability.is_admin()
            || (role == Some(Role::Technician) && ability.can_manage(Subject::Report)),
        default_date_range: if role == Some(Role::Requester) { "7d" } else { "30d" },
    }
}
