//! Human-readable notices for filtered views.

use std::fmt;

use serde::Serialize;

use crate::filter::{DataType, FilterStats};
use crate::vocabulary::Role;

/// Banner shown above a list when some records were hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterNotice {
    pub title: String,
    pub summary: String,
    /// Role-specific reason; absent for admins.
    pub explanation: Option<String>,
    /// Advice to ask for wider access; only without full visibility.
    pub suggestion: Option<String>,
}

impl fmt::Display for FilterNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.summary)?;
        if let Some(explanation) = &self.explanation {
            write!(f, " {explanation}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n{suggestion}")?;
        }
        Ok(())
    }
}

/// Label for `count` records of `data_type`.
pub fn entity_label(data_type: DataType, count: usize) -> &'static str {
    let (one, many) = match data_type {
        DataType::WorkOrder => ("work order", "work orders"),
        DataType::Asset => ("asset", "assets"),
        DataType::Inventory => ("inventory item", "inventory items"),
        DataType::Plan => ("maintenance plan", "maintenance plans"),
        DataType::Procedure => ("procedure", "procedures"),
        DataType::Solicitation => ("solicitation", "solicitations"),
        DataType::Metrics => ("metric", "metrics"),
    };
    if count == 1 { one } else { many }
}

fn role_label(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Technician) => "technician",
        Some(Role::Requester) => "requester",
        _ => "user",
    }
}

/// Describe a filter result, or `None` when nothing was hidden.
pub fn describe(
    stats: &FilterStats,
    data_type: DataType,
    can_view_all: bool,
    role: Option<Role>,
) -> Option<FilterNotice> {
    if stats.filtered == 0 {
        return None;
    }

    let summary = format!(
        "Showing {} of {} {}.",
        stats.visible,
        stats.total,
        entity_label(data_type, stats.total)
    );

    let is_admin = role == Some(Role::Admin);
    let explanation = (!is_admin).then(|| {
        let verb = if stats.filtered == 1 { "is" } else { "are" };
        format!(
            "{} {} {verb} hidden by your {} permissions.",
            stats.filtered,
            entity_label(data_type, stats.filtered),
            role_label(role)
        )
    });
    let suggestion = (!is_admin && !can_view_all)
        .then(|| "Contact an administrator to see all data.".to_string());

    Some(FilterNotice {
        title: "Filtered view based on permissions".to_string(),
        summary,
        explanation,
        suggestion,
    })
}
