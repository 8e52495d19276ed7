//! Role-based filtering of record collections.
//!
//! [`DataFilter::filter`] takes a homogeneous collection of records together
//! with its [`DataType`], keeps what the caller is entitled to see, redacts
//! each survivor, and reports how much was hidden.
//!
//! Each data type has exactly one visibility predicate, selected by an
//! exhaustive match. A new data type cannot compile without one, and an
//! unrecognized type tag is rejected when it is parsed.
//!
//! Filtering is a pure function of `(data, data_type, viewer, options)`. Input
//! records are never modified; every output record is a fresh value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ability::Ability;
use crate::error::Error;
use crate::mask::allowed_fields;
use crate::record::{Priority, Record};
use crate::table::PermissionTable;
use crate::vocabulary::{AccountRole, Role, Subject};

/// Logical type of a record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    WorkOrder,
    Asset,
    Inventory,
    Plan,
    Procedure,
    Solicitation,
    Metrics,
}

impl DataType {
    pub const ALL: [DataType; 7] = [
        DataType::WorkOrder,
        DataType::Asset,
        DataType::Inventory,
        DataType::Plan,
        DataType::Procedure,
        DataType::Solicitation,
        DataType::Metrics,
    ];

    /// Capability subject that governs this data type.
    pub fn subject(&self) -> Subject {
        match self {
            DataType::WorkOrder => Subject::WorkOrder,
            DataType::Asset => Subject::Asset,
            DataType::Inventory => Subject::Inventory,
            DataType::Plan => Subject::Plan,
            DataType::Procedure => Subject::Procedure,
            DataType::Solicitation => Subject::Solicitation,
            DataType::Metrics => Subject::Report,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::WorkOrder => "workorder",
            DataType::Asset => "asset",
            DataType::Inventory => "inventory",
            DataType::Plan => "plan",
            DataType::Procedure => "procedure",
            DataType::Solicitation => "solicitation",
            DataType::Metrics => "metrics",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownDataType(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the caller a collection is filtered for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: String,
    /// `None` for unauthenticated callers and accounts without a rule set.
    #[serde(default, deserialize_with = "role_or_none")]
    pub role: Option<Role>,
    pub department_id: Option<String>,
    #[serde(default)]
    pub sector_ids: Vec<String>,
}

/// Account roles without rules and unrecognized values both mean "no role".
fn role_or_none<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse::<AccountRole>().ok())
        .and_then(|account| account.acl_role()))
}

impl Viewer {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
            ..Default::default()
        }
    }

    /// The most restrictive caller; sees nothing.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_department(mut self, department_id: impl Into<String>) -> Self {
        self.department_id = Some(department_id.into());
        self
    }

    pub fn with_sectors<I, S>(mut self, sector_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sector_ids = sector_ids.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn in_sector(&self, item: &Record) -> bool {
        item.str_field("sectorId")
            .is_some_and(|sector| self.sector_ids.iter().any(|s| s == sector))
    }

    pub(crate) fn in_department(&self, item: &Record) -> bool {
        match (item.str_field("departmentId"), self.department_id.as_deref()) {
            (Some(item_dept), Some(mine)) => item_dept == mine,
            _ => false,
        }
    }

    pub(crate) fn created(&self, item: &Record) -> bool {
        !self.id.is_empty() && item.str_field("createdBy") == Some(self.id.as_str())
    }

    pub(crate) fn assigned(&self, item: &Record) -> bool {
        !self.id.is_empty() && item.str_field("assignedTo") == Some(self.id.as_str())
    }
}

/// Caller-selected narrowing of a filter call.
///
/// Options never reveal anything the role predicate hides, except that
/// `include_inactive` lets inactive records through to the role's own scope
/// check instead of hiding them outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub include_archived: bool,
    pub include_inactive: bool,
    pub only_owned: bool,
    pub max_priority: Option<Priority>,
    pub departments: Vec<String>,
    pub sectors: Vec<String>,
}

/// Counts describing one filter call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub visible: usize,
    pub filtered: usize,
}

impl FilterStats {
    fn new(total: usize, visible: usize) -> Self {
        Self {
            total,
            visible,
            filtered: total - visible,
        }
    }
}

/// Output of [`DataFilter::filter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filtered {
    pub filtered_data: Vec<Record>,
    pub can_view_all: bool,
    pub filter_stats: FilterStats,
}

type Predicate = fn(&DataFilter<'_>, &Record, &FilterOptions) -> bool;

/// Filters collections for one viewer.
#[derive(Debug, Clone, Copy)]
pub struct DataFilter<'a> {
    ability: Ability<'a>,
    viewer: &'a Viewer,
}

impl<'a> DataFilter<'a> {
    pub fn new(table: &'a PermissionTable, viewer: &'a Viewer) -> Self {
        Self {
            ability: Ability::new(table, viewer.role),
            viewer,
        }
    }

    pub fn ability(&self) -> Ability<'a> {
        self.ability
    }

    pub fn viewer(&self) -> &'a Viewer {
        self.viewer
    }

    /// Whether the caller sees `data_type` unfiltered by entitlement.
    pub fn can_view_all(&self, data_type: DataType) -> bool {
        self.ability.is_admin() || self.ability.can_manage(data_type.subject())
    }

    /// Whether a single record passes both the role predicate and `options`.
    pub fn is_visible(&self, item: &Record, data_type: DataType, options: &FilterOptions) -> bool {
        predicate(data_type)(self, item, options) && self.within_options(item, options)
    }

    /// Visible records, unredacted.
    pub fn visible(
        &self,
        data: &[Record],
        data_type: DataType,
        options: &FilterOptions,
    ) -> Vec<Record> {
        data.iter()
            .filter(|item| self.is_visible(item, data_type, options))
            .cloned()
            .collect()
    }

    /// Filter and redact `data` for this viewer.
    pub fn filter(
        &self,
        data: &[Record],
        data_type: DataType,
        options: &FilterOptions,
    ) -> Filtered {
        let fields = allowed_fields(self.viewer.role, data_type);
        let filtered_data: Vec<Record> = data
            .iter()
            .filter(|item| self.is_visible(item, data_type, options))
            .map(|item| fields.apply(item))
            .collect();

        let filter_stats = FilterStats::new(data.len(), filtered_data.len());
        tracing::debug!(
            %data_type,
            role = ?self.viewer.role,
            total = filter_stats.total,
            visible = filter_stats.visible,
            "filtered records"
        );

        Filtered {
            filtered_data,
            can_view_all: self.can_view_all(data_type),
            filter_stats,
        }
    }

    /// Inactive records are hidden outright unless the caller asked for them
    /// or manages the subject. `None` means "decide by role scope".
    fn inactive_override(
        &self,
        item: &Record,
        subject: Subject,
        options: &FilterOptions,
    ) -> Option<bool> {
        (item.bool_field("active") == Some(false) && !options.include_inactive)
            .then(|| self.ability.can_manage(subject))
    }

    fn within_options(&self, item: &Record, options: &FilterOptions) -> bool {
        if !options.include_archived && item.bool_field("archived") == Some(true) {
            return false;
        }
        if options.only_owned && !(self.viewer.assigned(item) || self.viewer.created(item)) {
            return false;
        }
        if !options.departments.is_empty()
            && !item
                .str_field("departmentId")
                .is_some_and(|d| options.departments.iter().any(|x| x == d))
        {
            return false;
        }
        if !options.sectors.is_empty()
            && !item
                .str_field("sectorId")
                .is_some_and(|s| options.sectors.iter().any(|x| x == s))
        {
            return false;
        }
        if let Some(max) = options.max_priority
            && let Some(raw) = item.str_field("priority")
        {
            // Unrecognized priorities fail closed.
            return raw.parse::<Priority>().is_ok_and(|p| p <= max);
        }
        true
    }
}

fn predicate(data_type: DataType) -> Predicate {
    match data_type {
        DataType::WorkOrder | DataType::Solicitation => work_order_visible,
        DataType::Asset => asset_visible,
        DataType::Inventory => inventory_visible,
        DataType::Plan => plan_visible,
        DataType::Procedure => procedure_visible,
        DataType::Metrics => metrics_visible,
    }
}

fn work_order_visible(f: &DataFilter<'_>, item: &Record, _: &FilterOptions) -> bool {
    let viewer = f.viewer;
    match viewer.role {
        Some(Role::Admin) => true,
        Some(Role::Technician) => {
            f.ability.can_manage(Subject::WorkOrder)
                || viewer.assigned(item)
                || viewer.in_sector(item)
                || viewer.created(item)
        }
        Some(Role::Requester) => viewer.created(item),
        None => false,
    }
}

fn asset_visible(f: &DataFilter<'_>, item: &Record, options: &FilterOptions) -> bool {
    let viewer = f.viewer;
    match viewer.role {
        Some(Role::Admin) => true,
        None => false,
        Some(role) => {
            if let Some(visible) = f.inactive_override(item, Subject::Asset, options) {
                return visible;
            }
            match role {
                Role::Technician => viewer.in_sector(item) || viewer.in_department(item),
                _ => viewer.in_sector(item),
            }
        }
    }
}

fn inventory_visible(f: &DataFilter<'_>, item: &Record, options: &FilterOptions) -> bool {
    match f.viewer.role {
        Some(Role::Admin) => true,
        None => false,
        Some(_) => f
            .inactive_override(item, Subject::Inventory, options)
            .unwrap_or_else(|| item.bool_field("active") != Some(false)),
    }
}

fn plan_visible(f: &DataFilter<'_>, item: &Record, options: &FilterOptions) -> bool {
    let viewer = f.viewer;
    match viewer.role {
        Some(Role::Admin) => true,
        None => false,
        Some(role) => {
            if let Some(visible) = f.inactive_override(item, Subject::Plan, options) {
                return visible;
            }
            match role {
                Role::Technician => viewer.in_sector(item) || viewer.in_department(item),
                _ => item.bool_field("active") != Some(false),
            }
        }
    }
}

fn procedure_visible(f: &DataFilter<'_>, item: &Record, options: &FilterOptions) -> bool {
    match f.viewer.role {
        Some(Role::Admin) => true,
        None => false,
        Some(_) => {
            let status = item.str_field("status");
            if status == Some("Inativo") && !options.include_inactive {
                return f.ability.can_manage(Subject::Procedure);
            }
            status == Some("Ativo")
        }
    }
}

fn metrics_visible(f: &DataFilter<'_>, item: &Record, _: &FilterOptions) -> bool {
    let viewer = f.viewer;
    match viewer.role {
        Some(Role::Admin) => true,
        None => false,
        Some(_) if item.bool_field("sensitive") == Some(true) => false,
        Some(Role::Technician) => {
            let global = item.str_field("sectorId").is_none_or(str::is_empty)
                && item.str_field("departmentId").is_none_or(str::is_empty);
            viewer.in_sector(item) || viewer.in_department(item) || global
        }
        Some(_) => viewer.in_sector(item),
    }
}
