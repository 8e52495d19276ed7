//! Field-level redaction of visible records.
//!
//! Admins see every field. Other roles see a per-type allow-list, which
//! always includes the ownership and scope fields the visibility predicates
//! read, so a masked record is judged the same way as its source.

use crate::filter::DataType;
use crate::record::Record;
use crate::vocabulary::Role;

const BASE: &[&str] = &["id", "name", "title", "description", "createdAt", "updatedAt"];

const SCOPE: &[&str] = &[
    "createdBy",
    "assignedTo",
    "sectorId",
    "departmentId",
    "active",
    "status",
    "priority",
    "archived",
];

const ANONYMOUS: &[&str] = &["id", "name", "title"];

/// Fields a role may see on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    All,
    Only(Vec<&'static str>),
}

impl FieldSet {
    pub fn allows(&self, field: &str) -> bool {
        match self {
            FieldSet::All => true,
            FieldSet::Only(fields) => fields.iter().any(|f| *f == field),
        }
    }

    /// A fresh record restricted to this field set.
    pub fn apply(&self, record: &Record) -> Record {
        match self {
            FieldSet::All => record.clone(),
            FieldSet::Only(fields) => record.project(fields),
        }
    }
}

fn only(extra: &[&'static str]) -> FieldSet {
    let mut fields = Vec::with_capacity(BASE.len() + SCOPE.len() + extra.len());
    fields.extend_from_slice(BASE);
    fields.extend_from_slice(SCOPE);
    fields.extend_from_slice(extra);
    FieldSet::Only(fields)
}

/// Allowed fields for `role` on records of `data_type`.
pub fn allowed_fields(role: Option<Role>, data_type: DataType) -> FieldSet {
    match role {
        Some(Role::Admin) => FieldSet::All,
        Some(Role::Technician) => match data_type {
            DataType::WorkOrder | DataType::Solicitation => only(&["equipmentId", "type"]),
            DataType::Asset => only(&[
                "location",
                "lastMaintenance",
                "nextMaintenance",
                "model",
                "serial",
            ]),
            DataType::Inventory => only(&["sku", "location", "unit", "category", "reorderPoint"]),
            DataType::Procedure => only(&["category", "version"]),
            DataType::Plan => only(&["frequency", "equipmentId", "nextExecution"]),
            DataType::Metrics => only(&["label", "value", "unit", "period", "category"]),
        },
        Some(Role::Requester) => match data_type {
            DataType::WorkOrder => only(&["type"]),
            DataType::Solicitation => only(&["equipmentId", "note"]),
            DataType::Asset => only(&["location", "model"]),
            // No stock levels.
            DataType::Inventory => only(&["unit", "category"]),
            DataType::Metrics => only(&["label", "value"]),
            DataType::Procedure | DataType::Plan => only(&[]),
        },
        None => FieldSet::Only(ANONYMOUS.to_vec()),
    }
}
