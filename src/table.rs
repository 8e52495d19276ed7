//! The permission table: role → allow rules.
//!
//! Definitions may spell `action` and `subject` as a scalar or a list. They
//! are normalized into sets once, when the table is built, so the evaluator
//! never has to care which form a rule was written in.
//!
//! The table is allow-only. A check is denied unless some rule grants it, and
//! rule order carries no meaning.
//!
//! A rule may carry a `when` condition on the record being acted on. Such a
//! rule only grants when the check supplies that record.
//!
//! ```toml
//! [[roles.technician]]
//! action = "view"
//! subject = "*"
//!
//! [[roles.technician]]
//! action = ["edit", "move"]
//! subject = ["workorder", "inventory"]
//!
//! [[roles.requester]]
//! action = "edit"
//! subject = "solicitation"
//! when = "owner"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Acl;
use crate::error::{Error, Result};
use crate::vocabulary::{Action, Role, Subject, SubjectRef};

/// A scalar or a list in a rule definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Requirement a rule places on the record it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// The caller created the record.
    Owner,
    /// The record is assigned to the caller.
    Assignee,
    /// The record belongs to one of the caller's sectors.
    Sector,
}

/// Rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub action: OneOrMany<Action>,
    pub subject: OneOrMany<SubjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

impl RuleDef {
    pub fn new(
        actions: impl IntoIterator<Item = Action>,
        subjects: impl IntoIterator<Item = SubjectRef>,
    ) -> Self {
        Self {
            action: OneOrMany::Many(actions.into_iter().collect()),
            subject: OneOrMany::Many(subjects.into_iter().collect()),
            when: None,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }
}

#[derive(Debug, Deserialize)]
struct TableDef {
    #[serde(default)]
    roles: BTreeMap<Role, Vec<RuleDef>>,
}

/// Subjects a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectSet {
    Any,
    Only(BTreeSet<Subject>),
}

impl SubjectSet {
    pub fn contains(&self, subject: Subject) -> bool {
        match self {
            SubjectSet::Any => true,
            SubjectSet::Only(subjects) => subjects.contains(&subject),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, SubjectSet::Any)
    }
}

/// A normalized allow rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub actions: BTreeSet<Action>,
    pub subjects: SubjectSet,
    pub when: Option<Condition>,
}

impl Rule {
    fn from_def(role: Role, def: RuleDef) -> Result<Self> {
        let actions: BTreeSet<Action> = def.action.into_vec().into_iter().collect();
        let subjects = def.subject.into_vec();
        if actions.is_empty() || subjects.is_empty() {
            return Err(Error::Config(format!(
                "rule for role {role} must name at least one action and one subject"
            )));
        }

        // A `*` anywhere in the list makes the whole rule a wildcard rule.
        let subjects = if subjects.contains(&SubjectRef::Any) {
            SubjectSet::Any
        } else {
            SubjectSet::Only(
                subjects
                    .into_iter()
                    .filter_map(|s| match s {
                        SubjectRef::Only(subject) => Some(subject),
                        SubjectRef::Any => None,
                    })
                    .collect(),
            )
        };

        Ok(Self {
            actions,
            subjects,
            when: def.when,
        })
    }

    /// Whether this rule covers `action` on `subject`, leaving its condition
    /// aside.
    pub fn grants(&self, action: Action, subject: Subject) -> bool {
        self.actions.contains(&action) && self.subjects.contains(subject)
    }
}

/// Immutable role → rules mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermissionTable {
    rules: BTreeMap<Role, Vec<Rule>>,
}

impl PermissionTable {
    /// Build a table from rule definitions.
    ///
    /// Every listed role must own at least one rule.
    pub fn from_defs(defs: BTreeMap<Role, Vec<RuleDef>>) -> Result<Self> {
        let mut rules = BTreeMap::new();
        for (role, role_defs) in defs {
            if role_defs.is_empty() {
                return Err(Error::Config(format!("role {role} has no rules")));
            }
            let normalized = role_defs
                .into_iter()
                .map(|def| Rule::from_def(role, def))
                .collect::<Result<Vec<_>>>()?;
            rules.insert(role, normalized);
        }
        Ok(Self { rules })
    }

    /// Parse a table from its TOML form.
    pub fn from_toml(content: &str) -> Result<Self> {
        let def: TableDef = toml::from_str(content)?;
        Self::from_defs(def.roles)
    }

    /// The built-in CMMS configuration.
    pub fn reference() -> Self {
        use Action::*;
        use Subject::*;

        let mut defs = BTreeMap::new();
        defs.insert(
            Role::Admin,
            vec![RuleDef::new(Action::ALL, [SubjectRef::Any])],
        );
        defs.insert(
            Role::Technician,
            vec![
                RuleDef::new([View], [SubjectRef::Any]),
                RuleDef::new([Edit, Move, Convert], only(&[WorkOrder, Inventory, Procedure])),
                RuleDef::new([Create], only(&[WorkOrder, Solicitation])),
                RuleDef::new([Convert], only(&[Solicitation])),
            ],
        );
        defs.insert(
            Role::Requester,
            vec![
                RuleDef::new([View], [SubjectRef::Any]),
                RuleDef::new([Create, Edit], only(&[Solicitation])),
            ],
        );

        // Static definitions above always validate.
        Self::from_defs(defs).unwrap_or_default()
    }

    /// Rules owned by `role`; empty when the role has no entry.
    pub fn rules(&self, role: Role) -> &[Rule] {
        self.rules.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Roles that own at least one rule.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.rules.keys().copied()
    }
}

fn only(subjects: &[Subject]) -> Vec<SubjectRef> {
    subjects.iter().copied().map(SubjectRef::Only).collect()
}

/// Load the process-wide permission table.
///
/// Reads `acl.table_path` when configured, otherwise returns the reference
/// table. Called once at startup; the result is shared read-only.
pub fn load_permission_table(acl: &Acl) -> Result<PermissionTable> {
    let table = match acl.table_path.as_deref() {
        Some(path) => read_table(path)?,
        None => PermissionTable::reference(),
    };

    let source = acl
        .table_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    for role in table.roles() {
        tracing::info!(%role, rules = table.rules(role).len(), %source, "loaded permission rules");
    }

    Ok(table)
}

fn read_table(path: &Path) -> Result<PermissionTable> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read permission table: {e}")))?;
    PermissionTable::from_toml(&content)
}
