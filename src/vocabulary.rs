//! Closed vocabularies for access control: roles, actions and subjects.
//!
//! Every value that reaches the evaluator is one of these enums, so an
//! unrecognized action or subject can only show up while parsing at a
//! boundary (config files, tokens, query strings). Parsing rejects it there.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Permission class of an authenticated actor.
///
/// Only these roles are targets of permission rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Technician,
    Requester,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Technician, Role::Requester];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Technician => "technician",
            Role::Requester => "requester",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Case-insensitive; the user store keeps roles upper-cased.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "technician" => Ok(Role::Technician),
            "requester" => Ok(Role::Requester),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role as stored on a user account.
///
/// `Operator` and `Viewer` exist for display in team listings but have no
/// rule set of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    Technician,
    Operator,
    Requester,
    Viewer,
}

impl AccountRole {
    /// The rule-bearing role this account is evaluated as, if any.
    pub fn acl_role(&self) -> Option<Role> {
        match self {
            AccountRole::Admin => Some(Role::Admin),
            AccountRole::Technician => Some(Role::Technician),
            AccountRole::Requester => Some(Role::Requester),
            AccountRole::Operator | AccountRole::Viewer => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::Technician => "technician",
            AccountRole::Operator => "operator",
            AccountRole::Requester => "requester",
            AccountRole::Viewer => "viewer",
        }
    }
}

impl FromStr for AccountRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(AccountRole::Admin),
            "technician" => Ok(AccountRole::Technician),
            "operator" => Ok(AccountRole::Operator),
            "requester" => Ok(AccountRole::Requester),
            "viewer" => Ok(AccountRole::Viewer),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

/// A verb an actor wants to perform.
///
/// `Manage` is checked on its own; it does not imply the other verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Move,
    Convert,
    Manage,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Move,
        Action::Convert,
        Action::Manage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Move => "move",
            Action::Convert => "convert",
            Action::Manage => "manage",
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    WorkOrder,
    Asset,
    Plan,
    Inventory,
    Procedure,
    Solicitation,
    Report,
    User,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::WorkOrder,
        Subject::Asset,
        Subject::Plan,
        Subject::Inventory,
        Subject::Procedure,
        Subject::Solicitation,
        Subject::Report,
        Subject::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::WorkOrder => "workorder",
            Subject::Asset => "asset",
            Subject::Plan => "plan",
            Subject::Inventory => "inventory",
            Subject::Procedure => "procedure",
            Subject::Solicitation => "solicitation",
            Subject::Report => "report",
            Subject::User => "user",
        }
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| Error::UnknownSubject(s.to_string()))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject position of a rule definition: a concrete subject or `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubjectRef {
    Any,
    Only(Subject),
}

impl FromStr for SubjectRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(SubjectRef::Any)
        } else {
            s.parse().map(SubjectRef::Only)
        }
    }
}

impl TryFrom<String> for SubjectRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SubjectRef> for String {
    fn from(value: SubjectRef) -> Self {
        match value {
            SubjectRef::Any => "*".to_string(),
            SubjectRef::Only(subject) => subject.as_str().to_string(),
        }
    }
}

impl From<Subject> for SubjectRef {
    fn from(value: Subject) -> Self {
        SubjectRef::Only(value)
    }
}
