//! Capability evaluation.
//!
//! `PermissionTable::can` answers "may this role do this to that?" by
//! scanning the role's rules. [`Ability`] binds a table to the caller's role
//! so call sites only name the action and subject.
//!
//! Rules carrying a [`Condition`] grant only through the `*_in` checks, which
//! take a [`RuleContext`]. Without a context such a rule never applies.
//!
//! The role is always passed in explicitly and nothing is cached. A role
//! change is visible on the very next check.

use crate::error::{Error, Result};
use crate::filter::Viewer;
use crate::record::Record;
use crate::table::{Condition, PermissionTable, Rule};
use crate::vocabulary::{Action, Role, Subject};

/// The caller and the record a check is about.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub viewer: &'a Viewer,
    pub record: &'a Record,
}

impl<'a> RuleContext<'a> {
    pub fn new(viewer: &'a Viewer, record: &'a Record) -> Self {
        Self { viewer, record }
    }
}

impl Condition {
    pub fn holds(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            Condition::Owner => ctx.viewer.created(ctx.record),
            Condition::Assignee => ctx.viewer.assigned(ctx.record),
            Condition::Sector => ctx.viewer.in_sector(ctx.record),
        }
    }
}

impl Rule {
    fn applies(&self, action: Action, subject: Subject, ctx: Option<&RuleContext<'_>>) -> bool {
        self.grants(action, subject)
            && match (self.when, ctx) {
                (None, _) => true,
                (Some(condition), Some(ctx)) => condition.holds(ctx),
                (Some(_), None) => false,
            }
    }
}

impl PermissionTable {
    /// Whether `role` may perform `action` on `subject`.
    ///
    /// A role with no rules is denied everything. Conditional rules are
    /// skipped.
    pub fn can(&self, role: Role, action: Action, subject: Subject) -> bool {
        self.evaluate(role, action, subject, None)
    }

    /// Like [`can`](Self::can), also applying conditional rules to `ctx`.
    pub fn can_in(
        &self,
        role: Role,
        action: Action,
        subject: Subject,
        ctx: &RuleContext<'_>,
    ) -> bool {
        self.evaluate(role, action, subject, Some(ctx))
    }

    /// Whether `role` may perform `action` on every subject, i.e. owns an
    /// unconditional rule granting it on `*`.
    pub fn can_any_subject(&self, role: Role, action: Action) -> bool {
        self.rules(role).iter().any(|rule| {
            rule.when.is_none() && rule.subjects.is_any() && rule.actions.contains(&action)
        })
    }

    fn evaluate(
        &self,
        role: Role,
        action: Action,
        subject: Subject,
        ctx: Option<&RuleContext<'_>>,
    ) -> bool {
        self.rules(role)
            .iter()
            .any(|rule| rule.applies(action, subject, ctx))
    }
}

/// Evaluator bound to one caller.
///
/// `role == None` is the unauthenticated caller, and every check fails.
#[derive(Debug, Clone, Copy)]
pub struct Ability<'a> {
    table: &'a PermissionTable,
    role: Option<Role>,
}

impl<'a> Ability<'a> {
    pub fn new(table: &'a PermissionTable, role: Option<Role>) -> Self {
        Self { table, role }
    }

    /// An ability that denies everything.
    pub fn anonymous(table: &'a PermissionTable) -> Self {
        Self { table, role: None }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn table(&self) -> &'a PermissionTable {
        self.table
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.check(action, subject, None)
    }

    /// Check against a specific record, so conditional rules can apply.
    pub fn can_in(&self, action: Action, subject: Subject, ctx: &RuleContext<'_>) -> bool {
        self.check(action, subject, Some(ctx))
    }

    fn check(&self, action: Action, subject: Subject, ctx: Option<&RuleContext<'_>>) -> bool {
        let allowed = match self.role {
            Some(role) => self.table.evaluate(role, action, subject, ctx),
            None => false,
        };
        if !allowed {
            tracing::trace!(role = ?self.role, %action, %subject, "capability denied");
        }
        allowed
    }

    pub fn can_view(&self, subject: Subject) -> bool {
        self.can(Action::View, subject)
    }

    pub fn can_create(&self, subject: Subject) -> bool {
        self.can(Action::Create, subject)
    }

    pub fn can_edit(&self, subject: Subject) -> bool {
        self.can(Action::Edit, subject)
    }

    pub fn can_delete(&self, subject: Subject) -> bool {
        self.can(Action::Delete, subject)
    }

    pub fn can_move(&self, subject: Subject) -> bool {
        self.can(Action::Move, subject)
    }

    pub fn can_convert(&self, subject: Subject) -> bool {
        self.can(Action::Convert, subject)
    }

    pub fn can_manage(&self, subject: Subject) -> bool {
        self.can(Action::Manage, subject)
    }

    /// Check a capability at a mutation boundary.
    ///
    /// # Returns
    /// - `Ok(())` if the check passes
    /// - `Err(Error::Forbidden)` otherwise, which renders as HTTP 403
    pub fn require(&self, action: Action, subject: Subject) -> Result<()> {
        if self.can(action, subject) {
            Ok(())
        } else {
            Err(Error::Forbidden { action, subject })
        }
    }

    /// [`require`](Self::require) against a specific record.
    pub fn require_in(
        &self,
        action: Action,
        subject: Subject,
        ctx: &RuleContext<'_>,
    ) -> Result<()> {
        if self.can_in(action, subject, ctx) {
            Ok(())
        } else {
            Err(Error::Forbidden { action, subject })
        }
    }
}
