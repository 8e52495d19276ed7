//! Conditional rendering of UI affordances.
//!
//! A gate yields its content only when the capability check passes. A closed
//! gate yields nothing at all (`None`, or no list entry), never a disabled
//! placeholder, so denied controls stay out of the accessibility tree and the
//! tab order.
//!
//! # Example
//!
//! ```ignore
//! let gate = Gate::new(ability);
//! let toolbar = gate.filter_items([
//!     (Action::Edit, Subject::WorkOrder, Button::Edit),
//!     (Action::Delete, Subject::WorkOrder, Button::Delete),
//! ]);
//! ```

use crate::ability::Ability;
use crate::vocabulary::{Action, Subject};

/// Renders content conditionally on an [`Ability`].
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    ability: Ability<'a>,
}

impl<'a> Gate<'a> {
    pub fn new(ability: Ability<'a>) -> Self {
        Self { ability }
    }

    pub fn ability(&self) -> Ability<'a> {
        self.ability
    }

    /// Build `content` only if `action` on `subject` is allowed.
    pub fn if_can<T>(
        &self,
        action: Action,
        subject: Subject,
        content: impl FnOnce() -> T,
    ) -> Option<T> {
        self.ability.can(action, subject).then(content)
    }

    /// Build `content` if allowed, otherwise `fallback`.
    pub fn if_can_or<T>(
        &self,
        action: Action,
        subject: Subject,
        content: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        self.if_can(action, subject, content).unwrap_or_else(fallback)
    }

    pub fn if_can_edit<T>(&self, subject: Subject, content: impl FnOnce() -> T) -> Option<T> {
        self.if_can(Action::Edit, subject, content)
    }

    pub fn if_can_delete<T>(&self, subject: Subject, content: impl FnOnce() -> T) -> Option<T> {
        self.if_can(Action::Delete, subject, content)
    }

    pub fn if_can_create<T>(&self, subject: Subject, content: impl FnOnce() -> T) -> Option<T> {
        self.if_can(Action::Create, subject, content)
    }

    pub fn if_can_move<T>(&self, subject: Subject, content: impl FnOnce() -> T) -> Option<T> {
        self.if_can(Action::Move, subject, content)
    }

    /// Keep only the items whose capability check passes, in order.
    pub fn filter_items<T>(&self, items: impl IntoIterator<Item = (Action, Subject, T)>) -> Vec<T> {
        items
            .into_iter()
            .filter(|(action, subject, _)| self.ability.can(*action, *subject))
            .map(|(_, _, item)| item)
            .collect()
    }
}
