// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sparse edit values
//!
//! An edit document only carries the fields a user touched. Each field is an
//! [`Edit`], which keeps "not touched" and "explicitly reset" apart from a
//! staged override.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One staged field of a sparse edit.
///
/// In an edit document, an absent key deserializes to [`Edit::Unset`], `null`
/// to [`Edit::Inherit`] and any other value to [`Edit::Set`]. `null` is
/// reserved for [`Edit::Inherit`]: an `Option` field cannot be cleared
/// through a document, only through `Edit::Set(None)` in code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Edit<T> {
    /// Field present in the form but never touched
    #[default]
    Unset,
    /// Explicitly reset to inherit the current value
    Inherit,
    /// Staged override
    Set(T),
}

impl<T> Edit<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Edit::Unset)
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, Edit::Inherit)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Edit::Set(_))
    }

    /// Transform the staged value, keeping the unset/inherit state.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Edit<U>, E> {
        Ok(match self {
            Edit::Unset => Edit::Unset,
            Edit::Inherit => Edit::Inherit,
            Edit::Set(value) => Edit::Set(f(value)?),
        })
    }
}

impl<T: Clone> Edit<T> {
    /// Value this field takes once merged onto `current`.
    ///
    /// Only [`Edit::Set`] overrides. Lists are leaves: a staged list replaces
    /// the current list as a whole.
    pub fn resolve(&self, current: &T) -> T {
        match self {
            Edit::Set(value) => value.clone(),
            Edit::Unset | Edit::Inherit => current.clone(),
        }
    }
}

impl<T> From<T> for Edit<T> {
    fn from(value: T) -> Self {
        Edit::Set(value)
    }
}

impl<T: Serialize> Serialize for Edit<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Edit::Set(value) => value.serialize(serializer),
            Edit::Unset | Edit::Inherit => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Edit<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Edit::Set(value),
            None => Edit::Inherit,
        })
    }
}

/// A full configuration value that can absorb a sparse edit of itself.
pub trait Reconcile: Clone {
    /// Sparse mirror of `Self`: same fields, every one optional.
    type Edit: StagedEdit + Default;

    /// Produce a new value with every override in `edit` applied.
    fn reconcile(&self, edit: &Self::Edit) -> Self;
}

/// Common queries over sparse edits.
pub trait StagedEdit {
    /// No field was touched at all.
    fn is_untouched(&self) -> bool;

    /// At least one field carries an override.
    fn has_overrides(&self) -> bool;
}

impl<T> StagedEdit for Edit<T> {
    fn is_untouched(&self) -> bool {
        self.is_unset()
    }

    fn has_overrides(&self) -> bool {
        self.is_set()
    }
}

/// Serde `skip_serializing_if` hook for edit fields.
pub fn is_untouched<E: StagedEdit>(edit: &E) -> bool {
    edit.is_untouched()
}
