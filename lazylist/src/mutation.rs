use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::RowId;
use crate::store::RowStore;

/// The structural edits a host can deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Action {
    Append,
    Prepend,
    InsertAfter,
    InsertBefore,
    Replace,
    Remove,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::InsertAfter => "insert-after",
            Self::InsertBefore => "insert-before",
            Self::Replace => "replace",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an action name is not one of the known [`Action`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseActionError {
    name: String,
}

impl ParseActionError {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mutation action `{}`", self.name)
    }
}

impl core::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    /// Accepts the kebab-case names, their snake_case spellings and the `v-` prefixed stream
    /// actions (`v-append`, `v-replace`, `v-remove`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("v-").unwrap_or(s) {
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            "insert-after" | "insert_after" => Ok(Self::InsertAfter),
            "insert-before" | "insert_before" => Ok(Self::InsertBefore),
            "replace" => Ok(Self::Replace),
            "remove" => Ok(Self::Remove),
            _ => Err(ParseActionError { name: s.into() }),
        }
    }
}

/// A mutation as delivered by a shared event stream.
///
/// `target` names the row being appended, prepended, replaced or removed. For `insert-after` and
/// `insert-before` it names the anchor row and `row_id` names the inserted row. For `replace`,
/// `row_id` optionally renames the target (e.g. a temporary client id becoming a persisted id).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutationMessage<R> {
    pub action: String,
    pub target: RowId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub row_id: Option<RowId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: Option<R>,
}

impl<R> MutationMessage<R> {
    pub fn new(action: impl Into<String>, target: impl Into<RowId>) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            row_id: None,
            scope: None,
            content: None,
        }
    }

    pub fn with_row_id(mut self, row_id: impl Into<RowId>) -> Self {
        self.row_id = Some(row_id.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_content(mut self, content: R) -> Self {
        self.content = Some(content);
        self
    }

    /// Whether an instance with scope `scope` should handle this message.
    ///
    /// Unscoped messages reach every instance.
    pub fn is_for(&self, scope: &str) -> bool {
        self.scope.as_deref().is_none_or(|s| s == scope)
    }

    /// Resolves the message into a typed [`Mutation`].
    pub fn into_mutation(self) -> Result<Mutation<R>, MutationError> {
        let action: Action = self.action.parse()?;
        let Self {
            target,
            row_id,
            content,
            ..
        } = self;
        match action {
            Action::Append => Ok(Mutation::Append {
                id: target,
                row: content,
            }),
            Action::Prepend => Ok(Mutation::Prepend {
                id: target,
                row: content,
            }),
            Action::InsertAfter => Ok(Mutation::InsertAfter {
                id: row_id.ok_or(MutationError::MissingRowId(action))?,
                after: target,
                row: content,
            }),
            Action::InsertBefore => Ok(Mutation::InsertBefore {
                id: row_id.ok_or(MutationError::MissingRowId(action))?,
                before: target,
                row: content,
            }),
            Action::Replace => Ok(Mutation::Replace {
                target,
                row: content.ok_or(MutationError::MissingContent(action))?,
                new_id: row_id,
            }),
            Action::Remove => Ok(Mutation::Remove { target }),
        }
    }
}

/// Why a [`MutationMessage`] could not be turned into a [`Mutation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationError {
    UnknownAction(ParseActionError),
    MissingRowId(Action),
    MissingContent(Action),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(e) => fmt::Display::fmt(e, f),
            Self::MissingRowId(action) => write!(f, "`{action}` message has no row id"),
            Self::MissingContent(action) => write!(f, "`{action}` message has no content"),
        }
    }
}

impl core::error::Error for MutationError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnknownAction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseActionError> for MutationError {
    fn from(e: ParseActionError) -> Self {
        Self::UnknownAction(e)
    }
}

/// A structural edit of the row sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation<R> {
    Append {
        id: RowId,
        row: Option<R>,
    },
    Prepend {
        id: RowId,
        row: Option<R>,
    },
    InsertAfter {
        id: RowId,
        after: RowId,
        row: Option<R>,
    },
    InsertBefore {
        id: RowId,
        before: RowId,
        row: Option<R>,
    },
    Replace {
        target: RowId,
        row: R,
        new_id: Option<RowId>,
    },
    Remove {
        target: RowId,
    },
}

/// The effect a [`Mutation`] had on a [`RowStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A row was inserted at `index`; `cached` tells whether it came with content.
    Inserted { index: usize, cached: bool },
    /// The row at `index` got new content (and possibly a new id).
    Replaced { index: usize, previous: Option<RowId> },
    /// The row formerly at `index` was removed.
    Removed { index: usize, id: RowId },
}

impl<R> Mutation<R> {
    pub fn action(&self) -> Action {
        match self {
            Self::Append { .. } => Action::Append,
            Self::Prepend { .. } => Action::Prepend,
            Self::InsertAfter { .. } => Action::InsertAfter,
            Self::InsertBefore { .. } => Action::InsertBefore,
            Self::Replace { .. } => Action::Replace,
            Self::Remove { .. } => Action::Remove,
        }
    }

    /// Applies the edit to `store`.
    ///
    /// Returns `None` when the edit was a no-op: an unknown anchor or target, or an id that is
    /// already present.
    pub fn apply(self, store: &mut RowStore<R>) -> Option<Applied> {
        let (index, id, row) = match self {
            Self::Append { id, row } => (store.len(), id, row),
            Self::Prepend { id, row } => (0, id, row),
            Self::InsertAfter { id, after, row } => (store.index_of(after.as_str())? + 1, id, row),
            Self::InsertBefore { id, before, row } => (store.index_of(before.as_str())?, id, row),
            Self::Replace {
                target,
                row,
                new_id,
            } => {
                let renamed = new_id.as_ref().is_some_and(|n| *n != target);
                let index = store.replace(target.as_str(), row, new_id)?;
                return Some(Applied::Replaced {
                    index,
                    previous: renamed.then_some(target),
                });
            }
            Self::Remove { target } => {
                let index = store.remove_by_id(target.as_str())?;
                return Some(Applied::Removed { index, id: target });
            }
        };
        let cached = row.is_some();
        store
            .insert_at(index, id, row)
            .then_some(Applied::Inserted { index, cached })
    }
}
