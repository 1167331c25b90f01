//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{CategoryId, Error, Kind, UserID};

/// The icon given to categories created without one.
pub const DEFAULT_CATEGORY_ICON: &str = "💰";
/// The color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "from-blue-500 to-blue-600";

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only
    /// whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user defined label that groups transactions of one kind, e.g. 'Food' or 'Salary'.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub user_id: UserID,
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category groups income or expenses.
    pub kind: Kind,
    /// An emoji or icon name shown next to the category.
    pub icon: String,
    /// A color hint for presentation layers.
    pub color: String,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Category {
    /// The display fields attached to transactions that reference this category.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            icon: self.icon.clone(),
            color: self.color.clone(),
        }
    }
}

/// The display fields of a category, embedded in transaction reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category groups income or expenses.
    pub kind: Kind,
    /// The category's icon.
    pub icon: String,
    /// The category's color hint.
    pub color: String,
}

/// A validated category that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The display name of the category.
    pub name: CategoryName,
    /// Whether the category groups income or expenses.
    pub kind: Kind,
    /// The category's icon.
    pub icon: String,
    /// The category's color hint.
    pub color: String,
}

impl NewCategory {
    /// Create a new category, using the default icon and color where `icon` or `color` is
    /// missing or blank.
    pub fn new(name: CategoryName, kind: Kind, icon: Option<&str>, color: Option<&str>) -> Self {
        Self {
            name,
            kind,
            icon: non_blank_or(icon, DEFAULT_CATEGORY_ICON),
            color: non_blank_or(color, DEFAULT_CATEGORY_COLOR),
        }
    }
}

fn non_blank_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => default.to_owned(),
    }
}

/// The request body for creating a category.
///
/// Any `userId` field in the body is ignored, the owner is always the authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    /// The display name of the category.
    pub name: String,
    /// "income" or "expense".
    #[serde(alias = "type")]
    pub kind: String,
    /// An optional icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// An optional color hint.
    #[serde(default)]
    pub color: Option<String>,
}

impl TryFrom<CategoryPayload> for NewCategory {
    type Error = Error;

    fn try_from(payload: CategoryPayload) -> Result<Self, Self::Error> {
        let name = CategoryName::new(&payload.name)?;
        let kind = payload.kind.parse()?;

        Ok(NewCategory::new(
            name,
            kind,
            payload.icon.as_deref(),
            payload.color.as_deref(),
        ))
    }
}
