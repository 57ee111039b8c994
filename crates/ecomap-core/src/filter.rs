//! Page-owned view state: the category filter and the current selection.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::poi::{Category, PointOfInterest};

/// Categories currently rendered on the map. Defaults to every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilterSet {
    categories: BTreeSet<Category>,
}

impl Default for ActiveFilterSet {
    fn default() -> Self {
        Self::all()
    }
}

impl ActiveFilterSet {
    #[must_use]
    pub fn all() -> Self {
        Self {
            categories: Category::ALL.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            categories: BTreeSet::new(),
        }
    }

    /// Flips membership of `category`. Returns `true` if it is now enabled.
    pub fn toggle(&mut self, category: Category) -> bool {
        if self.categories.remove(&category) {
            false
        } else {
            self.categories.insert(category);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.categories.len() == Category::ALL.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }

    #[must_use]
    pub fn matches(&self, point: &PointOfInterest) -> bool {
        self.contains(point.category)
    }

    /// Points whose category is enabled, in their original order.
    pub fn apply<'a>(
        &'a self,
        points: &'a [PointOfInterest],
    ) -> impl Iterator<Item = &'a PointOfInterest> + 'a {
        points.iter().filter(move |p| self.matches(p))
    }
}

impl FromIterator<Category> for ActiveFilterSet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}

/// Parses a comma-separated category list such as `"recycling,hospital"`.
///
/// An empty or whitespace-only string yields the default (all categories).
impl FromStr for ActiveFilterSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::all());
        }
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Category>)
            .collect()
    }
}

/// The page's selected location. Only replaced by marker activations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    current: Option<PointOfInterest>,
}

impl Selection {
    /// Replaces the selection with `point`, returning the previous one.
    pub fn select(&mut self, point: PointOfInterest) -> Option<PointOfInterest> {
        self.current.replace(point)
    }

    #[must_use]
    pub fn current(&self) -> Option<&PointOfInterest> {
        self.current.as_ref()
    }
}
