//! Catalog product types.
//!
//! Products are owned by the catalog store; the core only reads them. The
//! category set is normalized to one canonical lowercase enumeration at
//! this boundary, regardless of how a client or legacy record cased it.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::order::value_objects::Money;

/// Product category, canonically lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cakes,
    Pastries,
    Breads,
    Cookies,
    Desserts,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 5] = [
        Category::Cakes,
        Category::Pastries,
        Category::Breads,
        Category::Cookies,
        Category::Desserts,
    ];

    /// Parses a category case-insensitively.
    ///
    /// Used where product data enters the system, so the core only ever
    /// sees the canonical lowercase values.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_exact(s.to_ascii_lowercase().as_str())
    }

    /// Matches a canonical lowercase value exactly.
    ///
    /// Used for the catalog query filter, which is case-sensitive.
    pub fn from_exact(s: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cakes => "cakes",
            Category::Pastries => "pastries",
            Category::Breads => "breads",
            Category::Cookies => "cookies",
            Category::Desserts => "desserts",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog product.
///
/// Immutable from the core's perspective except for the availability flag;
/// orders snapshot the fields they need rather than referencing live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Money,
    pub description: String,
    pub image: String,
    pub available: bool,
    pub weight: String,
    pub contains: Vec<String>,
    pub ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an available product with a fresh ID and empty
    /// descriptive fields.
    pub fn new(name: impl Into<String>, category: Category, price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            category,
            price,
            description: String::new(),
            image: String::new(),
            available: true,
            weight: String::new(),
            contains: Vec::new(),
            ingredients: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets weight, allergens, and ingredients.
    pub fn with_details(
        mut self,
        weight: impl Into<String>,
        contains: Vec<String>,
        ingredients: Vec<String>,
    ) -> Self {
        self.weight = weight.into();
        self.contains = contains;
        self.ingredients = ingredients;
        self
    }
}
