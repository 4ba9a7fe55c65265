// 🏷️ Category Entity - Spending categories with stable identity
//
// "Category label is what the user sees, CategoryId is what expenses point at"
//
// Problem solved:
// - Expenses reference a category by id, never by label
// - Labels are unique ignoring case ("food" and "Food" are the same category)
// - Users can add categories mid-session without colliding with existing ids

use crate::errors::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label of the fallback category used when a suggestion matches nothing
pub const OTHER_LABEL: &str = "Other";

// ============================================================================
// CATEGORY ID
// ============================================================================

/// Opaque numeric category key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CategoryId)
    }
}

// ============================================================================
// ICON REFERENCE
// ============================================================================

/// Symbolic icon shown next to a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconRef {
    Utensils,
    Car,
    Home,
    Bolt,
    Film,
    ShoppingBag,
    Gift,
    Heart,
    BookOpen,
    GraduationCap,
    Briefcase,
    Plane,
    Coffee,
    Smartphone,
    PawPrint,
    Music,
    CircleDollarSign,
}

impl IconRef {
    pub const ALL: [IconRef; 17] = [
        IconRef::Utensils,
        IconRef::Car,
        IconRef::Home,
        IconRef::Bolt,
        IconRef::Film,
        IconRef::ShoppingBag,
        IconRef::Gift,
        IconRef::Heart,
        IconRef::BookOpen,
        IconRef::GraduationCap,
        IconRef::Briefcase,
        IconRef::Plane,
        IconRef::Coffee,
        IconRef::Smartphone,
        IconRef::PawPrint,
        IconRef::Music,
        IconRef::CircleDollarSign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconRef::Utensils => "Utensils",
            IconRef::Car => "Car",
            IconRef::Home => "Home",
            IconRef::Bolt => "Bolt",
            IconRef::Film => "Film",
            IconRef::ShoppingBag => "ShoppingBag",
            IconRef::Gift => "Gift",
            IconRef::Heart => "Heart",
            IconRef::BookOpen => "BookOpen",
            IconRef::GraduationCap => "GraduationCap",
            IconRef::Briefcase => "Briefcase",
            IconRef::Plane => "Plane",
            IconRef::Coffee => "Coffee",
            IconRef::Smartphone => "Smartphone",
            IconRef::PawPrint => "PawPrint",
            IconRef::Music => "Music",
            IconRef::CircleDollarSign => "CircleDollarSign",
        }
    }

    /// Resolve an icon by name; unknown names fall back to the generic coin
    pub fn from_name(name: &str) -> IconRef {
        IconRef::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str() == name.trim())
            .unwrap_or(IconRef::CircleDollarSign)
    }
}

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// Display text, unique ignoring case
    pub label: String,

    pub icon: IconRef,
}

impl Category {
    pub fn new(id: CategoryId, label: impl Into<String>, icon: IconRef) -> Self {
        Category {
            id,
            label: label.into(),
            icon,
        }
    }

    /// Case-insensitive label comparison
    pub fn has_label(&self, label: &str) -> bool {
        self.label.trim().to_lowercase() == label.trim().to_lowercase()
    }

    pub fn is_other(&self) -> bool {
        self.has_label(OTHER_LABEL)
    }
}

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

/// Ordered, append-only set of categories for one session
///
/// Insertion order is display order (and chart order). There is no update or
/// delete; the only way membership shrinks is `replace`, which models a reload.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        CategoryRegistry {
            categories: Vec::new(),
        }
    }

    /// Registry seeded with the stock categories
    ///
    /// Labels match the set the categorization flow answers with, so AI
    /// suggestions reconcile without any translation step.
    pub fn with_defaults() -> Self {
        CategoryRegistry {
            categories: default_categories(),
        }
    }

    /// Build a registry from explicit configuration
    pub fn from_categories(categories: Vec<Category>) -> AppResult<Self> {
        let mut registry = CategoryRegistry::new();
        for category in categories {
            registry.insert(category)?;
        }
        Ok(registry)
    }

    /// Create a category with a fresh id
    ///
    /// Fails with `DuplicateCategory` if the label is already taken (ignoring
    /// case), leaving the registry untouched.
    pub fn create(&mut self, label: &str, icon: IconRef) -> AppResult<Category> {
        let label = label.trim();
        if self.find_by_label(label).is_some() {
            return Err(AppError::DuplicateCategory(label.to_string()));
        }

        let category = Category::new(self.next_id()?, label, icon);
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Insert a category that already carries an id (configuration seeds)
    pub fn insert(&mut self, category: Category) -> AppResult<()> {
        if self.find_by_label(&category.label).is_some() {
            return Err(AppError::DuplicateCategory(category.label));
        }
        if self.contains(category.id) {
            return Err(AppError::Config(format!(
                "category id {} is used twice",
                category.id
            )));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Swap in a reloaded category list
    pub fn replace(&mut self, categories: Vec<Category>) -> AppResult<()> {
        *self = CategoryRegistry::from_categories(categories)?;
        Ok(())
    }

    /// All categories in insertion order
    pub fn list_all(&self) -> &[Category] {
        &self.categories
    }

    pub fn find<P>(&self, predicate: P) -> Option<&Category>
    where
        P: Fn(&Category) -> bool,
    {
        self.categories.iter().find(|c| predicate(c))
    }

    /// Find category by label (exact match, case-insensitive)
    pub fn find_by_label(&self, label: &str) -> Option<&Category> {
        self.find(|c| c.has_label(label))
    }

    pub fn find_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.find(|c| c.id == id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// The well-known fallback category, if this registry has one
    pub fn other(&self) -> Option<&Category> {
        self.find(Category::is_other)
    }

    /// Label for an id, for display and export
    pub fn label_of(&self, id: CategoryId) -> Option<&str> {
        self.find_by_id(id).map(|c| c.label.as_str())
    }

    pub fn count(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Time-based id that still sorts after every id handed out so far
    fn next_id(&self) -> AppResult<CategoryId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let highest = self.categories.iter().map(|c| c.id.0).max().unwrap_or(0);
        let after_highest = highest
            .checked_add(1)
            .ok_or_else(|| AppError::Config(format!("category id {} leaves no room for new ids", highest)))?;
        Ok(CategoryId(now.max(after_highest)))
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new(CategoryId(1), "Food", IconRef::Utensils),
        Category::new(CategoryId(2), "Transport", IconRef::Car),
        Category::new(CategoryId(3), "Rent", IconRef::Home),
        Category::new(CategoryId(4), "Utilities", IconRef::Bolt),
        Category::new(CategoryId(5), "Entertainment", IconRef::Film),
        Category::new(CategoryId(6), OTHER_LABEL, IconRef::CircleDollarSign),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = CategoryRegistry::with_defaults();

        assert_eq!(registry.count(), 6);
        let labels: Vec<&str> = registry.list_all().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Food", "Transport", "Rent", "Utilities", "Entertainment", "Other"]
        );
        assert!(registry.other().is_some());
    }

    #[test]
    fn test_create_appends_in_order() {
        let mut registry = CategoryRegistry::with_defaults();

        let travel = registry.create("Travel", IconRef::Plane).unwrap();

        assert_eq!(registry.count(), 7);
        assert_eq!(registry.list_all().last().unwrap().id, travel.id);
        assert_eq!(travel.icon, IconRef::Plane);
    }

    #[test]
    fn test_create_duplicate_is_rejected_case_insensitively() {
        let mut registry = CategoryRegistry::with_defaults();
        let before = registry.list_all().to_vec();

        let result = registry.create("  fOOd ", IconRef::Coffee);

        assert!(matches!(result, Err(AppError::DuplicateCategory(label)) if label == "fOOd"));
        assert_eq!(registry.list_all(), before.as_slice());
    }

    #[test]
    fn test_fresh_ids_never_collide() {
        let mut registry = CategoryRegistry::new();
        registry
            .insert(Category::new(CategoryId(u64::MAX - 10), "Future", IconRef::Gift))
            .unwrap();

        let a = registry.create("Pets", IconRef::PawPrint).unwrap();
        let b = registry.create("Music", IconRef::Music).unwrap();

        assert_eq!(a.id, CategoryId(u64::MAX - 9));
        assert_eq!(b.id, CategoryId(u64::MAX - 8));
    }

    #[test]
    fn test_fresh_ids_are_monotonic() {
        let mut registry = CategoryRegistry::with_defaults();

        let ids: Vec<CategoryId> = (0..5)
            .map(|i| registry.create(&format!("Custom {}", i), IconRef::Heart).unwrap().id)
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids[0] > CategoryId(6));
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() {
        let mut registry = CategoryRegistry::from_categories(vec![Category::new(
            CategoryId(u64::MAX),
            "Food",
            IconRef::Utensils,
        )])
        .unwrap();

        let result = registry.create("Travel", IconRef::Plane);

        assert!(matches!(result, Err(AppError::Config(_))));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_find_by_label_and_id() {
        let registry = CategoryRegistry::with_defaults();

        let transport = registry.find_by_label("TRANSPORT").unwrap();
        assert_eq!(transport.id, CategoryId(2));
        assert_eq!(registry.find_by_id(CategoryId(2)).unwrap().label, "Transport");
        assert_eq!(registry.label_of(CategoryId(3)), Some("Rent"));
        assert!(registry.find_by_label("Groceries").is_none());
        assert!(!registry.contains(CategoryId(99)));
    }

    #[test]
    fn test_from_categories_rejects_duplicates() {
        let result = CategoryRegistry::from_categories(vec![
            Category::new(CategoryId(1), "Food", IconRef::Utensils),
            Category::new(CategoryId(2), "food", IconRef::Coffee),
        ]);
        assert!(matches!(result, Err(AppError::DuplicateCategory(_))));

        let result = CategoryRegistry::from_categories(vec![
            Category::new(CategoryId(1), "Food", IconRef::Utensils),
            Category::new(CategoryId(1), "Rent", IconRef::Home),
        ]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_icon_from_unknown_name_falls_back() {
        assert_eq!(IconRef::from_name("Plane"), IconRef::Plane);
        assert_eq!(IconRef::from_name("Rocket"), IconRef::CircleDollarSign);
    }

    #[test]
    fn test_category_id_serializes_as_number() {
        let category = Category::new(CategoryId(4), "Utilities", IconRef::Bolt);
        let json = serde_json::to_value(&category).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["icon"], "Bolt");
        assert_eq!("17".parse::<CategoryId>().unwrap(), CategoryId(17));
    }
}
