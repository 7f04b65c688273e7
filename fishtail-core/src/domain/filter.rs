//! Menu filters
//!
//! Dietary filters hide individual items by tag content; section filters
//! hide whole categories by title. Both treat `"all"` as the identity
//! filter and never fail on values they don't recognize.
//!
//! Item matching is a case-insensitive substring test over the item's
//! dietary tags. Exact tag equality was rejected because the backend
//! spells tags inconsistently ("Gluten Free", "gluten-free", "GF").

use serde::{Deserialize, Serialize};

use super::menu::{MenuCategory, MenuItem};

/// Filter value meaning "no filtering"
pub const ALL: &str = "all";

/// Dietary preference filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryFilter {
    All,
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietaryFilter {
    /// Known filters with their display labels, in display order
    pub const ALL_FILTERS: [(DietaryFilter, &'static str); 5] = [
        (DietaryFilter::All, "All"),
        (DietaryFilter::Vegetarian, "Vegetarian"),
        (DietaryFilter::Vegan, "Vegan"),
        (DietaryFilter::GlutenFree, "Gluten-Free"),
        (DietaryFilter::DairyFree, "Dairy-Free"),
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(DietaryFilter::All),
            "vegetarian" => Some(DietaryFilter::Vegetarian),
            "vegan" => Some(DietaryFilter::Vegan),
            "gluten-free" => Some(DietaryFilter::GlutenFree),
            "dairy-free" => Some(DietaryFilter::DairyFree),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryFilter::All => "all",
            DietaryFilter::Vegetarian => "vegetarian",
            DietaryFilter::Vegan => "vegan",
            DietaryFilter::GlutenFree => "gluten-free",
            DietaryFilter::DairyFree => "dairy-free",
        }
    }

    /// Lowercase fragments that mark a tag as satisfying this filter.
    /// Empty for `All`.
    pub fn needles(&self) -> &'static [&'static str] {
        match self {
            DietaryFilter::All => &[],
            DietaryFilter::Vegetarian => &["vegetarian"],
            DietaryFilter::Vegan => &["vegan"],
            DietaryFilter::GlutenFree => &["gluten free", "gluten-free", "gf"],
            DietaryFilter::DairyFree => &["dairy free", "dairy-free", "df"],
        }
    }

    pub fn matches(&self, item: &MenuItem) -> bool {
        if *self == DietaryFilter::All {
            return true;
        }
        let tags = item
            .dietary_info
            .iter()
            .map(|tag| tag.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        self.needles().iter().any(|needle| tags.contains(needle))
    }
}

/// Menu section filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionFilter {
    All,
    Appetizers,
    Tandoori,
    Biryani,
    Everest,
    Bread,
}

impl SectionFilter {
    /// Known sections with their display labels, in display order
    pub const ALL_FILTERS: [(SectionFilter, &'static str); 6] = [
        (SectionFilter::All, "All"),
        (SectionFilter::Appetizers, "Appetizers"),
        (SectionFilter::Tandoori, "Tandoori & Grill"),
        (SectionFilter::Biryani, "Biryani & Rice"),
        (SectionFilter::Everest, "Nepalese Specials"),
        (SectionFilter::Bread, "Bread & Naan"),
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(SectionFilter::All),
            "appetizers" => Some(SectionFilter::Appetizers),
            "tandoori" => Some(SectionFilter::Tandoori),
            "biryani" => Some(SectionFilter::Biryani),
            "everest" => Some(SectionFilter::Everest),
            "bread" => Some(SectionFilter::Bread),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionFilter::All => "all",
            SectionFilter::Appetizers => "appetizers",
            SectionFilter::Tandoori => "tandoori",
            SectionFilter::Biryani => "biryani",
            SectionFilter::Everest => "everest",
            SectionFilter::Bread => "bread",
        }
    }

    /// Lowercase title fragments belonging to this section.
    /// "tandoori festive" rather than "tandoori" keeps the naan category
    /// ("Tandoori Naan (Bread)") out of the grill section.
    pub fn title_fragments(&self) -> &'static [&'static str] {
        match self {
            SectionFilter::All => &[],
            SectionFilter::Appetizers => &["appetizer", "starter"],
            SectionFilter::Tandoori => &["tandoori festive", "grill", "kebab"],
            SectionFilter::Biryani => &["biryani", "rice"],
            SectionFilter::Everest => &["everest", "momo", "nepal"],
            SectionFilter::Bread => &["bread", "naan"],
        }
    }
}

/// How a filter value is applied to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Dietary,
    Section,
}

/// Keep items matching a dietary filter value.
/// `"all"` and unknown values return the input unchanged.
pub fn filter_menu_items(items: &[MenuItem], filter: &str) -> Vec<MenuItem> {
    match DietaryFilter::parse(filter) {
        Some(dietary) if dietary != DietaryFilter::All => items
            .iter()
            .filter(|item| dietary.matches(item))
            .cloned()
            .collect(),
        _ => items.to_vec(),
    }
}

/// Keep categories whose title belongs to a section.
/// `"all"` returns the input unchanged; unknown keys match on the raw key.
pub fn filter_menu_categories(categories: &[MenuCategory], section: &str) -> Vec<MenuCategory> {
    let key = section.trim().to_lowercase();
    if key == ALL {
        return categories.to_vec();
    }

    let fallback = [key.as_str()];
    let fragments: &[&str] = match SectionFilter::parse(&key) {
        Some(known) => known.title_fragments(),
        None => &fallback,
    };

    categories
        .iter()
        .filter(|category| {
            let title = category.title.to_lowercase();
            fragments.iter().any(|fragment| title.contains(fragment))
        })
        .cloned()
        .collect()
}

/// Apply a filter value the way the menu page composes them: section mode
/// drops whole categories, dietary mode keeps every category and filters
/// its items.
pub fn apply_menu_filter(
    categories: &[MenuCategory],
    mode: FilterMode,
    value: &str,
) -> Vec<MenuCategory> {
    match mode {
        FilterMode::Section => filter_menu_categories(categories, value),
        FilterMode::Dietary => categories
            .iter()
            .map(|category| MenuCategory {
                items: filter_menu_items(&category.items, value),
                ..category.clone()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, tags: &[&str]) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Dish {}", id),
            description: String::new(),
            price: "$9.99".to_string(),
            category: String::new(),
            dietary_info: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn category(title: &str) -> MenuCategory {
        MenuCategory {
            title: title.to_string(),
            subtitle: String::new(),
            image: String::new(),
            items: vec![item("1", &["Vegan"]), item("2", &[])],
        }
    }

    fn ids(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn titles(categories: &[MenuCategory]) -> Vec<&str> {
        categories.iter().map(|c| c.title.as_str()).collect()
    }

    fn sample_menu() -> Vec<MenuCategory> {
        vec![
            category("Appetizers - Non Veg"),
            category("Tandoori Festive"),
            category("Biryani"),
            category("From the Mt. Everest Base Camp"),
            category("Tandoori Naan (Bread)"),
        ]
    }

    #[test]
    fn test_all_is_identity_for_items() {
        let items = vec![item("1", &["Vegan"]), item("2", &["Spicy"])];
        assert_eq!(filter_menu_items(&items, "all"), items);
        assert!(filter_menu_items(&[], "all").is_empty());
    }

    #[test]
    fn test_unknown_dietary_filter_is_identity() {
        let items = vec![item("1", &["Vegan"]), item("2", &[])];
        assert_eq!(filter_menu_items(&items, "keto"), items);
    }

    #[test]
    fn test_vegan_filter_is_case_insensitive_substring() {
        let items = vec![
            item("1", &["VEGAN"]),
            item("2", &["Vegan-friendly"]),
            item("3", &["Vegetarian"]),
            item("4", &[]),
        ];
        assert_eq!(ids(&filter_menu_items(&items, "vegan")), vec!["1", "2"]);
    }

    #[test]
    fn test_gluten_and_dairy_free_abbreviations() {
        let items = vec![
            item("1", &["GF"]),
            item("2", &["Gluten Free"]),
            item("3", &["DF", "Spicy"]),
            item("4", &["dairy free"]),
        ];
        assert_eq!(ids(&filter_menu_items(&items, "gluten-free")), vec!["1", "2"]);
        assert_eq!(ids(&filter_menu_items(&items, "dairy-free")), vec!["3", "4"]);
    }

    #[test]
    fn test_all_is_identity_for_categories() {
        let menu = sample_menu();
        assert_eq!(filter_menu_categories(&menu, "all"), menu);
    }

    #[test]
    fn test_known_sections() {
        let menu = sample_menu();
        assert_eq!(titles(&filter_menu_categories(&menu, "tandoori")), vec!["Tandoori Festive"]);
        assert_eq!(
            titles(&filter_menu_categories(&menu, "bread")),
            vec!["Tandoori Naan (Bread)"]
        );
        assert_eq!(
            titles(&filter_menu_categories(&menu, "everest")),
            vec!["From the Mt. Everest Base Camp"]
        );
        assert_eq!(
            titles(&filter_menu_categories(&menu, "appetizers")),
            vec!["Appetizers - Non Veg"]
        );
    }

    #[test]
    fn test_unknown_section_matches_raw_key() {
        let menu = sample_menu();
        assert_eq!(titles(&filter_menu_categories(&menu, "Non Veg")), vec!["Appetizers - Non Veg"]);
        assert!(filter_menu_categories(&menu, "desserts").is_empty());
    }

    #[test]
    fn test_apply_dietary_mode_keeps_categories() {
        let menu = sample_menu();
        let filtered = apply_menu_filter(&menu, FilterMode::Dietary, "vegan");
        assert_eq!(filtered.len(), menu.len());
        assert!(filtered.iter().all(|c| ids(&c.items) == vec!["1"]));
    }

    #[test]
    fn test_filter_parsing_round_trip() {
        for (filter, _) in DietaryFilter::ALL_FILTERS {
            assert_eq!(DietaryFilter::parse(filter.as_str()), Some(filter));
        }
        for (section, _) in SectionFilter::ALL_FILTERS {
            assert_eq!(SectionFilter::parse(section.as_str()), Some(section));
        }
    }
}
