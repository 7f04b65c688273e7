//! Menu domain model and payload normalization
//!
//! The menu endpoint is loosely typed: the payload may be a list of
//! categories or a single category, scalar fields may be missing or numeric,
//! and `dietaryInfo` arrives either as an array or as one delimited string
//! depending on the backend version. Everything here turns that into the
//! fixed `MenuCategory`/`MenuItem` shape without failing.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::user::scalar_to_string;

/// Image used for categories that have no dedicated artwork
pub const DEFAULT_CATEGORY_IMAGE: &str = "/assets/indian_food_restaura_c34cc8a9.jpg";

/// Category artwork, keyed by exact category title
const CATEGORY_IMAGES: &[(&str, &str)] = &[
    ("Appetizers - Non Veg", "/assets/indian_samosa_appeti_6d10c724.jpg"),
    ("Tandoori Festive", "/assets/indian_tandoori_chic_cd3959b8.jpg"),
    ("Biryani", "/assets/biryani_rice_indian__684c1c84.jpg"),
    ("From the Mt. Everest Base Camp", "/assets/nepalese_momos_dumpl_64e121a7.jpg"),
    ("Tandoori Naan (Bread)", "/assets/indian_naan_bread_ga_ecb9a097.jpg"),
];

/// Look up the artwork for a category title (exact match)
pub fn category_image(title: &str) -> &'static str {
    CATEGORY_IMAGES
        .iter()
        .find(|(t, _)| *t == title)
        .map(|(_, image)| *image)
        .unwrap_or(DEFAULT_CATEGORY_IMAGE)
}

/// A single dish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display price, already formatted by the backend
    pub price: String,
    /// Free-text grouping, loosely related to the category title
    pub category: String,
    /// Non-empty trimmed tags such as "Vegan" or "GF"
    pub dietary_info: Vec<String>,
}

/// A titled group of dishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub items: Vec<MenuItem>,
}

/// Accepted shapes of the `dietaryInfo` field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DietaryInfoShape<'a> {
    /// `["Vegan", "GF"]`
    List(&'a [JsonValue]),
    /// `"Vegan, GF"` or `"Vegan; GF"`
    Delimited(&'a str),
    /// Missing, null, or any other JSON type
    Unsupported,
}

impl<'a> DietaryInfoShape<'a> {
    pub fn of(value: Option<&'a JsonValue>) -> Self {
        match value {
            Some(JsonValue::Array(entries)) => DietaryInfoShape::List(entries),
            Some(JsonValue::String(text)) => DietaryInfoShape::Delimited(text),
            _ => DietaryInfoShape::Unsupported,
        }
    }

    pub fn into_tags(self) -> Vec<String> {
        match self {
            DietaryInfoShape::List(entries) => parse_dietary_list(entries),
            DietaryInfoShape::Delimited(text) => parse_dietary_delimited(text),
            DietaryInfoShape::Unsupported => Vec::new(),
        }
    }
}

/// Array form: keep string entries, trimmed, dropping blank ones.
/// Non-string entries are dropped.
pub fn parse_dietary_list(entries: &[JsonValue]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.as_str())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn separator_re() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,;]").unwrap())
}

/// Delimited form: split on `,` or `;`, trim, drop empty parts
pub fn parse_dietary_delimited(text: &str) -> Vec<String> {
    separator_re()
        .split(text)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a decoded menu response into a list of raw categories:
/// arrays pass through, a bare object becomes a one-element list, anything
/// else is empty.
pub fn payload_to_raw_categories(payload: JsonValue) -> Vec<JsonValue> {
    match payload {
        JsonValue::Array(categories) => categories,
        JsonValue::Object(category) => vec![JsonValue::Object(category)],
        _ => Vec::new(),
    }
}

fn text_field(obj: Option<&Map<String, JsonValue>>, key: &str) -> String {
    obj.and_then(|o| o.get(key))
        .map(scalar_to_string)
        .unwrap_or_default()
}

/// Normalize one raw item; non-object input yields an all-empty item
pub fn normalize_item(raw: &JsonValue) -> MenuItem {
    let obj = raw.as_object();
    MenuItem {
        id: text_field(obj, "id"),
        name: text_field(obj, "name"),
        description: text_field(obj, "description"),
        price: text_field(obj, "price"),
        category: text_field(obj, "category"),
        dietary_info: DietaryInfoShape::of(obj.and_then(|o| o.get("dietaryInfo"))).into_tags(),
    }
}

/// Normalize one raw category, resolving its artwork from the title
pub fn normalize_category(raw: &JsonValue) -> MenuCategory {
    let obj = raw.as_object();
    let title = text_field(obj, "title");
    let items = match obj.and_then(|o| o.get("items")) {
        Some(JsonValue::Array(items)) => items.iter().map(normalize_item).collect(),
        _ => Vec::new(),
    };

    MenuCategory {
        image: category_image(&title).to_string(),
        subtitle: text_field(obj, "subtitle"),
        title,
        items,
    }
}

pub fn normalize_categories(raw: &[JsonValue]) -> Vec<MenuCategory> {
    raw.iter().map(normalize_category).collect()
}
