//! Core domain types
//!
//! Pure data structures and decision logic for the menu pipeline and the
//! access pipeline - no I/O.

pub mod filter;
pub mod layout;
pub mod menu;
pub mod navigation;
pub mod query;
pub mod result;
pub mod session;
mod user;

pub use filter::{
    apply_menu_filter, filter_menu_categories, filter_menu_items, DietaryFilter, FilterMode,
    SectionFilter,
};
pub use layout::{select_layout, LayoutKind, RouteKind};
pub use menu::{normalize_categories, DietaryInfoShape, MenuCategory, MenuItem};
pub use navigation::{can_access_route, get_navigation_for_role, LinkTarget, NavItem, NavSection};
pub use query::{
    decode_component, extract_query_params, first_param, QueryParams, QueryProvider, QueryValue,
};
pub use session::{AuthHeader, GuardState, RouteGuard, SessionState};
pub use user::{Role, User};
