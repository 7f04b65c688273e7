//! Role-based navigation
//!
//! There is one ordered catalog of sections. A role's navigation is the
//! catalog with every item the role may not see removed, and sections left
//! empty dropped. An item's `allowed_roles` is therefore the single source
//! of truth for both rendering and `can_access_route`.

use serde::Serialize;

use super::user::Role::{self, Admin, Provider, User};

/// Browsing context a link opens in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkTarget {
    #[serde(rename = "_blank")]
    Blank,
    #[serde(rename = "_self")]
    SelfFrame,
    #[serde(rename = "_parent")]
    Parent,
    #[serde(rename = "_top")]
    Top,
}

/// A navigation link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    /// Icon name, resolved by the presentation layer
    pub icon: &'static str,
    /// Empty means public
    pub allowed_roles: &'static [Role],
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<LinkTarget>,
}

impl NavItem {
    const fn new(
        name: &'static str,
        href: &'static str,
        icon: &'static str,
        allowed_roles: &'static [Role],
        description: &'static str,
    ) -> Self {
        Self { name, href, icon, allowed_roles, description, target: None }
    }

    const fn opens_in(self, target: LinkTarget) -> Self {
        Self { target: Some(target), ..self }
    }

    pub fn is_public(&self) -> bool {
        self.allowed_roles.is_empty()
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.is_public() || self.allowed_roles.contains(&role)
    }
}

/// A titled group of links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub items: Vec<NavItem>,
}

const SIGNED_IN: &[Role] = &[User, Provider, Admin];
const MEMBERS: &[Role] = &[User, Provider];
const PROVIDERS: &[Role] = &[Provider, Admin];
const ADMINS: &[Role] = &[Admin];
const PUBLIC: &[Role] = &[];

const DASHBOARD: &[NavItem] = &[
    NavItem::new("Dashboard", "/dashboard", "User", MEMBERS, "Manage your requests"),
    NavItem::new("Dashboard", "/dashboard", "Shield", ADMINS, "Admin overview"),
];

const ADMIN_PANEL: &[NavItem] = &[
    NavItem::new("Authority Requests", "/admin/authority-requests", "Shield", ADMINS, "Review authority information requests"),
    NavItem::new("User Management", "/admin/users", "Users", ADMINS, "Manage all users"),
    NavItem::new("Content Management", "/admin/content", "FileText", ADMINS, "Manage content"),
    NavItem::new("Service Management", "/admin/services", "Briefcase", ADMINS, "Manage all services"),
    NavItem::new("Event Management", "/admin/events", "Calendar", ADMINS, "Manage events"),
    NavItem::new("Group Management", "/admin/groups", "Users", ADMINS, "Manage groups"),
    NavItem::new("Analytics", "/admin/analytics", "BarChart3", ADMINS, "System analytics").opens_in(LinkTarget::Blank),
    NavItem::new("System Settings", "/admin/settings", "Settings", ADMINS, "System configuration").opens_in(LinkTarget::Blank),
    NavItem::new("Database", "/admin/database", "Database", ADMINS, "Database management").opens_in(LinkTarget::Blank),
    NavItem::new("Reports", "/admin/reports", "AlertTriangle", ADMINS, "System reports").opens_in(LinkTarget::Blank),
];

const PROVIDER_PANEL: &[NavItem] = &[
    NavItem::new("Service Management", "/service-management", "Briefcase", PROVIDERS, "Manage your services"),
    NavItem::new("Bookings", "/bookings", "Calendar", PROVIDERS, "Manage bookings"),
    NavItem::new("Customers", "/customers", "Users", PROVIDERS, "Your customers"),
    NavItem::new("Advertisements", "/advertisements", "Megaphone", PROVIDERS, "Manage ads"),
    NavItem::new("Analytics", "/analytics", "TrendingUp", PROVIDERS, "Service analytics").opens_in(LinkTarget::Blank),
    NavItem::new("Reviews", "/reviews", "Star", PROVIDERS, "Customer reviews").opens_in(LinkTarget::Blank),
];

const COMMUNITY: &[NavItem] = &[
    NavItem::new("Home", "/", "Home", PUBLIC, "Home page").opens_in(LinkTarget::Blank),
    NavItem::new("Community Feed", "/community-feed", "Heart", PUBLIC, "Find help requests").opens_in(LinkTarget::Blank),
    NavItem::new("Stories", "/stories", "BookOpen", PUBLIC, "Read success stories").opens_in(LinkTarget::Blank),
    NavItem::new("News & Events", "/news-events", "Calendar", PUBLIC, "Browse community news and events").opens_in(LinkTarget::Blank),
    NavItem::new("Groups", "/groups", "Users", PUBLIC, "Join community groups").opens_in(LinkTarget::Blank),
];

const MANAGEMENT: &[NavItem] = &[
    NavItem::new("My Stories", "/my-stories", "PenTool", SIGNED_IN, "Manage your stories"),
    NavItem::new("My Events", "/my-events", "CalendarDays", SIGNED_IN, "Events you participate in"),
    NavItem::new("My Requests", "/my-requests", "Target", SIGNED_IN, "Your help requests and tasks"),
    NavItem::new("My Tasks", "/enhanced-provider-dashboard", "Briefcase", PROVIDERS, "Your accepted tasks and offers"),
    NavItem::new("My Activities", "/activity", "Activity", SIGNED_IN, "Your activity history"),
    NavItem::new("My Documents", "/documents", "FileText", SIGNED_IN, "Manage your documents and certificates"),
    NavItem::new("KYC Verification", "/kyc-verification", "Shield", MEMBERS, "Verify your identity"),
];

/// Every section, in display order
const CATALOG: &[(&str, &[NavItem])] = &[
    ("Dashboard", DASHBOARD),
    ("Admin Panel", ADMIN_PANEL),
    ("Provider Panel", PROVIDER_PANEL),
    ("Community", COMMUNITY),
    ("Management", MANAGEMENT),
];

fn all_items() -> impl Iterator<Item = &'static NavItem> {
    CATALOG.iter().flat_map(|(_, items)| items.iter())
}

/// Sections and links visible to `role`, in catalog order
pub fn get_navigation_for_role(role: Role) -> Vec<NavSection> {
    CATALOG
        .iter()
        .filter_map(|(title, items)| {
            let visible: Vec<NavItem> = items.iter().filter(|i| i.visible_to(role)).copied().collect();
            (!visible.is_empty()).then_some(NavSection { title: *title, items: visible })
        })
        .collect()
}

/// Whether `route` is a known link that `role` may open
pub fn can_access_route(route: &str, role: Role) -> bool {
    all_items().any(|item| item.href == route && item.visible_to(role))
}
