use serde::{Deserialize, Serialize};

use crate::AdminResource;

/// Collapsible sidebar submenus. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMenu {
    /// Products and specifications.
    Products,
    /// Product categories.
    Categories,
    /// Marketing content blocks.
    Content,
    /// Users, roles and permissions.
    AccessControl,
    /// Own profile.
    Profile,
}

/// Link rendered inside a submenu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Link label.
    pub label: &'static str,
    /// Client route.
    pub route: &'static str,
    /// Resource listed by the target screen, if any.
    pub resource: Option<AdminResource>,
}

const fn entry(
    label: &'static str,
    route: &'static str,
    resource: Option<AdminResource>,
) -> NavigationEntry {
    NavigationEntry {
        label,
        route,
        resource,
    }
}

impl NavigationMenu {
    /// Returns every submenu in sidebar order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Products,
            Self::Categories,
            Self::Content,
            Self::AccessControl,
            Self::Profile,
        ]
    }

    /// Returns the submenu heading.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Content => "Content",
            Self::AccessControl => "Users & Roles",
            Self::Profile => "Profile",
        }
    }

    /// Returns the links listed under this submenu.
    #[must_use]
    pub fn entries(&self) -> &'static [NavigationEntry] {
        match self {
            Self::Products => PRODUCT_ENTRIES,
            Self::Categories => CATEGORY_ENTRIES,
            Self::Content => CONTENT_ENTRIES,
            Self::AccessControl => ACCESS_CONTROL_ENTRIES,
            Self::Profile => PROFILE_ENTRIES,
        }
    }
}

const PRODUCT_ENTRIES: &[NavigationEntry] = &[
    entry("All products", "/product", Some(AdminResource::Products)),
    entry("Add product", "/product/create", None),
    entry(
        "Specifications",
        "/specification",
        Some(AdminResource::Specifications),
    ),
    entry("Warranties", "/warranty", Some(AdminResource::Warranties)),
];

const CATEGORY_ENTRIES: &[NavigationEntry] = &[
    entry("All categories", "/categories", Some(AdminResource::Categories)),
    entry("Add category", "/categories/create", None),
];

const CONTENT_ENTRIES: &[NavigationEntry] = &[
    entry("Banners", "/banner", Some(AdminResource::Banners)),
    entry("Welcome", "/welcome", Some(AdminResource::Welcome)),
    entry("Mission", "/mission", Some(AdminResource::Missions)),
    entry("Solutions", "/solution", Some(AdminResource::Solutions)),
    entry(
        "History of development",
        "/development",
        Some(AdminResource::Developments),
    ),
    entry("Choose us", "/choose-us", Some(AdminResource::ChooseUs)),
];

const ACCESS_CONTROL_ENTRIES: &[NavigationEntry] = &[
    entry("Users", "/users", Some(AdminResource::Users)),
    entry("Roles", "/role", Some(AdminResource::Roles)),
    entry("Permissions", "/permission", Some(AdminResource::Permissions)),
];

const PROFILE_ENTRIES: &[NavigationEntry] = &[
    entry("View profile", "/profile/view", None),
    entry("Edit profile", "/profile/edit", None),
];

/// Sidebar state: which submenu, if any, is expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sidebar {
    open: Option<NavigationMenu>,
}

impl Sidebar {
    /// Opens `menu`, closing any other, or closes it when already open.
    pub fn toggle(&mut self, menu: NavigationMenu) {
        self.open = if self.open == Some(menu) {
            None
        } else {
            Some(menu)
        };
    }

    /// Collapses every submenu.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Returns the expanded submenu.
    #[must_use]
    pub fn open_menu(&self) -> Option<NavigationMenu> {
        self.open
    }

    /// Returns whether `menu` is expanded.
    #[must_use]
    pub fn is_open(&self, menu: NavigationMenu) -> bool {
        self.open == Some(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigationMenu, Sidebar};
    use crate::AdminResource;

    #[test]
    fn opening_a_submenu_closes_the_previous_one() {
        let mut sidebar = Sidebar::default();
        sidebar.toggle(NavigationMenu::Products);
        sidebar.toggle(NavigationMenu::AccessControl);

        assert!(sidebar.is_open(NavigationMenu::AccessControl));
        assert!(!sidebar.is_open(NavigationMenu::Products));
    }

    #[test]
    fn toggling_the_open_submenu_closes_it() {
        let mut sidebar = Sidebar::default();
        sidebar.toggle(NavigationMenu::Profile);
        sidebar.toggle(NavigationMenu::Profile);

        assert_eq!(sidebar.open_menu(), None);
    }

    #[test]
    fn every_resource_is_reachable_from_the_sidebar() {
        for resource in AdminResource::all() {
            let reachable = NavigationMenu::all().iter().any(|menu| {
                menu.entries()
                    .iter()
                    .any(|entry| entry.resource == Some(*resource))
            });
            assert!(reachable, "{resource} has no sidebar entry");
        }
    }
}
