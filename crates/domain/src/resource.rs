use std::fmt::{Display, Formatter};
use std::str::FromStr;

use backoffice_core::AppError;
use serde::{Deserialize, Serialize};

/// Gated row or toolbar action of an admin list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAction {
    /// Create button above the table.
    Create,
    /// Edit action of one row.
    Update,
    /// Delete action of one row.
    Delete,
}

impl ResourceAction {
    /// Returns the verb used in permission names.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

/// Entity collections managed by the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminResource {
    /// Catalog products.
    Products,
    /// Product categories.
    Categories,
    /// Product specifications.
    Specifications,
    /// Home page banners.
    Banners,
    /// Welcome sections.
    Welcome,
    /// Mission blocks.
    Missions,
    /// Solution blocks.
    Solutions,
    /// History-of-development blocks.
    Developments,
    /// "Why choose us" blocks.
    ChooseUs,
    /// Warranty terms.
    Warranties,
    /// Staff accounts.
    Users,
    /// Access roles.
    Roles,
    /// Permission catalog.
    Permissions,
}

impl AdminResource {
    /// Returns every resource in sidebar order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AdminResource] = &[
            AdminResource::Products,
            AdminResource::Categories,
            AdminResource::Specifications,
            AdminResource::Banners,
            AdminResource::Welcome,
            AdminResource::Missions,
            AdminResource::Solutions,
            AdminResource::Developments,
            AdminResource::ChooseUs,
            AdminResource::Warranties,
            AdminResource::Users,
            AdminResource::Roles,
            AdminResource::Permissions,
        ];

        ALL
    }

    /// Returns the stable command-line value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Specifications => "specifications",
            Self::Banners => "banners",
            Self::Welcome => "welcome",
            Self::Missions => "missions",
            Self::Solutions => "solutions",
            Self::Developments => "developments",
            Self::ChooseUs => "choose-us",
            Self::Warranties => "warranties",
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
        }
    }

    /// Returns the backend list endpoint, relative to the API base URL.
    #[must_use]
    pub fn list_path(&self) -> &'static str {
        match self {
            Self::Products => "/products/",
            Self::Categories => "/categories/",
            // Backend route keeps its historical spelling.
            Self::Specifications => "/spicifications/",
            Self::Banners => "/banners/",
            Self::Welcome => "/welcome/",
            Self::Missions => "/missions/",
            Self::Solutions => "/solutions/",
            Self::Developments => "/industry/",
            Self::ChooseUs => "/choose-us/",
            Self::Warranties => "/warranties/",
            Self::Users => "/users/",
            Self::Roles => "/roles/",
            Self::Permissions => "/permissions/",
        }
    }

    /// Returns the display title of the list screen.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Specifications => "Specifications",
            Self::Banners => "Banners",
            Self::Welcome => "Welcome",
            Self::Missions => "Missions",
            Self::Solutions => "Solutions",
            Self::Developments => "History of Development",
            Self::ChooseUs => "Choose Us",
            Self::Warranties => "Warranties",
            Self::Users => "Users",
            Self::Roles => "Roles",
            Self::Permissions => "Permissions",
        }
    }

    /// Returns the noun the backend uses in this resource's permission names.
    ///
    /// These are matched verbatim by the gate, including casing quirks.
    #[must_use]
    pub fn permission_noun(&self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Specifications => "Specifications",
            Self::Banners => "banners",
            Self::Welcome => "Welcomes",
            Self::Missions => "Missions",
            Self::Solutions => "Solutions",
            Self::Developments => "Industries",
            Self::ChooseUs => "Choose Us",
            Self::Warranties => "Warranties",
            Self::Users => "Users",
            Self::Roles => "Roles",
            Self::Permissions => "Permissions",
        }
    }

    /// Returns the permission name gating `action`, e.g. `Delete Users`.
    #[must_use]
    pub fn permission_name(&self, action: ResourceAction) -> String {
        format!("{} {}", action.verb(), self.permission_noun())
    }
}

impl Display for AdminResource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for AdminResource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.as_str() == normalized)
            .ok_or_else(|| AppError::Validation(format!("unknown resource '{value}'")))
    }
}
