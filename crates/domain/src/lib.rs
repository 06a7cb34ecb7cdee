//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod listing;
mod navigation;
mod permission;
mod resource;
mod transfer_list;

pub use assignment::AssignmentTarget;
pub use listing::{ListPage, ListQuery, ResourceRow, SortDirection};
pub use navigation::{NavigationEntry, NavigationMenu, Sidebar};
pub use permission::{Keyed, PermissionId, PermissionRecord};
pub use resource::{AdminResource, ResourceAction};
pub use transfer_list::{
    PaneSelection, SelectAllState, TransferList, TransferSide, difference, intersection, union,
};
