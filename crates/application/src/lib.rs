//! Application services and ports.

#![forbid(unsafe_code)]

mod assignment_screen;
mod notice;
mod ports;
mod resource_list_service;
mod session;
mod token_identity;

pub use assignment_screen::{
    AssignmentScreenController, AssignmentScreenError, ScreenExit, ScreenState,
};
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use ports::{AssignmentRepository, AuthApi, LoginResponse, ResourceRepository, TokenStore};
pub use resource_list_service::{GatedRow, ResourceListService, ResourceListing};
pub use session::Session;
pub use token_identity::{decode_stored_token, decode_token};
