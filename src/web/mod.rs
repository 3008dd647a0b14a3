pub mod admin;
pub mod auth;
pub mod bulletins;
pub mod pages;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;
pub mod uploads;

pub use state::AppState;
pub use templates::render_login_page;
