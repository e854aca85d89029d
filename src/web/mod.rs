//! Web server module
//!
//! Serves the settings page, the bar and the userscript header, plus a JSON API
//! over the same resolution pipeline.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
