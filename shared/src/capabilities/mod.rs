mod appearance;
mod auth;
mod catalog;
mod navigate;
mod profile_store;

pub use self::appearance::{Appearance, AppearanceOperation};
pub use self::auth::{Auth, AuthError, AuthOperation, AuthOutput, AuthResult};
pub use self::catalog::{Catalog, CatalogOperation};
pub use self::navigate::{Navigate, NavigateOperation, Route};
pub use self::profile_store::{ProfileStore, StoreError};

// Render and Http come straight from Crux; the rest are shell bridges
// specific to the header.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub auth: Auth<Event>,
    pub navigate: Navigate<Event>,
    pub appearance: Appearance<Event>,
    pub catalog: Catalog<Event>,
}
