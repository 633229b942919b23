use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_STORE_URL: &str = "https://hffebrjtrzopihuffrxv.supabase.co";
pub const DEFAULT_PROFILE_TABLE: &str = "users";
pub const DEFAULT_ID_COLUMN: &str = "uuid";
pub const DEFAULT_THEME_ATTRIBUTE: &str = "data-theme";
pub const DEFAULT_BRAND_TITLE: &str = "Pinterest";
pub const DEFAULT_LOGO_URL: &str =
    "https://hffebrjtrzopihuffrxv.supabase.co/storage/v1/object/public/assets/pinterest-logo.png";

/// Settings handed over by the shell in `Event::Started`. Missing fields
/// fall back to the defaults above.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile_store: ProfileStoreConfig,
    pub brand: Brand,
    /// Root attribute that carries the theme for signed-out users.
    pub theme_attribute: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_store: ProfileStoreConfig::default(),
            brand: Brand::default(),
            theme_attribute: DEFAULT_THEME_ATTRIBUTE.to_owned(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStoreConfig {
    pub base_url: String,
    /// Public anon key of the project.
    pub api_key: String,
    pub table: String,
    pub id_column: String,
}

impl Default for ProfileStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_owned(),
            api_key: String::new(),
            table: DEFAULT_PROFILE_TABLE.to_owned(),
            id_column: DEFAULT_ID_COLUMN.to_owned(),
        }
    }
}

impl fmt::Debug for ProfileStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key_present", &!self.api_key.is_empty())
            .field("table", &self.table)
            .field("id_column", &self.id_column)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    pub title: String,
    pub logo_url: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            title: DEFAULT_BRAND_TITLE.to_owned(),
            logo_url: DEFAULT_LOGO_URL.to_owned(),
        }
    }
}
