mod loader;

pub use loader::{ApiSettings, Settings, SourcingSettings, get_default_config, load_configuration, write_config_to};
