mod settings;

pub use settings::{ClientOptions, ProviderKind};
