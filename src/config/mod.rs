pub mod settings;

pub use settings::{LogSettings, OpenAiSettings, QaSettings, ServerSettings, Settings};
