//! Writer configuration and format constants

/// Game type code for Hex
pub const HEX_GAME_TYPE: i64 = 11;

/// Format version written to every record
pub const FORMAT_VERSION: &str = "4";

/// Column budget for wrapped output
pub const DEFAULT_LINE_WIDTH: usize = 72;

/// Application name written to the AP property
pub const DEFAULT_APPLICATION: &str = "hexsgf";

/// Serializer settings
#[derive(Clone, Debug)]
pub struct WriterConfig {
    /// Application name half of the AP property
    pub application: String,
    /// Version half of the AP property
    pub version: String,
    /// Tokens are wrapped onto a new line past this many characters
    pub line_width: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            application: DEFAULT_APPLICATION.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl WriterConfig {
    /// Set the application identifier
    pub fn with_application(mut self, name: &str, version: &str) -> Self {
        self.application = name.to_string();
        self.version = version.to_string();
        self
    }

    /// Set the wrapping column
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Value of the AP property: "name:version"
    pub fn application_id(&self) -> String {
        format!("{}:{}", self.application, self.version)
    }
}
