//! qrstamp runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::{MAX_MODULE_SIZE, QrColor, QrColors, QrEncoder};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// URL encoded when none is given on the command line
pub const DEFAULT_URL: &str = "https://github.com/kaw393939";

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrStampConfig {
    /// Where and under which name images are written
    pub output: OutputOptions,
    /// How QR codes are rendered
    pub render: RenderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File this configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl QrStampConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults,
    /// then apply `QRSTAMP_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrstamp.toml", "qrstamp.yaml", "qrstamp.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrstamp");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        let mut config: Self = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            })?,
            other => {
                return Err(Error::Config(format!(
                    "Unsupported config format '{}', expected toml/yaml",
                    other
                )));
            }
        };

        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply overrides looked up by variable name (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.output.apply_overrides(&lookup);
        self.render.apply_overrides(&lookup)?;
        self.logging.apply_overrides(&lookup);
        Ok(())
    }

    /// Check settings that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.render.validate()
    }
}

/// Output directory and file naming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory receiving generated images, created on demand
    pub directory: PathBuf,
    /// File name prefix placed before the timestamp
    pub file_prefix: String,
    /// chrono strftime pattern for the timestamp part of the file name
    pub timestamp_format: String,
    /// File extension, which also selects the image format
    pub extension: String,
    /// URL used when none is supplied on the command line
    pub default_url: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("qr_codes"),
            file_prefix: "QRCode".to_string(),
            timestamp_format: "%Y%m%d%H%M%S".to_string(),
            extension: "png".to_string(),
            default_url: DEFAULT_URL.to_string(),
        }
    }
}

impl OutputOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QRSTAMP_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.directory = PathBuf::from(dir);
            }
        }
        if let Some(url) = lookup("QRSTAMP_DEFAULT_URL") {
            self.default_url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "Invalid timestamp format '{}'",
                self.timestamp_format
            )));
        }
        let sample = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        if let Some(sample) = sample {
            let mut stamp = String::new();
            if write!(stamp, "{}", sample.format(&self.timestamp_format)).is_err()
                || stamp.contains(['/', '\\'])
            {
                return Err(Error::Config(format!(
                    "Timestamp format '{}' must not produce path separators",
                    self.timestamp_format
                )));
            }
        }
        if self.file_prefix.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "File prefix '{}' must not contain path separators",
                self.file_prefix
            )));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "Invalid file extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}

/// Rendering options merged into a [`QrEncoder`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Color of the dark modules
    pub fill_color: QrColor,
    /// Background color
    pub back_color: QrColor,
    /// Error correction level
    pub ec_level: ErrorCorrection,
    /// Edge length of one module in pixels
    pub module_size: u32,
    /// Draw the quiet zone border
    pub quiet_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fill_color: QrColor::BLACK,
            back_color: QrColor::WHITE,
            ec_level: ErrorCorrection::Medium,
            module_size: 10,
            quiet_zone: true,
        }
    }
}

impl RenderOptions {
    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(color) = lookup("QRSTAMP_FILL_COLOR") {
            self.fill_color = color.parse().map_err(Error::Config)?;
        }
        if let Some(color) = lookup("QRSTAMP_BACK_COLOR") {
            self.back_color = color.parse().map_err(Error::Config)?;
        }
        if let Some(level) = lookup("QRSTAMP_EC_LEVEL") {
            if let Ok(parsed) = level.parse::<ErrorCorrection>() {
                self.ec_level = parsed;
            }
        }
        if let Some(size) = lookup("QRSTAMP_MODULE_SIZE") {
            if let Ok(value) = size.parse::<u32>() {
                self.module_size = value.max(1);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.fill_color == self.back_color {
            return Err(Error::Config(format!(
                "Fill and background colors must differ (both are {})",
                self.fill_color
            )));
        }
        if !(1..=MAX_MODULE_SIZE).contains(&self.module_size) {
            return Err(Error::Config(format!(
                "Module size must be between 1 and {MAX_MODULE_SIZE}, got {}",
                self.module_size
            )));
        }
        Ok(())
    }

    /// Fill and background colors as a pair.
    pub fn colors(&self) -> QrColors {
        QrColors::new(self.fill_color, self.back_color)
    }

    /// Build an encoder carrying these settings.
    pub fn to_encoder(&self) -> QrEncoder {
        QrEncoder::new()
            .with_colors(self.colors())
            .with_ecc_level(self.ec_level.into())
            .with_module_size(self.module_size)
            .with_quiet_zone(self.quiet_zone)
    }
}

/// QR error correction levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// Recovers about 7% of the symbol
    Low,
    /// Recovers about 15% of the symbol
    Medium,
    /// Recovers about 25% of the symbol
    Quartile,
    /// Recovers about 30% of the symbol
    High,
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            _ => Err(format!(
                "Unsupported error correction level '{value}', expected low/medium/quartile/high"
            )),
        }
    }
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSTAMP_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing logs
    pub file: Option<PathBuf>,
    /// ANSI colors on the console
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QRSTAMP_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("QRSTAMP_LOG_FILE") {
            self.file = if file.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }
        if let Some(color) = lookup("QRSTAMP_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Some(rotation) = lookup("QRSTAMP_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}
