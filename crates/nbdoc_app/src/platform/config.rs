use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;
use nbdoc_core::{DocStyle, Language, StyleLabels, StyleOptions, Tone};
use nbdoc_engine::{
    ensure_output_dir, AtomicFileWriter, CopyTarget, IngestSettings, RenderMode, RequestPolicy,
    ServiceSettings, DEFAULT_BASE_URL,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "nbdoc.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
    Off,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RenderSetting {
    #[default]
    Structured,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub target: LogTarget,
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::default(),
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Contents of `nbdoc.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub max_notebook_bytes: u64,
    pub output_dir: PathBuf,
    /// Raw-text copy destination; `None` copies to stdout.
    pub copy_to: Option<PathBuf>,
    pub render: RenderSetting,
    pub color: bool,
    pub language: String,
    pub doc_style: String,
    pub tone: String,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = RequestPolicy::default();
        Self {
            server_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            max_retries: policy.max_retries,
            retry_backoff_ms: policy.retry_backoff.as_millis() as u64,
            max_notebook_bytes: IngestSettings::default().max_file_bytes,
            output_dir: PathBuf::from("output"),
            copy_to: None,
            render: RenderSetting::default(),
            color: true,
            language: Language::default().as_str().to_string(),
            doc_style: DocStyle::default().as_str().to_string(),
            tone: Tone::default().as_str().to_string(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.server_url.clone(),
            policy: RequestPolicy {
                connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
                max_retries: self.max_retries,
                retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            },
            ..ServiceSettings::default()
        }
    }

    pub fn ingest_settings(&self) -> IngestSettings {
        IngestSettings {
            max_file_bytes: self.max_notebook_bytes,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        match self.render {
            RenderSetting::Structured => RenderMode::Structured,
            RenderSetting::Legacy => RenderMode::Legacy,
        }
    }

    pub fn copy_target(&self) -> CopyTarget {
        self.copy_to
            .clone()
            .map(CopyTarget::File)
            .unwrap_or_default()
    }

    /// Initial style selections. Unknown labels fall back to the default
    /// for that control.
    pub fn style_options(&self) -> StyleOptions {
        StyleOptions {
            language: parse_label(&self.language, "language"),
            doc_style: parse_label(&self.doc_style, "doc_style"),
            tone: parse_label(&self.tone, "tone"),
        }
    }

    /// Tone and doc style labels that name no known value. These keep the
    /// fallback generation parameters until a selection replaces them.
    pub fn style_labels(&self) -> StyleLabels {
        StyleLabels::unrecognized(&self.tone, &self.doc_style)
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log.level).unwrap_or_else(|_| {
            engine_warn!("Unknown log level {:?}; using info", self.log.level);
            LevelFilter::Info
        })
    }
}

fn parse_label<T>(label: &str, field: &str) -> T
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    label.parse().unwrap_or_else(|err| {
        engine_warn!("Config field {}: {}; using default", field, err);
        T::default()
    })
}

pub fn config_path_or_default(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Missing or unreadable configuration is not fatal: defaults are used.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            engine_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<PathBuf> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("config path {path:?} has no file name"))?;
    ensure_output_dir(dir).with_context(|| format!("could not create {dir:?}"))?;

    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(config, pretty).context("could not serialize config")?;

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let written = writer
        .write(file_name, &content)
        .with_context(|| format!("could not write config to {path:?}"))?;
    Ok(written)
}

pub fn init_config(path: Option<PathBuf>) -> Result<PathBuf> {
    save_config(&config_path_or_default(path), &AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbdoc_core::AppState;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("absent.ron"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.service_settings().base_url, "http://localhost:5004");
        assert_eq!(config.service_settings().policy, RequestPolicy::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nbdoc.ron");
        fs::write(&path, "(server_url: 42").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nbdoc.ron");
        fs::write(
            &path,
            "(server_url: \"http://docs.internal:8080\", request_timeout_secs: Some(30), tone: \"casual\")",
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.server_url, "http://docs.internal:8080");
        let policy = config.service_settings().policy;
        assert_eq!(policy.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(policy.max_retries, 0);
        assert_eq!(config.style_options().tone, Tone::Casual);
        assert_eq!(config.style_options().doc_style, DocStyle::Explanatory);
    }

    #[test]
    fn unknown_style_labels_fall_back_per_control() {
        let config = AppConfig {
            language: "klingon".into(),
            tone: "CREATIVE".into(),
            ..AppConfig::default()
        };
        let style = config.style_options();
        assert_eq!(style.language, Language::English);
        assert_eq!(style.tone, Tone::Creative);
    }

    #[test]
    fn unknown_style_labels_submit_fallback_parameters() {
        let config = AppConfig {
            tone: "whimsical".into(),
            doc_style: "epic".into(),
            ..AppConfig::default()
        };
        let state =
            AppState::with_style(config.style_options()).with_labels(config.style_labels());
        let params = state.generation_parameters();
        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_output_tokens, 2048);

        let known = AppState::with_style(AppConfig::default().style_options())
            .with_labels(AppConfig::default().style_labels());
        assert_eq!(known.generation_parameters().temperature, 0.3);
        assert_eq!(known.generation_parameters().max_output_tokens, 3000);
    }

    #[test]
    fn init_config_writes_loadable_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conf").join("nbdoc.ron");
        let written = init_config(Some(path.clone())).unwrap();
        assert_eq!(written, path);
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn copy_target_defaults_to_stdout() {
        assert_eq!(AppConfig::default().copy_target(), CopyTarget::Stdout);
        let config = AppConfig {
            copy_to: Some(PathBuf::from("raw.md")),
            ..AppConfig::default()
        };
        assert_eq!(config.copy_target(), CopyTarget::File(PathBuf::from("raw.md")));
    }
}
