use crate::error::PipelineError;
use crate::pipeline::BatchLimits;
use crate::render::ImagePolicy;
use docmerge_resource::{StagingArea, sweep_dir};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a TOML settings file.
pub const CONFIG_PATH_VAR: &str = "DOCMERGE_CONFIG";
const ENV_PREFIX: &str = "DOCMERGE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub limits: BatchLimits,
    pub staging: StagingSettings,
    pub output: OutputSettings,
    pub image: ImagePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingSettings {
    pub dir: PathBuf,
    /// Staged files at least this old are removed by a sweep.
    pub max_age_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_age_secs: 60 * 60,
            sweep_interval_secs: 30 * 60,
        }
    }
}

impl StagingSettings {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where merged PDFs go when no explicit output path is given.
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("downloads"),
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file, then layers `DOCMERGE__*`
    /// environment variables on top (for example
    /// `DOCMERGE__LIMITS__MAX_FILES=5`). Missing keys keep their defaults.
    ///
    /// Without an explicit `path`, the file named by `DOCMERGE_CONFIG` is
    /// used if that variable is set.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let from_env = std::env::var_os(CONFIG_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let path = path.map(Path::to_path_buf).or(from_env);

        let mut builder = config::Config::builder();
        if let Some(path) = &path {
            log::debug!("Loading settings from {}", path.display());
            builder = builder.add_source(
                config::File::from(path.as_path()).format(config::FileFormat::Toml),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Removes files older than `staging.max_age_secs` from both the
    /// staging directory and the output directory. Returns the number removed.
    pub fn sweep_stale_files(&self) -> Result<usize, PipelineError> {
        let max_age = self.staging.max_age();
        let staged = StagingArea::new(&self.staging.dir)?.sweep(max_age)?;
        let outputs = sweep_dir(&self.output.dir, max_age)?;
        log::info!(
            "Swept {} staged and {} output file(s) older than {}s",
            staged,
            outputs,
            self.staging.max_age_secs
        );
        Ok(staged + outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_service_limits() {
        let settings = Settings::default();
        assert_eq!(settings.limits.max_files, 20);
        assert_eq!(settings.limits.max_file_bytes, 52_428_800);
        assert_eq!(settings.staging.dir, PathBuf::from("uploads"));
        assert_eq!(settings.staging.max_age(), Duration::from_secs(3600));
        assert_eq!(settings.staging.sweep_interval(), Duration::from_secs(1800));
        assert_eq!(settings.output.dir, PathBuf::from("downloads"));
        assert_eq!(settings.image.margin, 40.0);
    }

    #[test]
    fn toml_file_overrides_selected_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[limits]\nmax_files = 3\n\n[staging]\ndir = \"/tmp/stage\"\n\n[image]\nmargin = 20.0\n\n[image.base]\nmax_width = 800\nquality = 60"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.limits.max_files, 3);
        assert_eq!(settings.limits.max_file_bytes, 52_428_800);
        assert_eq!(settings.staging.dir, PathBuf::from("/tmp/stage"));
        assert_eq!(settings.staging.max_age_secs, 3600);
        assert_eq!(settings.image.margin, 20.0);
        assert_eq!(settings.image.base.max_width, 800);
        assert_eq!(settings.image.tiers.len(), 2);
    }

    #[test]
    fn sweep_covers_staging_and_output_directories() {
        let root = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.staging.dir = root.path().join("uploads");
        settings.output.dir = root.path().join("downloads");
        std::fs::create_dir_all(&settings.staging.dir).unwrap();
        std::fs::create_dir_all(&settings.output.dir).unwrap();
        let staged = settings.staging.dir.join("orphan.txt");
        let merged = settings.output.dir.join("1700000000000-converted.pdf");
        std::fs::write(&staged, b"left behind").unwrap();
        std::fs::write(&merged, b"%PDF").unwrap();

        assert_eq!(settings.sweep_stale_files().unwrap(), 0);
        assert!(merged.exists());

        settings.staging.max_age_secs = 0;
        assert_eq!(settings.sweep_stale_files().unwrap(), 2);
        assert!(!staged.exists());
        assert!(!merged.exists());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
