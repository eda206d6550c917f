use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, Parser};
use serde::Deserialize;

use curvepick_match::classifier;

pub const DEFAULT_TRAIN: &str = "data/train.csv";
pub const DEFAULT_IDEAL: &str = "data/ideal.csv";
pub const DEFAULT_TEST: &str = "data/test.csv";
pub const DEFAULT_DATABASE: &str = "output/ideal_functions.db";

/// Match training series to ideal functions and map test data onto them.
#[derive(Debug, Default, Parser)]
#[command(name = "curvepick", version, about, long_about = None)]
pub struct Args {
    /// TOML file with `[data]`, `[output]`, and `[classify]` sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Training data CSV (`x, y1, ..., yN`)
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Ideal function CSV (`x, y1, ..., yM`)
    #[arg(long)]
    pub ideal: Option<PathBuf>,

    /// Test data CSV (`x, y`)
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// SQLite database for inputs and results
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Write a JSON report of the results to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Multiplier on the largest training deviation used as acceptance threshold
    #[arg(long)]
    pub threshold_factor: Option<f64>,

    /// Show the results in a plot window
    #[arg(long)]
    pub plot: bool,

    /// Save the results plot as a PNG image to this file
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Contents of a configuration file. Every entry is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub data: DataSection,
    pub output: OutputSection,
    pub classify: ClassifySection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataSection {
    pub train: Option<PathBuf>,
    pub ideal: Option<PathBuf>,
    pub test: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub database: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifySection {
    pub threshold_factor: Option<f64>,
}

impl FileConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this layout.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Fully resolved settings for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub train: PathBuf,
    pub ideal: PathBuf,
    pub test: PathBuf,
    pub database: PathBuf,
    pub report: Option<PathBuf>,
    pub classify: classifier::Config,
    pub plot: bool,
    pub image: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN.into(),
            ideal: DEFAULT_IDEAL.into(),
            test: DEFAULT_TEST.into(),
            database: DEFAULT_DATABASE.into(),
            report: None,
            classify: classifier::Config::default(),
            plot: false,
            image: None,
        }
    }
}

impl Settings {
    /// Resolves settings from command-line arguments, reading the config file
    /// they name, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or the threshold
    /// factor is invalid.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Layers command-line arguments over file values over defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting threshold factor is invalid.
    pub fn merge(args: &Args, file: FileConfig) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let classify = match args.threshold_factor.or(file.classify.threshold_factor) {
            Some(factor) => classifier::Config::new(factor)
                .with_context(|| format!("invalid threshold factor {factor}"))?,
            None => defaults.classify,
        };

        Ok(Self {
            train: pick(&args.train, file.data.train, defaults.train),
            ideal: pick(&args.ideal, file.data.ideal, defaults.ideal),
            test: pick(&args.test, file.data.test, defaults.test),
            database: pick(&args.database, file.output.database, defaults.database),
            report: args.report.clone().or(file.output.report),
            classify,
            plot: args.plot,
            image: args.image.clone().or(file.output.image),
        })
    }
}

fn pick(arg: &Option<PathBuf>, file: Option<PathBuf>, default: PathBuf) -> PathBuf {
    arg.clone().or(file).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_match_the_conventional_layout() {
        let settings = Settings::merge(&Args::default(), FileConfig::default()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.train, Path::new("data/train.csv"));
        assert_eq!(settings.database, Path::new("output/ideal_functions.db"));
        assert_relative_eq!(settings.classify.threshold_factor(), SQRT_2);
    }

    #[test]
    fn parses_partial_config_files() {
        let file: FileConfig = toml::from_str(
            r#"
            [data]
            ideal = "catalog/ideal.csv"

            [classify]
            threshold_factor = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(file.data.ideal, Some(PathBuf::from("catalog/ideal.csv")));
        assert_eq!(file.data.train, None);
        assert_eq!(file.output, OutputSection::default());
        assert_eq!(file.classify.threshold_factor, Some(2.0));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("[data]\ntraining = \"a.csv\"\n").is_err());
    }

    #[test]
    fn arguments_override_file_values() {
        let file: FileConfig = toml::from_str(
            r#"
            [data]
            train = "file/train.csv"
            test = "file/test.csv"

            [output]
            report = "file/report.json"

            [classify]
            threshold_factor = 2.0
            "#,
        )
        .unwrap();

        let args = Args::parse_from([
            "curvepick",
            "--train",
            "cli/train.csv",
            "--threshold-factor",
            "1.5",
            "-vv",
        ]);
        let settings = Settings::merge(&args, file).unwrap();

        assert_eq!(args.verbose, 2);
        assert_eq!(settings.train, Path::new("cli/train.csv"));
        assert_eq!(settings.test, Path::new("file/test.csv"));
        assert_eq!(settings.ideal, Path::new(DEFAULT_IDEAL));
        assert_eq!(settings.report.as_deref(), Some(Path::new("file/report.json")));
        assert_relative_eq!(settings.classify.threshold_factor(), 1.5);
    }

    #[test]
    fn reads_config_file_named_on_the_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curvepick.toml");
        fs::write(
            &path,
            r#"
            [data]
            train = "runs/train.csv"
            test = "runs/test.csv"

            [output]
            database = "runs/out.db"
            image = "runs/results.png"

            [classify]
            threshold_factor = 3.0
            "#,
        )
        .unwrap();

        let config = path.to_str().unwrap();
        let args = Args::parse_from(["curvepick", "--config", config, "--test", "cli/test.csv"]);
        let settings = Settings::from_args(&args).unwrap();

        assert_eq!(settings.train, Path::new("runs/train.csv"));
        assert_eq!(settings.test, Path::new("cli/test.csv"));
        assert_eq!(settings.ideal, Path::new(DEFAULT_IDEAL));
        assert_eq!(settings.database, Path::new("runs/out.db"));
        assert_eq!(settings.image.as_deref(), Some(Path::new("runs/results.png")));
        assert_relative_eq!(settings.classify.threshold_factor(), 3.0);
    }

    #[test]
    fn missing_or_malformed_config_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("absent.toml");
        let err = FileConfig::read(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));

        let malformed = dir.path().join("bad.toml");
        fs::write(&malformed, "[classify]\nthreshold_factor = \"wide\"\n").unwrap();
        assert!(FileConfig::read(&malformed).is_err());
    }

    #[test]
    fn rejects_negative_threshold_factor() {
        let args = Args::parse_from(["curvepick", "--threshold-factor=-1"]);
        assert!(Settings::merge(&args, FileConfig::default()).is_err());
    }
}
