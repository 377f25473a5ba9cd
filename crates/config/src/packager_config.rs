use crate::config_error::ConfigError;
use crate::config_struct;
use nodekit_common::consts::CONFIG_DIRNAME;
use nodekit_common::path::resolve_from;
use schematic::{Config, ConfigEnum, derive_enum};
use std::path::{Path, PathBuf};

derive_enum!(
    /// Well-known package managers, each providing default settings.
    #[derive(ConfigEnum, Copy, Default)]
    pub enum PackagerPreset {
        #[default]
        Npm,
        Pnpm,
        Cnpm,
        Yarn,
        Custom,
    }
);

config_struct!(
    /// Configures the command line companion of a packager, like `npx` or `pnpx`.
    #[derive(Config)]
    pub struct PackagerCliConfig {
        /// Command to run instead of the packager's own.
        pub command: Option<String>,
    }
);

config_struct!(
    /// Configures the package manager used to install dependencies and run scripts.
    #[derive(Config)]
    pub struct PackagerConfig {
        /// Preset that supplies defaults for any setting left unset.
        pub preset: PackagerPreset,

        /// Unique name of the packager. Defaults to the preset name.
        pub name: Option<String>,

        /// Executable to run.
        pub command: Option<String>,

        /// Version of `npmPackage` to install. Defaults to the latest.
        #[setting(env = "NODEKIT_PACKAGER_VERSION")]
        pub version: Option<String>,

        /// Directory the packager is installed into. Defaults to `.nodekit/packagers`.
        pub working_dir: Option<PathBuf>,

        /// Package to install with the bundled npm before first use.
        pub npm_package: Option<String>,

        /// Files (or globs) whose changes require re-running the install.
        pub input_files: Option<Vec<String>>,

        /// Files (or globs) produced by the install.
        pub output_files: Option<Vec<String>>,

        /// Directories produced by the install.
        pub output_directories: Option<Vec<String>>,

        #[setting(nested)]
        pub cli: Option<PackagerCliConfig>,
    }
);

/// Fully resolved packager settings, with preset defaults applied
/// and paths made absolute.
#[derive(Clone, Debug, PartialEq)]
pub struct PackagerSettings {
    pub preset: PackagerPreset,
    pub name: String,
    pub command: String,
    pub version: Option<String>,
    pub working_dir: PathBuf,
    pub npm_package: Option<String>,
    pub input_files: Vec<String>,
    pub output_files: Vec<String>,
    pub output_directories: Vec<String>,
    pub cli_command: Option<String>,
}

impl PackagerSettings {
    /// Directory this packager version is installed into.
    pub fn install_dir(&self) -> PathBuf {
        self.working_dir.join(match &self.version {
            Some(version) => format!("{}-v{version}", self.name),
            None => format!("{}-latest", self.name),
        })
    }

    /// The `<package>@<version>` specifier passed to npm.
    pub fn package_specifier(&self) -> Option<String> {
        self.npm_package.as_ref().map(|package| {
            format!(
                "{package}@{}",
                self.version.as_deref().unwrap_or("latest")
            )
        })
    }

    /// Whether the npm bundled with the runtime is used as is. Pinning a
    /// version (or another command) installs npm like any other packager.
    pub fn is_builtin(&self) -> bool {
        matches!(self.preset, PackagerPreset::Npm)
            && self.version.is_none()
            && self.command == "npm"
    }
}

struct PresetDefaults {
    command: &'static str,
    npm_package: Option<&'static str>,
    input_files: &'static [&'static str],
    output_files: &'static [&'static str],
    output_directories: &'static [&'static str],
    cli_command: Option<&'static str>,
}

impl PackagerPreset {
    fn defaults(&self) -> PresetDefaults {
        match self {
            Self::Npm => PresetDefaults {
                command: "npm",
                npm_package: Some("npm"),
                input_files: &["package.json", "package-lock.json"],
                output_files: &["package-lock.json"],
                output_directories: &["node_modules"],
                cli_command: Some("npx"),
            },
            Self::Pnpm => PresetDefaults {
                command: "pnpm",
                npm_package: Some("pnpm"),
                input_files: &["package.json"],
                output_files: &["pnpm-lock.yaml"],
                output_directories: &["node_modules"],
                cli_command: Some("pnpx"),
            },
            Self::Cnpm => PresetDefaults {
                command: "cnpm",
                npm_package: Some("cnpm"),
                input_files: &["package.json"],
                output_files: &[],
                output_directories: &["node_modules"],
                cli_command: None,
            },
            Self::Yarn => PresetDefaults {
                command: "yarn",
                npm_package: Some("yarn"),
                input_files: &["package.json", "yarn.lock"],
                output_files: &["yarn.lock"],
                output_directories: &["node_modules"],
                cli_command: None,
            },
            Self::Custom => PresetDefaults {
                command: "",
                npm_package: None,
                input_files: &[],
                output_files: &[],
                output_directories: &[],
                cli_command: None,
            },
        }
    }
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|item| (*item).to_owned()).collect()
}

impl PackagerConfig {
    /// Apply preset defaults and resolve paths against the workspace root.
    pub fn resolve(&self, workspace_root: &Path) -> Result<PackagerSettings, ConfigError> {
        let defaults = self.preset.defaults();

        let command = match &self.command {
            Some(command) if !command.is_empty() => command.to_owned(),
            _ if defaults.command.is_empty() => {
                return Err(ConfigError::MissingPackagerCommand {
                    name: self
                        .name
                        .clone()
                        .unwrap_or_else(|| self.preset.to_string()),
                });
            }
            _ => defaults.command.to_owned(),
        };

        let name = self.name.clone().unwrap_or_else(|| match self.preset {
            PackagerPreset::Custom => command.clone(),
            preset => preset.to_string(),
        });

        let working_dir = match &self.working_dir {
            Some(dir) => resolve_from(workspace_root, dir),
            None => workspace_root.join(CONFIG_DIRNAME).join("packagers"),
        };

        let cli_command = self
            .cli
            .as_ref()
            .and_then(|cli| cli.command.clone())
            .or_else(|| defaults.cli_command.map(|cli| cli.to_owned()));

        Ok(PackagerSettings {
            preset: self.preset,
            name,
            command,
            version: self.version.clone(),
            working_dir,
            npm_package: self
                .npm_package
                .clone()
                .or_else(|| defaults.npm_package.map(|pkg| pkg.to_owned())),
            input_files: self
                .input_files
                .clone()
                .unwrap_or_else(|| to_strings(defaults.input_files)),
            output_files: self
                .output_files
                .clone()
                .unwrap_or_else(|| to_strings(defaults.output_files)),
            output_directories: self
                .output_directories
                .clone()
                .unwrap_or_else(|| to_strings(defaults.output_directories)),
            cli_command,
        })
    }
}
