use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::Error;

/// Module pairs recognized by default: the primary command namespace and the
/// common secondary access path.
pub const DEFAULT_MODULES: &str = "maya:cmds,pymel:core";

/// Flag tables shipped with the tool, one artifact per Maya version. The
/// artifacts are produced offline against a live Maya session; here they are
/// plain data.
const EMBEDDED_CONFIGS: &[(&str, &str)] = &[
    ("2018", include_str!("../maya_configs/2018.json")),
    ("2023", include_str!("../maya_configs/2023.json")),
];

type CommandTable = BTreeMap<String, BTreeMap<String, String>>;

/// A `(module_path, imported_member)` pair whose member resolves to the
/// command namespace, e.g. `("maya", "cmds")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePair {
    pub module: String,
    pub member: String,
}

impl ModulePair {
    /// Parse a `module:member` spec string.
    pub fn parse(spec: &str) -> Result<Self, Error> {
        let mut parts = spec.splitn(2, ':');
        let module = parts.next().unwrap_or_default().trim();
        let member = parts.next().unwrap_or_default().trim();
        if module.is_empty() || member.is_empty() {
            return Err(Error::Config(format!(
                "malformed module pair {spec:?} (expected \"module:member\")"
            )));
        }
        Ok(Self {
            module: module.to_string(),
            member: member.to_string(),
        })
    }

    /// The full dotted import path, `module.member`.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.module, self.member)
    }
}

/// Parse a comma-separated module pair list, e.g. `maya:cmds,pymel:core`.
pub fn parse_module_list(spec: &str) -> Result<Vec<ModulePair>, Error> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ModulePair::parse)
        .collect()
}

pub fn default_modules() -> Vec<ModulePair> {
    parse_module_list(DEFAULT_MODULES).unwrap_or_default()
}

/// Version names of the embedded flag tables, ascending.
pub fn available_versions() -> Vec<&'static str> {
    let mut versions: Vec<&'static str> = EMBEDDED_CONFIGS.iter().map(|(name, _)| *name).collect();
    versions.sort_by_key(|name| name.parse::<u32>().unwrap_or(0));
    versions
}

pub fn latest_version() -> &'static str {
    available_versions().last().copied().unwrap_or("2018")
}

/// The flag table: `command -> {short_flag -> long_flag}` plus the module
/// pairs to recognize in import statements. Immutable once built; one
/// instance is shared read-only across all files in a run.
#[derive(Debug, Clone)]
pub struct MayaFlagsConfig {
    modules: Vec<ModulePair>,
    commands: CommandTable,
}

impl MayaFlagsConfig {
    /// Load an embedded per-version table.
    pub fn embedded(version: &str, modules: Vec<ModulePair>) -> Result<Self, Error> {
        let raw = EMBEDDED_CONFIGS
            .iter()
            .find(|(name, _)| *name == version)
            .map(|(_, raw)| *raw)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown target version {version:?} (available: {})",
                    available_versions().join(", ")
                ))
            })?;
        Self::from_json(raw, modules)
    }

    /// Load the newest embedded table.
    pub fn latest(modules: Vec<ModulePair>) -> Result<Self, Error> {
        Self::embedded(latest_version(), modules)
    }

    /// Load a user-supplied flag table, same JSON shape as the embedded ones.
    pub fn from_file(path: &Path, modules: Vec<ModulePair>) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("config file {}: {err}", path.display())))?;
        Self::from_json(&raw, modules).map_err(|err| match err {
            Error::Config(message) => {
                Error::Config(format!("config file {}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(raw: &str, modules: Vec<ModulePair>) -> Result<Self, Error> {
        let commands: CommandTable = serde_json::from_str(raw)
            .map_err(|err| Error::Config(format!("invalid flag table: {err}")))?;
        Ok(Self { modules, commands })
    }

    pub fn modules(&self) -> &[ModulePair] {
        &self.modules
    }

    /// Flag mapping for one command, `None` when the command is not in the
    /// table (or carries no flags).
    pub fn flags(&self, command_name: &str) -> Option<&BTreeMap<String, String>> {
        self.commands
            .get(command_name)
            .filter(|flags| !flags.is_empty())
    }

    pub fn long_name(&self, command_name: &str, short_name: &str) -> Option<&str> {
        self.flags(command_name)?
            .get(short_name)
            .map(String::as_str)
    }
}
