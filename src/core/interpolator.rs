// src/core/interpolator.rs

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

lazy_static! {
    static ref MACRO_TOKEN_RE: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("macro token pattern is valid");
}

/// Path-name to absolute path table, computed once per run from the `global` templates.
pub type ResolvedPaths = BTreeMap<String, PathBuf>;

/// The closed registry of macro tokens a path template may reference.
///
/// Adding a token means adding a variant here and a value in [`Interpolator::new`];
/// the expansion logic itself does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroToken {
    /// `${WORKSPACE}`: the directory containing the settings file.
    Workspace,
}

impl MacroToken {
    /// Every registered token.
    pub const ALL: [Self; 1] = [Self::Workspace];

    /// The name written between `${` and `}`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Workspace => "WORKSPACE",
        }
    }

    /// Looks up a registered token by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|token| token.name() == name)
    }
}

/// Expands `${TOKEN}` macros in path templates and normalizes the result to an absolute path.
#[derive(Debug, Clone)]
pub struct Interpolator {
    values: HashMap<MacroToken, String>,
    base_dir: PathBuf,
}

impl Interpolator {
    /// Creates an interpolator bound to `workspace_root`.
    ///
    /// Replacement values use forward slashes so templates stay portable across
    /// separator conventions. Relative results are anchored at `workspace_root`.
    pub fn new(workspace_root: &Path) -> Self {
        let workspace = dunce::simplified(workspace_root)
            .to_string_lossy()
            .replace('\\', "/");

        let mut values = HashMap::new();
        values.insert(MacroToken::Workspace, workspace);

        Self {
            values,
            base_dir: workspace_root.to_path_buf(),
        }
    }

    /// Replaces every known token in `template`.
    ///
    /// Unknown tokens are left in place, untouched, and reported as a warning.
    pub fn expand_string(&self, template: &str) -> String {
        MACRO_TOKEN_RE
            .replace_all(template, |captures: &Captures<'_>| {
                let full_match = captures.get(0).map_or("", |m| m.as_str());
                let name = captures.get(1).map_or("", |m| m.as_str());

                match MacroToken::from_name(name).and_then(|token| self.values.get(&token)) {
                    Some(value) => value.clone(),
                    None => {
                        log::warn!(
                            "Unknown macro '{}' in path template '{}' was left unexpanded.",
                            full_match,
                            template
                        );
                        full_match.to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Expands `template` and normalizes it into an absolute path.
    pub fn resolve_path(&self, template: &str) -> PathBuf {
        let expanded = self.expand_string(template);
        normalize_absolute(Path::new(&expanded), &self.base_dir)
    }

    /// Resolves a whole name-to-template table.
    pub fn resolve_all(&self, templates: &BTreeMap<String, String>) -> ResolvedPaths {
        templates
            .iter()
            .map(|(name, template)| {
                let resolved = self.resolve_path(template);
                log::debug!("Resolved path '{}': {} -> {}", name, template, resolved.display());
                (name.clone(), resolved)
            })
            .collect()
    }
}

/// Lexically normalizes `path` into an absolute path.
///
/// Relative paths are joined onto `base`. `.` components are dropped and `..` pops the
/// previous component, never climbing above the root. Symlinks are not resolved.
pub fn normalize_absolute(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpolator() -> Interpolator {
        Interpolator::new(Path::new("/ws"))
    }

    #[test]
    fn test_workspace_token_is_replaced() {
        let resolved = interpolator().resolve_path("${WORKSPACE}/build/debug");
        assert_eq!(resolved, PathBuf::from("/ws/build/debug"));
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let expanded = interpolator().expand_string("${WORKSPACE}/a:${WORKSPACE}/b");
        assert_eq!(expanded, "/ws/a:/ws/b");
    }

    #[test]
    fn test_template_without_tokens_passes_through() {
        let resolved = interpolator().resolve_path("/opt/out/release");
        assert_eq!(resolved, PathBuf::from("/opt/out/release"));
    }

    #[test]
    fn test_unknown_token_is_left_literally() {
        let expanded = interpolator().expand_string("${HOME}/build");
        assert_eq!(expanded, "${HOME}/build");

        let resolved = interpolator().resolve_path("${HOME}/build");
        assert_eq!(resolved, PathBuf::from("/ws/${HOME}/build"));
    }

    #[test]
    fn test_replacement_value_uses_forward_slashes() {
        let windows_style = Interpolator::new(Path::new(r"C:\projects\ws"));
        let expanded = windows_style.expand_string("${WORKSPACE}/build");
        assert_eq!(expanded, "C:/projects/ws/build");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let interpolator = interpolator();
        let once = interpolator.resolve_path("${WORKSPACE}/./build/../build/x64");
        let twice = interpolator.resolve_path(&once.to_string_lossy());
        assert_eq!(once, PathBuf::from("/ws/build/x64"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_relative_template_is_anchored_at_workspace() {
        let resolved = interpolator().resolve_path("build/debug");
        assert_eq!(resolved, PathBuf::from("/ws/build/debug"));
    }

    #[test]
    fn test_parent_dir_never_climbs_above_root() {
        let resolved = normalize_absolute(Path::new("/../../etc"), Path::new("/ws"));
        assert_eq!(resolved, PathBuf::from("/etc"));
    }

    #[test]
    fn test_resolve_all_keeps_every_name() {
        let mut templates = BTreeMap::new();
        templates.insert("build_path".to_string(), "${WORKSPACE}/build/default".to_string());
        templates.insert("install_path".to_string(), "${WORKSPACE}/dist".to_string());

        let paths = interpolator().resolve_all(&templates);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths["build_path"], PathBuf::from("/ws/build/default"));
        assert_eq!(paths["install_path"], PathBuf::from("/ws/dist"));
    }

    #[test]
    fn test_token_registry_lookup() {
        assert_eq!(MacroToken::from_name("WORKSPACE"), Some(MacroToken::Workspace));
        assert_eq!(MacroToken::from_name("workspace"), None);
    }
}
