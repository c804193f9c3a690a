//! Maps a file path to the formatting spec configured for its extension.

use std::collections::{HashMap, HashSet};

use crate::config::{CommandConfig, Config};

/// Key used when a file name has no extension.
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Placeholder replaced by the temp file path in command arguments.
pub const NAME_PLACEHOLDER: &str = "$NAME";

/// One external formatting invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub executable: String,
    pub args: Vec<String>,
    pub prints_to_stdout: bool,
    /// Capture stdout alone instead of stdout and stderr together.
    pub stdout_only: bool,
}

impl From<&CommandConfig> for Command {
    fn from(cmd: &CommandConfig) -> Self {
        Self {
            executable: cmd.exec.clone(),
            args: cmd.args.clone(),
            prints_to_stdout: cmd.prints_to_stdout,
            stdout_only: cmd.stdout_only,
        }
    }
}

/// All formatting behaviour for one extension.
///
/// `indent == 0` means nothing is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spec {
    pub indent: usize,
    pub tab_expand: bool,
    pub commands: Vec<Command>,
}

static NO_FORMAT: Spec = Spec {
    indent: 0,
    tab_expand: false,
    commands: Vec::new(),
};

impl Spec {
    pub fn is_configured(&self) -> bool {
        self.indent != 0
    }
}

/// Result of [`ExtensionTable::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub spec: &'a Spec,
    pub key: &'a str,
}

/// Read-only extension to spec mapping, built once from the rule file.
#[derive(Debug, Default)]
pub struct ExtensionTable {
    specs: HashMap<String, Spec>,
    bare_names: HashSet<String>,
}

impl ExtensionTable {
    pub fn from_config(config: &Config) -> Self {
        let mut table = Self::default();
        for format in &config.format {
            let spec = Spec {
                indent: format.indent,
                tab_expand: format.tabexpand,
                commands: format.commands.iter().map(Command::from).collect(),
            };
            for ext in &format.extensions {
                table.insert(ext, spec.clone());
            }
        }
        table
    }

    /// Add or replace the spec for `ext`. Keys without a leading dot match
    /// whole file names, dots inside them included (`go.mod`).
    pub fn insert(&mut self, ext: &str, spec: Spec) {
        if !ext.starts_with('.') {
            self.bare_names.insert(ext.to_string());
        }
        self.specs.insert(ext.to_string(), spec);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Resolve `path` to its spec and extension key.
    ///
    /// Never fails: an unknown extension yields the unconfigured spec together
    /// with the computed key.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Resolved<'a> {
        let key = self.extension_key(path);
        let spec = self.specs.get(key).unwrap_or(&NO_FORMAT);
        Resolved { spec, key }
    }

    fn extension_key<'a>(&self, path: &'a str) -> &'a str {
        let filename = path.rsplit('/').next().unwrap_or(path);
        if self.bare_names.contains(filename) {
            return filename;
        }
        match filename.rfind('.') {
            Some(dot) => &filename[dot..],
            None => DEFAULT_EXTENSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(indent: usize) -> Spec {
        Spec {
            indent,
            tab_expand: false,
            commands: vec![],
        }
    }

    fn table() -> ExtensionTable {
        let mut table = ExtensionTable::default();
        table.insert(".go", spec(8));
        table.insert(".txt", spec(4));
        table.insert("Makefile", spec(8));
        table
    }

    #[test]
    fn test_resolve_suffix() {
        let table = table();
        let resolved = table.resolve("/home/glenda/src/main.go");
        assert_eq!(resolved.key, ".go");
        assert_eq!(resolved.spec.indent, 8);
    }

    #[test]
    fn test_resolve_last_dot_wins() {
        let table = table();
        assert_eq!(table.resolve("/tmp/archive.tar.go").key, ".go");
    }

    #[test]
    fn test_resolve_bare_filename() {
        let table = table();
        let resolved = table.resolve("/src/project/Makefile");
        assert_eq!(resolved.key, "Makefile");
        assert_eq!(resolved.spec.indent, 8);
    }

    #[test]
    fn test_resolve_bare_filename_with_dots() {
        let mut table = table();
        table.insert("go.mod", spec(4));
        table.insert("CMakeLists.txt", spec(2));

        let resolved = table.resolve("/src/proj/go.mod");
        assert_eq!(resolved.key, "go.mod");
        assert_eq!(resolved.spec.indent, 4);
        assert_eq!(table.resolve("/src/proj/CMakeLists.txt").key, "CMakeLists.txt");
        // Other files with the same suffix still resolve by extension.
        assert_eq!(table.resolve("/src/proj/notes.txt").key, ".txt");
        assert_eq!(table.resolve("/src/proj/x.mod").key, ".mod");
    }

    #[test]
    fn test_resolve_no_extension_uses_default() {
        let table = table();
        let resolved = table.resolve("/usr/local/bin/README");
        assert_eq!(resolved.key, DEFAULT_EXTENSION);
        assert_eq!(resolved.spec.indent, 4);
    }

    #[test]
    fn test_directory_dots_ignored() {
        let table = table();
        assert_eq!(table.resolve("/home/me/.config/notes").key, DEFAULT_EXTENSION);
    }

    #[test]
    fn test_unknown_extension_is_unconfigured() {
        let table = table();
        let resolved = table.resolve("/tmp/data.xyz");
        assert_eq!(resolved.key, ".xyz");
        assert!(!resolved.spec.is_configured());
        assert!(resolved.spec.commands.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_toml(
            r#"
[[format]]
extensions = [".rs", "BUILD"]
indent = 4
tabexpand = true

[[format.commands]]
exec = "rustfmt"
args = ["$NAME"]
"#,
            "test.toml",
        )
        .unwrap();

        let table = ExtensionTable::from_config(&config);
        assert_eq!(table.len(), 2);

        let rs = table.resolve("lib.rs");
        assert!(rs.spec.tab_expand);
        assert_eq!(
            rs.spec.commands,
            vec![Command {
                executable: "rustfmt".to_string(),
                args: vec![NAME_PLACEHOLDER.to_string()],
                prints_to_stdout: false,
                stdout_only: false,
            }]
        );
        assert_eq!(table.resolve("pkg/BUILD").key, "BUILD");
    }
}
