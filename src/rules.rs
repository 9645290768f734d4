//! Deletion and minification rules
//!
//! A [`RuleSet`] is immutable for the duration of a trim run. The built-in
//! tables cover build tooling configs, license/readme files, lockfiles,
//! source-only file types and `package.json` fields that Electron never reads
//! at runtime. Additional entries come from `.asar-trim.toml`
//! (see [`crate::config`]).

use std::collections::BTreeSet;

use crate::config::RuleOverrides;

/// Name of the package-metadata file whose keys are stripped
pub const PACKAGE_METADATA_FILE: &str = "package.json";

/// Basename extensions treated as JSON and minified
pub const JSON_EXTENSIONS: &[&str] = &[".json", ".json5"];

const DEFAULT_LITERAL_NAMES: &[&str] = &[
    ".airtap.yml",
    ".babelrc",
    ".editorconfig",
    ".eslintignore",
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.json",
    ".eslintrc.yml",
    ".gitmodules",
    ".jscs.json",
    ".jshintignore",
    ".lint",
    ".npmignore",
    ".nvmrc",
    ".nycrc",
    ".nycrc.json",
    ".testignore",
    ".travis.yml",
    ".yarnrc.yml",
    "3rdpartylicenses.txt",
    "authors",
    "bower.json",
    "browsers.json",
    "changes",
    "ci.yml",
    "commitlint.config.js",
    "copyrightnotice.txt",
    "dependabot.yml",
    "funding.yml",
    "jasmine.json",
    "jest.config.js",
    "jsl.node.conf",
    "licence",
    "license",
    "license-mit.txt",
    "license.txt",
    "lint.yml",
    "makefile",
    "mocha.opts",
    "notice",
    "rollup.config.js",
    "tsconfig.build.json",
    "tsconfig.eslint.json",
    "tsconfig.json",
    "tsdoc-metadata.json",
    "tslint.json",
    "webpack.build.config.js",
    "webpack.config.js",
    "yarn.lock",
];

const DEFAULT_EXTENSION_SUFFIXES: &[&str] = &[
    ".__ivy_ngcc_bak",
    ".ai",
    ".apache2",
    ".applescript",
    ".babelrc",
    ".bak",
    ".c",
    ".cmd",
    ".coffee",
    ".cpp",
    ".cs",
    ".dds",
    ".dockerignore",
    ".flow",
    ".gyp",
    ".gypi",
    ".gz",
    ".h",
    ".hbs",
    ".hpp",
    ".huskyrc",
    ".ilk",
    ".info",
    ".inl",
    ".iobj",
    ".ipdb",
    ".jsdoc",
    ".jst",
    ".lib",
    ".license",
    ".license.txt",
    ".lintstagedrc",
    ".lock",
    ".log",
    ".map",
    ".markdown",
    ".md",
    ".mit",
    ".mkd",
    ".nix",
    ".patch",
    ".pdf",
    ".prettierignore",
    ".prettierrc",
    ".scss",
    ".spec.js",
    ".swf",
    ".targ",
    ".template",
    ".tga",
    ".tgz",
    ".tlog",
    ".toml",
    ".ts",
    ".tsbuildinfo",
    ".vcxproj",
    ".webmanifest",
    ".wrapped",
    ".x",
];

const DEFAULT_PACKAGE_METADATA_KEYS: &[&str] = &[
    "author",
    "authors",
    "bin",
    "browser",
    "browserslist",
    "bundlesize",
    "commitlint",
    "config",
    "dependencies",
    "description",
    "devDependencies",
    "directories",
    "engine",
    "engines",
    "es2015",
    "es2020",
    "eslintIgnore",
    "esm2020",
    "exports",
    "fesm2015",
    "fesm2020",
    "files",
    "funding",
    "gh-pages-deploy",
    "gypfile",
    "homepage",
    "husky",
    "imports",
    "jest",
    "jsdelivr",
    "license",
    "licenses",
    "lint-staged",
    "locales",
    "maintainers",
    "mocha",
    "modes",
    "ng-update",
    "np",
    "optionalDependencies",
    "optionalDevDependencies",
    "packageManager",
    "peerDependencies",
    "peerDependenciesMeta",
    "pre-commit",
    "prettier",
    "private",
    "publishConfig",
    "react-native",
    "readme",
    "readmeFilename",
    "repository",
    "schematics",
    "sideEffects",
    "standard",
    "testling",
    "tsd",
    "types",
    "typesVersions",
    "typescript",
    "typings",
    "unpkg",
    "verb",
];

/// Declarative description of what is deletable or minifiable
///
/// Literal names and suffixes are stored lower-cased; package-metadata keys
/// are case-sensitive, like JSON object keys.
///
/// # Examples
///
/// ```
/// use asar_trim::rules::RuleSet;
///
/// let rules = RuleSet::default();
/// assert!(rules.is_literal_name("LICENSE"));
/// assert!(rules.matches_suffix("node_modules/foo/README.md"));
/// assert!(rules.is_package_metadata_key("devDependencies"));
/// assert!(!rules.is_package_metadata_key("main"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    literal_names: BTreeSet<String>,
    extension_suffixes: BTreeSet<String>,
    package_metadata_keys: BTreeSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_LITERAL_NAMES.iter().copied(),
            DEFAULT_EXTENSION_SUFFIXES.iter().copied(),
            DEFAULT_PACKAGE_METADATA_KEYS.iter().copied(),
        )
    }
}

impl RuleSet {
    /// Build a rule set from explicit tables
    pub fn new<N, S, K>(literal_names: N, extension_suffixes: S, package_metadata_keys: K) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            literal_names: literal_names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
            extension_suffixes: extension_suffixes
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            package_metadata_keys: package_metadata_keys
                .into_iter()
                .map(|k| k.as_ref().to_string())
                .collect(),
        }
    }

    /// A rule set that matches nothing
    pub fn empty() -> Self {
        Self::new(
            std::iter::empty::<&str>(),
            std::iter::empty::<&str>(),
            std::iter::empty::<&str>(),
        )
    }

    /// Apply additions and `keep` exclusions from a config file
    ///
    /// `keep` wins over both the built-in tables and the `extra-*` lists.
    pub fn with_overrides(mut self, overrides: &RuleOverrides) -> Self {
        self.literal_names
            .extend(overrides.extra_names.iter().map(|n| n.to_lowercase()));
        self.extension_suffixes
            .extend(overrides.extra_suffixes.iter().map(|s| s.to_lowercase()));
        self.package_metadata_keys
            .extend(overrides.extra_package_keys.iter().cloned());

        for kept in &overrides.keep {
            let lowered = kept.to_lowercase();
            self.literal_names.remove(&lowered);
            self.extension_suffixes.remove(&lowered);
            self.package_metadata_keys.remove(kept);
        }

        self
    }

    /// Whether `basename` (compared case-insensitively) is deleted unconditionally
    pub fn is_literal_name(&self, basename: &str) -> bool {
        self.literal_names.contains(&basename.to_lowercase())
    }

    /// Whether the lower-cased full `path` ends with any deletable suffix
    ///
    /// The test runs on the whole path string, so multi-part suffixes such as
    /// `.license.txt` match.
    pub fn matches_suffix(&self, path: &str) -> bool {
        let lowered = path.to_lowercase();
        self.extension_suffixes
            .iter()
            .any(|suffix| lowered.ends_with(suffix.as_str()))
    }

    /// Whether `key` is stripped from `package.json`
    pub fn is_package_metadata_key(&self, key: &str) -> bool {
        self.package_metadata_keys.contains(key)
    }
}

/// Whether `basename` has a JSON-family extension
pub fn is_json_basename(basename: &str) -> bool {
    JSON_EXTENSIONS.iter().any(|ext| basename.ends_with(ext))
}
