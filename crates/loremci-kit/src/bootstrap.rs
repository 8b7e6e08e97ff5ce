//! Making sure a working text corpus is available before generating.
//!
//! The corpus embedded in `lipsum` is used whenever it works. Otherwise, or
//! when a reinstall is requested, a corpus package is installed from a local
//! source root. Such a root looks like this:
//!
//! ```text
//! <root>/loremipsum.toml          the packaging manifest
//! <root>/loremipsum/              the package directory
//! <root>/loremipsum/<corpus>.txt  the corpus named by the manifest
//! ```

use std::ffi::OsStr;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ecow::{EcoString, eco_format};
use loremci::diag::{HintedString, Warned};
use loremci::{Corpus, Generate, Lorem, Unit};
use serde::Deserialize;

/// How many parent directories are searched for the repository root.
pub const MAX_ROOT_DEPTH: usize = 5;

/// A directory whose presence marks the repository root.
pub const ROOT_MARKER: &str = ".buildkite";

/// The repository name, which is also where containers mount it.
pub const DEFAULT_REPO_NAME: &str = "buildkite-py-lorem-demo";

/// The package directory inside the source root.
pub const PACKAGE_DIR: &str = "loremipsum";

/// The packaging manifest inside the source root.
pub const MANIFEST_FILE: &str = "loremipsum.toml";

/// How long the probe sentence may be.
const PROBE_CHARS: usize = 40;

/// Where and how to bootstrap the corpus.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BootstrapConfig {
    /// The directory the run started in.
    pub workdir: PathBuf,
    /// An explicit source root, skipping discovery.
    pub root: Option<PathBuf>,
    /// A directory name that marks the repository root.
    pub repo_name: String,
    /// Whether to install from local source even if the built-in corpus
    /// works.
    pub reinstall: bool,
    /// Whether the run happens inside a container, where the source is
    /// mounted at `/<repo_name>`.
    pub container: bool,
    /// Where corpus packages are installed to.
    pub install_dir: PathBuf,
}

/// Returns a working corpus, installing one from local source if needed.
pub fn ensure_ready(config: &BootstrapConfig) -> Result<Warned<Corpus>, BootstrapError> {
    if !config.reinstall {
        if is_functional(&Corpus::Builtin) {
            tracing::debug!("built-in corpus is ready");
            return Ok(Warned::new(Corpus::Builtin));
        }
        tracing::warn!("built-in corpus is not functional, installing from local source");
    }

    let Warned { output: root, warnings } = resolve_root(config);
    let source = PackageSource::locate(&root)?;
    let path = source.install(&config.install_dir)?;

    let text = fs::read_to_string(&path)
        .map_err(|err| BootstrapError::install(&path, &err))?;
    let corpus = Corpus::Local { path: path.clone(), text };
    if !is_functional(&corpus) {
        return Err(BootstrapError::NonFunctional(path));
    }

    Ok(Warned { output: corpus, warnings })
}

/// Whether a generator over the corpus produces any text.
pub fn is_functional(corpus: &Corpus) -> bool {
    Lorem::new(corpus)
        .and_then(|mut lorem| lorem.generate(Unit::Sentence, PROBE_CHARS))
        .is_ok_and(|text| !text.is_empty())
}

/// Determines the source root to install from.
///
/// Falls back to the working directory, with a warning, if no root can be
/// found.
pub fn resolve_root(config: &BootstrapConfig) -> Warned<PathBuf> {
    if let Some(root) = &config.root {
        return Warned::new(config.workdir.join(root));
    }

    if config.container {
        let mount = container_mount(&config.repo_name);
        tracing::info!(root = %mount.display(), "running in a container, using the mount point");
        return Warned::new(mount);
    }

    if let Some(root) = find_root(&config.workdir, &config.repo_name, MAX_ROOT_DEPTH) {
        tracing::debug!(root = %root.display(), "found repository root");
        return Warned::new(root);
    }

    let warning = HintedString::new(eco_format!(
        "could not find the repository root within {MAX_ROOT_DEPTH} levels above {}, \
         using the working directory",
        config.workdir.display(),
    ))
    .with_hint("set LOREMIPSUM_ROOT to the directory containing loremipsum.toml");

    Warned { output: config.workdir.clone(), warnings: vec![warning] }
}

/// Where a container mounts the repository.
fn container_mount(repo_name: &str) -> PathBuf {
    Path::new("/").join(repo_name)
}

/// Looks at `start` and its parents, `max_depth` directories in total, for
/// one that contains the [`ROOT_MARKER`] or is named `repo_name`. The
/// filesystem root is never considered.
pub fn find_root(start: &Path, repo_name: &str, max_depth: usize) -> Option<PathBuf> {
    start
        .ancestors()
        .take_while(|dir| dir.parent().is_some())
        .take(max_depth)
        .find(|dir| {
            dir.join(ROOT_MARKER).is_dir()
                || dir.file_name().is_some_and(|name| name == repo_name)
        })
        .map(Path::to_path_buf)
}

/// The packaging manifest of a corpus package.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct PackageManifest {
    /// Details about the package itself.
    pub package: PackageInfo,
}

/// The `[package]` table of a [`PackageManifest`].
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct PackageInfo {
    /// The name of the package, also the name of its install directory.
    pub name: EcoString,
    /// The package's version.
    pub version: EcoString,
    /// A short description.
    #[serde(default)]
    pub description: Option<EcoString>,
    /// The corpus file inside the package directory.
    #[serde(default = "default_corpus")]
    pub corpus: EcoString,
}

fn default_corpus() -> EcoString {
    "loremipsum.txt".into()
}

impl PackageManifest {
    /// Parses and validates a manifest.
    pub fn parse(path: &Path, text: &str) -> Result<Self, BootstrapError> {
        let invalid = |message: EcoString| BootstrapError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        };

        let manifest: Self = toml::from_str(text).map_err(|err| invalid(eco_format!("{err}")))?;
        if !is_file_name(&manifest.package.name) {
            return Err(invalid(eco_format!(
                "package name `{}` is not a valid directory name",
                manifest.package.name
            )));
        }
        if !is_file_name(&manifest.package.corpus) {
            return Err(invalid(eco_format!(
                "corpus `{}` must be a file name inside {PACKAGE_DIR}/",
                manifest.package.corpus
            )));
        }

        Ok(manifest)
    }
}

/// Whether `name` is a single, plain path component.
fn is_file_name(name: &str) -> bool {
    Path::new(name).file_name() == Some(OsStr::new(name))
}

/// A corpus package found in a source root.
#[derive(Debug, Clone)]
struct PackageSource {
    manifest: PackageManifest,
    manifest_path: PathBuf,
    corpus_path: PathBuf,
}

impl PackageSource {
    /// Checks that the root holds everything needed for an install.
    fn locate(root: &Path) -> Result<Self, BootstrapError> {
        let package_dir = root.join(PACKAGE_DIR);
        if !package_dir.is_dir() {
            return Err(BootstrapError::MissingPackageDir(package_dir));
        }

        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(BootstrapError::MissingManifest(manifest_path));
        }

        let text = fs::read_to_string(&manifest_path).map_err(|err| {
            BootstrapError::InvalidManifest {
                path: manifest_path.clone(),
                message: eco_format!("{err}"),
            }
        })?;
        let manifest = PackageManifest::parse(&manifest_path, &text)?;

        let corpus_path = package_dir.join(manifest.package.corpus.as_str());
        if !corpus_path.is_file() {
            return Err(BootstrapError::MissingCorpus(corpus_path));
        }

        Ok(Self { manifest, manifest_path, corpus_path })
    }

    /// Removes a previous install of the package, then copies the manifest
    /// and the corpus into `install_dir`. Returns the installed corpus path.
    fn install(&self, install_dir: &Path) -> Result<PathBuf, BootstrapError> {
        let package = &self.manifest.package;
        let target = install_dir.join(package.name.as_str());

        if target.exists() {
            tracing::info!(path = %target.display(), "uninstalling previous corpus");
            fs::remove_dir_all(&target)
                .map_err(|err| BootstrapError::install(&target, &err))?;
        }

        fs::create_dir_all(&target).map_err(|err| BootstrapError::install(&target, &err))?;

        let manifest = target.join(MANIFEST_FILE);
        fs::copy(&self.manifest_path, &manifest)
            .map_err(|err| BootstrapError::install(&manifest, &err))?;

        let corpus = target.join(package.corpus.as_str());
        fs::copy(&self.corpus_path, &corpus)
            .map_err(|err| BootstrapError::install(&corpus, &err))?;

        tracing::info!(
            name = %package.name,
            version = %package.version,
            path = %target.display(),
            "installed corpus",
        );

        Ok(corpus)
    }
}

/// A failure to make a corpus ready.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BootstrapError {
    /// The source root has no package directory.
    MissingPackageDir(PathBuf),
    /// The source root has no packaging manifest.
    MissingManifest(PathBuf),
    /// The packaging manifest could not be read or is malformed.
    InvalidManifest { path: PathBuf, message: EcoString },
    /// The corpus named by the manifest does not exist.
    MissingCorpus(PathBuf),
    /// Copying or removing package files failed.
    Install { path: PathBuf, message: EcoString },
    /// The installed corpus does not produce any text.
    NonFunctional(PathBuf),
}

impl BootstrapError {
    fn install(path: &Path, err: &io::Error) -> Self {
        Self::Install { path: path.to_path_buf(), message: eco_format!("{err}") }
    }
}

impl std::error::Error for BootstrapError {}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::MissingPackageDir(path) => {
                write!(f, "package directory not found (searched at {})", path.display())
            }
            Self::MissingManifest(path) => {
                write!(f, "packaging manifest not found (searched at {})", path.display())
            }
            Self::InvalidManifest { path, message } => {
                write!(f, "failed to parse manifest {} ({message})", path.display())
            }
            Self::MissingCorpus(path) => {
                write!(f, "corpus file not found (searched at {})", path.display())
            }
            Self::Install { path, message } => {
                write!(f, "failed to install corpus at {} ({message})", path.display())
            }
            Self::NonFunctional(path) => {
                write!(f, "installed corpus {} does not produce any text", path.display())
            }
        }
    }
}

impl From<BootstrapError> for HintedString {
    fn from(error: BootstrapError) -> Self {
        let hinted = HintedString::new(eco_format!("{error}"));
        match error {
            BootstrapError::MissingPackageDir(_)
            | BootstrapError::MissingManifest(_)
            | BootstrapError::MissingCorpus(_) => hinted.with_hint(
                "run from the repository or set LOREMIPSUM_ROOT to the source root",
            ),
            _ => hinted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "py-lorem"
version = "1.0"
description = "Generate mock sentences/paragraphs with the Lorem Ipsum prose"
"#;

    const CORPUS: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
        sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

    /// Lays out a complete source root.
    fn source_root(root: &Path) {
        fs::create_dir_all(root.join(PACKAGE_DIR)).unwrap();
        fs::write(root.join(MANIFEST_FILE), MANIFEST).unwrap();
        fs::write(root.join(PACKAGE_DIR).join("loremipsum.txt"), CORPUS).unwrap();
    }

    fn config(workdir: &Path, install_dir: &Path) -> BootstrapConfig {
        BootstrapConfig {
            workdir: workdir.to_path_buf(),
            root: None,
            repo_name: DEFAULT_REPO_NAME.into(),
            reinstall: false,
            container: false,
            install_dir: install_dir.to_path_buf(),
        }
    }

    #[test]
    fn test_builtin_corpus_is_used_when_functional() {
        let tmp = tempfile::tempdir().unwrap();
        let install = tmp.path().join("install");
        let ready = ensure_ready(&config(tmp.path(), &install)).unwrap();
        assert_eq!(ready.output, Corpus::Builtin);
        assert!(ready.warnings.is_empty());
        assert!(!install.exists());
    }

    #[test]
    fn test_find_root_by_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("checkout");
        let nested = root.join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(root.join(ROOT_MARKER)).unwrap();
        assert_eq!(find_root(&nested, DEFAULT_REPO_NAME, MAX_ROOT_DEPTH), Some(root));
    }

    #[test]
    fn test_find_root_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        let nested = root.join("assets");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_root(&nested, DEFAULT_REPO_NAME, MAX_ROOT_DEPTH), Some(root));
    }

    #[test]
    fn test_find_root_is_bounded() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        let five_up = root.join("1").join("2").join("3").join("4").join("5");
        fs::create_dir_all(&five_up).unwrap();
        assert_eq!(find_root(&five_up, DEFAULT_REPO_NAME, MAX_ROOT_DEPTH), None);

        let four_up = root.join("1").join("2").join("3").join("4");
        assert_eq!(find_root(&four_up, DEFAULT_REPO_NAME, MAX_ROOT_DEPTH), Some(root));
    }

    #[test]
    fn test_find_root_skips_filesystem_root() {
        assert_eq!(find_root(Path::new("/"), "", MAX_ROOT_DEPTH), None);
        assert_eq!(find_root(Path::new("/"), DEFAULT_REPO_NAME, MAX_ROOT_DEPTH), None);
    }

    #[test]
    fn test_resolve_root_falls_back_with_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let workdir = tmp.path().join("1").join("2").join("3").join("4").join("5").join("6");
        fs::create_dir_all(&workdir).unwrap();
        let resolved = resolve_root(&config(&workdir, tmp.path()));
        assert_eq!(resolved.output, workdir);
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved.warnings[0].message().contains("repository root"));
    }

    #[test]
    fn test_resolve_root_in_container() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BootstrapConfig { container: true, ..config(tmp.path(), tmp.path()) };
        let resolved = resolve_root(&config);
        assert_eq!(resolved.output, Path::new("/buildkite-py-lorem-demo"));
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_missing_package_dir_fails_before_install() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(MANIFEST_FILE), MANIFEST).unwrap();

        let install = tmp.path().join("install");
        let config = BootstrapConfig { reinstall: true, ..config(&root, &install) };
        let err = ensure_ready(&config).unwrap_err();
        assert_eq!(err, BootstrapError::MissingPackageDir(root.join(PACKAGE_DIR)));
        assert!(!install.exists());
    }

    #[test]
    fn test_missing_manifest_fails_before_install() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        fs::create_dir_all(root.join(PACKAGE_DIR)).unwrap();

        let install = tmp.path().join("install");
        let config = BootstrapConfig { reinstall: true, ..config(&root, &install) };
        let err = ensure_ready(&config).unwrap_err();
        assert_eq!(err, BootstrapError::MissingManifest(root.join(MANIFEST_FILE)));
        assert!(!install.exists());
    }

    #[test]
    fn test_missing_corpus_fails_before_install() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        source_root(&root);
        fs::remove_file(root.join(PACKAGE_DIR).join("loremipsum.txt")).unwrap();

        let install = tmp.path().join("install");
        let config = BootstrapConfig { reinstall: true, ..config(&root, &install) };
        let err = ensure_ready(&config).unwrap_err();
        assert!(matches!(err, BootstrapError::MissingCorpus(_)));
        assert!(!install.exists());
    }

    #[test]
    fn test_reinstall_replaces_previous_install() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        source_root(&root);

        let install = tmp.path().join("install");
        let stale = install.join("py-lorem").join("stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let config = BootstrapConfig { reinstall: true, ..config(&root, &install) };
        let ready = ensure_ready(&config).unwrap();
        let installed = install.join("py-lorem").join("loremipsum.txt");
        assert_eq!(
            ready.output,
            Corpus::Local { path: installed.clone(), text: CORPUS.into() }
        );
        assert!(ready.warnings.is_empty());
        assert!(!stale.exists());
        assert!(install.join("py-lorem").join(MANIFEST_FILE).is_file());
    }

    #[test]
    fn test_non_functional_corpus_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(DEFAULT_REPO_NAME);
        source_root(&root);
        fs::write(root.join(PACKAGE_DIR).join("loremipsum.txt"), "...").unwrap();

        let install = tmp.path().join("install");
        let config = BootstrapConfig { reinstall: true, ..config(&root, &install) };
        let err = ensure_ready(&config).unwrap_err();
        assert!(matches!(err, BootstrapError::NonFunctional(_)));
    }

    #[test]
    fn test_manifest_validation() {
        let path = Path::new(MANIFEST_FILE);
        let manifest = PackageManifest::parse(path, MANIFEST).unwrap();
        assert_eq!(manifest.package.name.as_str(), "py-lorem");
        assert_eq!(manifest.package.corpus.as_str(), "loremipsum.txt");

        let escaping = "[package]\nname = \"../up\"\nversion = \"1.0\"\n";
        assert!(matches!(
            PackageManifest::parse(path, escaping),
            Err(BootstrapError::InvalidManifest { .. })
        ));

        let incomplete = "[package]\nname = \"py-lorem\"\n";
        assert!(PackageManifest::parse(path, incomplete).is_err());
    }
}
