use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locate an accessible [`syn::Path`] for a workspace crate as seen from the
/// caller's Cargo.toml.
///
/// Proc-macros use it so that the paths they emit resolve in the invoking
/// crate, whether it depends on a member crate directly or only on the
/// facade.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_serial"));
/// ```
///
/// Reading the manifest is not cheap; resolve once per macro invocation.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If the requested name begins with `vc_` and the target crate depends on
///    the facade `vc_persist`, return `::vc_persist::short_name`
///    (e.g. `vc_serial` -> `::vc_persist::serial`).
/// 3. Repeat steps 1-2 in `dev-dependencies`.
/// 4. Otherwise, fall back to the absolute path `::crate_name`.
///
/// A renamed dependency (`alias = { package = "vc_persist" }`) is found by its
/// `package` key and addressed through the alias.
///
/// ## Note
///
/// A crate referencing itself should add `extern crate self as crate_name;`
/// to its root so that the absolute path also works inside the crate.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_persist";
const MEMBER_PREFIX: &str = "vc_";

impl Manifest {
    // Try get `Cargo.toml` path.
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    #[inline(never)]
    fn get_manifest_modified_time(cargo_manifest_path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_str<T: syn::parse::Parse>(path: &str) -> T {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    /// The key under which `package` is listed in `deps`, following renames.
    fn dependency_key<'t>(deps: &'t Table, package: &str) -> Option<&'t str> {
        deps.iter().find_map(|(key, item)| {
            let renamed = item
                .as_table_like()
                .and_then(|t| t.get("package"))
                .and_then(Item::as_str);
            (renamed.unwrap_or(key) == package).then_some(key)
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if let Some(key) = Self::dependency_key(deps, name) {
            return Some(Self::parse_str(&format!("::{key}")));
        }

        let module = name.strip_prefix(MEMBER_PREFIX)?;
        let facade = Self::dependency_key(deps, FACADE_NAME)?;
        let mut path = Self::parse_str::<syn::Path>(&format!("::{facade}"));
        path.segments.push(Self::parse_str(module));
        Some(path)
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from this
    /// crate's Cargo.toml. See the top-level documentation for the resolution
    /// order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(section)
                && let Some(val) = Self::find_in_deps(deps, name)
            {
                return val;
            }
        }

        Self::parse_str(&format!("::{name}"))
    }

    /// Obtain the [Manifest] of the caller's Cargo.toml.
    ///
    /// The parsed manifest is cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use toml_edit::Document;

    fn resolve(toml: &str, name: &str) -> String {
        let manifest = Manifest {
            manifest: Document::parse(toml.to_owned().into_boxed_str()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        };
        let path = manifest.get_crate_path(name);
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        format!("::{}", segments.join("::"))
    }

    #[test]
    fn direct_dependency_wins() {
        let toml = "[dependencies]\nvc_serial = \"0.1\"\nvc_persist = \"0.1\"\n";
        assert_eq!(resolve(toml, "vc_serial"), "::vc_serial");
    }

    #[test]
    fn facade_exposes_short_name() {
        let toml = "[dependencies]\nvc_persist = \"0.1\"\n";
        assert_eq!(resolve(toml, "vc_serial"), "::vc_persist::serial");
    }

    #[test]
    fn renamed_facade_and_dev_dependencies() {
        let toml = "[dev-dependencies]\npersist = { package = \"vc_persist\", path = \"..\" }\n";
        assert_eq!(resolve(toml, "vc_serial"), "::persist::serial");
        assert_eq!(resolve("", "vc_serial"), "::vc_serial");
    }
}
