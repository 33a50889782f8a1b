use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a brook crate is reachable
/// from the crate invoking a derive.
///
/// ```rust
/// # use bk_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("bk_reflect"));
/// ```
///
/// # Resolution rules
///
/// 1. A direct dependency named `name` resolves to `::name`.
/// 2. A `bk_`-prefixed name resolves through the `brook` facade when the
///    caller depends on it (`bk_reflect` -> `::brook::reflect`).
/// 3. Steps 1-2 are repeated for `dev-dependencies`.
/// 4. Otherwise `::name`.
///
/// A crate referring to itself needs `extern crate self as name;` at its root.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "brook";
const CRATE_PREFIX: &str = "bk_";

impl Manifest {
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
    fn get_manifest_modified_time(path: &Path) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(path).and_then(|metadata| metadata.modified())
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

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_str(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            let mut path = Self::parse_str::<syn::Path>(&format!("::{FACADE_NAME}"));
            path.segments.push(Self::parse_str(module));
            return Some(path);
        }
        None
    }

    /// Return a [`syn::Path`] for the package `name` as seen from the caller.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(table)
                && let Some(val) = Self::find_in_deps(deps, name)
            {
                return val;
            }
        }

        Self::parse_str(&format!("::{name}"))
    }

    /// Run `func` with the caller's manifest.
    ///
    /// Manifests are cached per path and re-read when the file changes.
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
    use super::*;

    fn path_string(path: &syn::Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        format!("::{}", segments.join("::"))
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\nbk_reflect = \"0.0.1\"\nbrook = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("bk_reflect")), "::bk_reflect");
    }

    #[test]
    fn facade_dependency() {
        let m = manifest("[dependencies]\nbrook = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("bk_reflect")), "::brook::reflect");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nbrook = \"0.0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("bk_json")), "::brook::json");
        assert_eq!(path_string(&m.get_crate_path("serde")), "::serde");
    }
}
