//! Module cache, path resolution, and native module registry (spec §3.5,
//! §4.7, §4.7.1).

use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use yona_ast::FqnExpr;

use crate::value::{ModuleValue, NativeFn, RecordInfo};

/// Source file extension for user modules (spec §4.7 step 1).
pub const SOURCE_EXTENSION: &str = "yona";

/// Builds the slash-joined cache key for an FQN (spec §3.5).
pub fn cache_key(fqn: &FqnExpr) -> String {
    fqn.key()
}

/// Resolves an FQN to a relative path: package parts joined by the platform
/// separator, with the source extension appended (spec §4.7 step 1).
pub fn fqn_relative_path(fqn: &FqnExpr) -> PathBuf {
    let mut path = PathBuf::new();
    for part in &fqn.package {
        path.push(part);
    }
    path.push(&fqn.module);
    path.set_extension(SOURCE_EXTENSION);
    path
}

/// Searches `module_paths` in order for the first existing file matching
/// the FQN, or treats the relative path as absolute if it already exists
/// (spec §4.7 step 2).
pub fn resolve_fqn_path(fqn: &FqnExpr, module_paths: &[PathBuf]) -> Option<PathBuf> {
    let relative = fqn_relative_path(fqn);
    if relative.is_absolute() && relative.exists() {
        return Some(relative);
    }
    for root in module_paths {
        let candidate = root.join(&relative);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Per-interpreter-instance cache: FQN cache key -> loaded module (spec
/// §3.5). Populated with native modules at startup, and with user modules
/// on first resolution.
#[derive(Default)]
pub struct ModuleCache {
    modules: FxHashMap<String, Rc<ModuleValue>>,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Rc<ModuleValue>> {
        self.modules.get(key).cloned()
    }

    pub fn insert(&mut self, key: impl Into<String>, module: Rc<ModuleValue>) {
        self.modules.insert(key.into(), module);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.modules.contains_key(key)
    }
}

/// name -> record-info registry, maintained across every module evaluated
/// by one interpreter instance (spec §4.6 `record_types`).
#[derive(Default)]
pub struct RecordTypeRegistry {
    records: FxHashMap<String, RecordInfo>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, info: RecordInfo) {
        self.records.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&RecordInfo> {
        self.records.get(name)
    }
}

/// A single native function export: arity plus the function it invokes
/// (spec §4.7.1).
pub struct NativeExport {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

/// Builds a native module value from a package/module name and its
/// exports, for installation into the module cache at startup.
pub fn build_native_module(package: &[&str], module: &str, exports: Vec<NativeExport>) -> (String, Rc<ModuleValue>) {
    use crate::value::{FunctionBody, FunctionValue, Value};

    let fqn = package.iter().chain(std::iter::once(&module)).map(|s| s.to_string()).collect::<Vec<_>>();
    let key = fqn.join("/");
    let mut export_map = FxHashMap::default();
    for export in exports {
        let function = Value::Function(Rc::new(FunctionValue {
            name: Some(export.name.to_string()),
            arity: export.arity,
            partial: Vec::new(),
            body: FunctionBody::Native(export.func),
            constructor_fields: None,
        }));
        export_map.insert(export.name.to_string(), function);
    }
    let module_value =
        Rc::new(ModuleValue { fqn, exports: export_map, records: FxHashMap::default() });
    (key, module_value)
}

pub fn default_module_paths() -> Vec<PathBuf> {
    match std::env::var_os("YONA_PATH") {
        Some(val) => std::env::split_paths(&val).collect(),
        None => Vec::new(),
    }
}

pub fn is_yona_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqn_relative_path_joins_package_and_module() {
        let fqn = FqnExpr::new(vec!["Std".into()], "List");
        let path = fqn_relative_path(&fqn);
        assert_eq!(path, PathBuf::from("Std").join("List.yona"));
    }

    #[test]
    fn cache_key_is_slash_joined() {
        let fqn = FqnExpr::new(vec!["Std".into(), "Collections".into()], "List");
        assert_eq!(cache_key(&fqn), "Std/Collections/List");
    }
}
