//! Module record (§3 Data Model, §4.6 Module Layer).
//!
//! One [`ModuleRecord`] per file. The binder crate (`stypec-binder`) is
//! responsible for populating these; this crate only defines the shape,
//! the same way it defines [`crate::Env`] and [`crate::TypeMap`] without
//! deciding when they're written to.

use rustc_hash::FxHashMap;
use stypec_types::Ty;

/// A single `declare module "path" { ... }` augmentation's contribution:
/// extra exported members merged into the target module after its own
/// checking completes.
#[derive(Debug, Default, Clone)]
pub struct ModuleAugmentation {
    pub members: FxHashMap<String, Ty>,
}

#[derive(Debug, Default)]
pub struct ModuleRecord {
    pub path: String,
    pub exports: FxHashMap<String, Ty>,
    pub default_export: Option<Ty>,
    pub export_assignment: Option<Ty>,
    pub has_export_assignment: bool,
    /// Keyed by the target module path named in `declare module "..."`.
    pub module_augmentations: FxHashMap<String, ModuleAugmentation>,
    /// Ambient `declare module "path" { ... }` blocks that *define* a module
    /// rather than augment an existing one (the target path never resolves
    /// to a real file).
    pub ambient_modules: FxHashMap<String, FxHashMap<String, Ty>>,
    /// `declare global { ... }` bodies collected for merging into the root
    /// environment once every module in the session has been bound.
    pub global_augmentations: Vec<FxHashMap<String, Ty>>,
}

impl ModuleRecord {
    pub fn new(path: impl Into<String>) -> Self {
        ModuleRecord { path: path.into(), ..Default::default() }
    }

    /// Looks up an exported member, first in the module's own export table
    /// and then in any augmentations targeting it.
    pub fn resolve_export(&self, name: &str) -> Option<Ty> {
        if let Some(ty) = self.exports.get(name) {
            return Some(ty.clone());
        }
        for augmentation in self.module_augmentations.values() {
            if let Some(ty) = augmentation.members.get(name) {
                return Some(ty.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stypec_types::TypeInfo;

    #[test]
    fn resolves_own_export_before_augmentation() {
        let mut record = ModuleRecord::new("a.ts");
        record.exports.insert("x".into(), TypeInfo::primitive(stypec_types::PrimitiveKind::Number));
        assert!(record.resolve_export("x").is_some());
        assert!(record.resolve_export("y").is_none());
    }

    #[test]
    fn resolves_through_augmentation() {
        let mut record = ModuleRecord::new("a.ts");
        let mut augmentation = ModuleAugmentation::default();
        augmentation.members.insert("y".into(), TypeInfo::any());
        record.module_augmentations.insert("a.ts".into(), augmentation);
        assert!(record.resolve_export("y").is_some());
    }
}
