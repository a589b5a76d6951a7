//! Record-type registry: name -> declared field list and field types,
//! consulted when inferring record instantiation, field access, and field
//! update (spec §4.5 "For records...").

use rustc_hash::FxHashMap;

use yona_types::Ty;

#[derive(Debug, Clone)]
pub struct RecordInfo {
    pub name: String,
    pub fields: Vec<(String, Ty)>,
}

impl RecordInfo {
    pub fn field_type(&self, name: &str) -> Option<&Ty> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

#[derive(Debug, Default)]
pub struct RecordRegistry {
    records: FxHashMap<String, RecordInfo>,
}

impl RecordRegistry {
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
