use crate::dict::aggregate::AggregateConfig;
use crate::dict::export::write_export;
use crate::dict::record::{
    is_reserved, parse_entry, FieldValue, Record, CREATE_TIME_FIELD, CREATE_TIME_FORMAT, ID_FIELD,
};
use crate::dict::schema::{columns_from_headers, infer_columns, parse_header_list, ColumnSpec};
use crate::dict::{DictError, Result};
use crate::store::KvStore;
use chrono::{Local, Utc};
use hashlink::LinkedHashMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DICT_DATA_KEY: &str = "dict_data";
pub const AGGREGATE_CONFIGS_KEY: &str = "dict_aggregate_configs";
/// Header lists of collections created without data.
pub const SCHEMAS_KEY: &str = "dict_schemas";

/// Every collection by name, in creation order.
pub type Collections = LinkedHashMap<String, Vec<Record>>;
pub type AggregateConfigs = LinkedHashMap<String, AggregateConfig>;
pub type Schemas = LinkedHashMap<String, Vec<String>>;

/// Access to the persisted collections. All mutations rewrite the whole
/// `dict_data` value; the last writer wins.
pub struct DictRepository<S> {
    store: S,
}

impl<S: KvStore> DictRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> Result<Collections> {
        Ok(self.store.load(DICT_DATA_KEY)?.unwrap_or_default())
    }

    fn save(&self, data: &Collections) -> Result<()> {
        self.store.save(DICT_DATA_KEY, data)
    }

    fn schemas(&self) -> Result<Schemas> {
        Ok(self.store.load(SCHEMAS_KEY)?.unwrap_or_default())
    }

    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.load()?.contains_key(name))
    }

    /// Records of `name`; an unknown collection is simply empty.
    pub fn collection(&self, name: &str) -> Result<Vec<Record>> {
        Ok(self.load()?.remove(name).unwrap_or_default())
    }

    /// Header list given when `name` was created without data.
    pub fn schema(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self.schemas()?.remove(name))
    }

    /// Columns for `name`: inferred from its first record, or taken from the
    /// header list of an empty collection.
    pub fn columns(&self, name: &str, with_action: bool) -> Result<Vec<ColumnSpec>> {
        let records = self.collection(name)?;
        if !records.is_empty() {
            return Ok(infer_columns(&records, with_action));
        }
        Ok(self
            .schema(name)?
            .map(|headers| columns_from_headers(&headers, with_action))
            .unwrap_or_default())
    }

    /// Parse `json` (an array of objects) and store its entries as the
    /// records of `name`. An existing collection of that name is replaced in
    /// place. Returns the stored records.
    pub fn import_json(&self, name: &str, json: &str) -> Result<Vec<Record>> {
        let name = collection_name(name, "keyword")?;
        if json.trim().is_empty() {
            return Err(DictError::MissingField("JSON data"));
        }
        let entries = parse_entry(json)?;
        if entries.is_empty() {
            return Err(DictError::MissingField("at least one entry"));
        }
        let mut data = self.load()?;
        let stamped = stamp_records(&[], entries);
        if let Some(slot) = data.get_mut(name) {
            *slot = stamped.clone();
        } else {
            data.insert(name.to_string(), stamped.clone());
        }
        self.save(&data)?;
        tracing::info!(collection = name, count = stamped.len(), "imported records");
        Ok(stamped)
    }

    /// Add one record built from form values.
    pub fn add_record<I, K, V>(&self, name: &str, fields: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let name = collection_name(name, "keyword")?;
        let entry: Record = fields
            .into_iter()
            .map(|(k, v)| -> (String, FieldValue) { (k.into(), v.into()) })
            .filter(|(k, _)| !is_reserved(k))
            .collect();
        let mut data = self.load()?;
        let mut stamped = {
            let existing = data.get(name).map(Vec::as_slice).unwrap_or(&[]);
            stamp_records(existing, vec![entry])
        };
        let record = stamped.remove(0);
        append(&mut data, name, vec![record.clone()]);
        self.save(&data)?;
        Ok(record)
    }

    /// Overwrite the data fields of record `id`. `_id` and `createTime`
    /// never change.
    pub fn update_record<I, K, V>(&self, name: &str, id: &str, fields: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut data = self.load()?;
        let records = data
            .get_mut(name)
            .ok_or_else(|| DictError::UnknownCollection(name.to_string()))?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| DictError::UnknownRecord(id.to_string()))?;
        for (k, v) in fields {
            let k = k.into();
            if !is_reserved(&k) {
                record.insert(k, v);
            }
        }
        let updated = record.clone();
        self.save(&data)?;
        Ok(updated)
    }

    /// Remove the records whose `_id` is in `ids`. A collection left empty
    /// is dropped unless it was created from a header list.
    pub fn delete_records(&self, name: &str, ids: &[String]) -> Result<usize> {
        let mut data = self.load()?;
        let Some(records) = data.get_mut(name) else {
            return Err(DictError::UnknownCollection(name.to_string()));
        };
        let before = records.len();
        records.retain(|r| !r.id().is_some_and(|id| ids.iter().any(|x| x == id)));
        let removed = before - records.len();
        if records.is_empty() && self.schema(name)?.is_none() {
            data.remove(name);
        }
        self.save(&data)?;
        tracing::info!(collection = name, removed, "deleted records");
        Ok(removed)
    }

    /// Drop `name` with its header list and aggregate config. Returns
    /// whether the collection existed.
    pub fn clear_collection(&self, name: &str) -> Result<bool> {
        let mut data = self.load()?;
        let existed = data.remove(name).is_some();
        self.save(&data)?;

        let mut schemas = self.schemas()?;
        if schemas.remove(name).is_some() {
            self.store.save(SCHEMAS_KEY, &schemas)?;
        }
        self.remove_aggregate_config(name)?;
        tracing::info!(collection = name, existed, "cleared collection");
        Ok(existed)
    }

    /// Create an empty collection whose columns come from `header_text`.
    pub fn create_collection(&self, name: &str, header_text: &str) -> Result<Vec<ColumnSpec>> {
        let name = collection_name(name, "collection name")?;
        let headers = parse_header_list(header_text);
        if headers.is_empty() {
            return Err(DictError::EmptyHeaders);
        }
        let mut data = self.load()?;
        if data.contains_key(name) {
            return Err(DictError::DuplicateCollection(name.to_string()));
        }
        data.insert(name.to_string(), Vec::new());
        let mut schemas = self.schemas()?;
        schemas.insert(name.to_string(), headers.clone());
        self.save(&data)?;
        self.store.save(SCHEMAS_KEY, &schemas)?;
        tracing::info!(collection = name, columns = headers.len(), "created collection");
        Ok(columns_from_headers(&headers, true))
    }

    pub fn aggregate_configs(&self) -> Result<AggregateConfigs> {
        Ok(self.store.load(AGGREGATE_CONFIGS_KEY)?.unwrap_or_default())
    }

    /// Saved config for `name`; empty when none was saved.
    pub fn aggregate_config(&self, name: &str) -> Result<AggregateConfig> {
        Ok(self.aggregate_configs()?.remove(name).unwrap_or_default())
    }

    pub fn save_aggregate_config(&self, name: &str, config: &AggregateConfig) -> Result<()> {
        let mut configs = self.aggregate_configs()?;
        if let Some(slot) = configs.get_mut(name) {
            *slot = config.clone();
        } else {
            configs.insert(name.to_string(), config.clone());
        }
        self.store.save(AGGREGATE_CONFIGS_KEY, &configs)
    }

    pub fn remove_aggregate_config(&self, name: &str) -> Result<()> {
        let mut configs = self.aggregate_configs()?;
        if configs.remove(name).is_some() {
            self.store.save(AGGREGATE_CONFIGS_KEY, &configs)?;
        }
        Ok(())
    }

    /// Write `name` to `<dir>/<name>_data.json` and return the path.
    pub fn export_collection(&self, name: &str, dir: &Path) -> Result<PathBuf> {
        let data = self.load()?;
        let records = data
            .get(name)
            .ok_or_else(|| DictError::UnknownCollection(name.to_string()))?;
        write_export(name, records, dir)
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(DictError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// A required collection name that is safe to use as a file name stem.
fn collection_name<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    let value = required(value, field)?;
    if is_safe_name(value) {
        Ok(value)
    } else {
        Err(DictError::InvalidName(value.to_string()))
    }
}

pub(crate) fn is_safe_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

fn append(data: &mut Collections, name: &str, records: Vec<Record>) {
    if let Some(list) = data.get_mut(name) {
        list.extend(records);
    } else {
        data.insert(name.to_string(), records);
    }
}

/// Give each entry an `_id` of `<millis>-<index>` unique among `existing`
/// and the current `createTime`. `_id` comes first and `createTime` last.
fn stamp_records(existing: &[Record], entries: Vec<Record>) -> Vec<Record> {
    let millis = Utc::now().timestamp_millis();
    let created = Local::now().format(CREATE_TIME_FORMAT).to_string();
    let mut taken: HashSet<String> = existing
        .iter()
        .filter_map(|r| r.id().map(str::to_string))
        .collect();
    let mut seq = 0usize;
    entries
        .into_iter()
        .map(|entry| {
            let mut id = format!("{millis}-{seq}");
            while taken.contains(&id) {
                seq += 1;
                id = format!("{millis}-{seq}");
            }
            seq += 1;
            taken.insert(id.clone());

            let mut record = Record::new();
            record.insert(ID_FIELD, id);
            for (k, v) in entry.data_fields() {
                record.insert(k, v.clone());
            }
            record.insert(CREATE_TIME_FIELD, created.clone());
            record
        })
        .collect()
}
