//! # Entity Store Service
//!
//! Typed document access over a [`KeyValueStore`].
//!
//! Reads outside a unit of work see the last committed state. All writes
//! happen inside [`EntityStore::transact`], which runs one writer at a time.

mod unit_of_work;

pub use unit_of_work::UnitOfWork;

use crate::domain::document::Document;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{KeyValueStore, ScanResult};
use fleet_types::EntityId;
use parking_lot::Mutex;
use tracing::debug;

/// Document store shared by the lifecycle services.
pub struct EntityStore<KV: KeyValueStore> {
    kv: KV,
    /// Serializes writers so staged reads stay valid until commit.
    writer: Mutex<()>,
}

impl<KV: KeyValueStore> EntityStore<KV> {
    pub fn new(kv: KV) -> Self {
        Self {
            kv,
            writer: Mutex::new(()),
        }
    }

    /// Fetch a committed document by id.
    pub fn get<D: Document>(&self, id: &EntityId) -> Result<Option<D>, StoreError> {
        read_document(self, id)
    }

    /// Fetch a committed document by its unique key.
    pub fn find_unique<D: Document>(&self, value: &str) -> Result<Option<D>, StoreError> {
        find_document(self, value)
    }

    /// All committed documents of one family, unordered.
    pub fn all<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        scan_documents(self)
    }

    /// Run `work` as one atomic unit.
    ///
    /// Changes staged by `work` are written in a single batch when it
    /// returns `Ok`. When it returns `Err`, or the commit itself fails,
    /// nothing is written.
    pub fn transact<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut UnitOfWork<'_, KV>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.writer.lock();
        let mut uow = UnitOfWork::new(&self.kv);
        match work(&mut uow) {
            Ok(value) => {
                let staged = uow.commit()?;
                debug!(operations = staged, "Unit of work committed");
                Ok(value)
            }
            Err(err) => {
                debug!(discarded = uow.staged_len(), "Unit of work rolled back");
                Err(err)
            }
        }
    }
}

/// Raw record access shared by committed reads and units of work.
pub(crate) trait RecordSource {
    fn read_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn scan_raw(&self, prefix: &[u8]) -> Result<ScanResult, StoreError>;
}

impl<KV: KeyValueStore> RecordSource for EntityStore<KV> {
    fn read_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.kv.get(key)?)
    }

    fn scan_raw(&self, prefix: &[u8]) -> Result<ScanResult, StoreError> {
        Ok(self.kv.prefix_scan(prefix)?)
    }
}

pub(crate) fn encode<D: Document>(doc: &D) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(doc).map_err(|e| StoreError::Encode {
        kind: D::KIND,
        message: e.to_string(),
    })
}

pub(crate) fn decode<D: Document>(bytes: &[u8]) -> Result<D, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode {
        kind: D::KIND,
        message: e.to_string(),
    })
}

pub(crate) fn decode_id<D: Document>(bytes: &[u8]) -> Result<EntityId, StoreError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|raw| EntityId::parse_str(raw).ok())
        .ok_or_else(|| StoreError::Decode {
            kind: D::KIND,
            message: "index entry is not a valid id".to_string(),
        })
}

pub(crate) fn read_document<D: Document>(
    source: &impl RecordSource,
    id: &EntityId,
) -> Result<Option<D>, StoreError> {
    source
        .read_raw(&D::PREFIX.id_key(id))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

pub(crate) fn find_document<D: Document>(
    source: &impl RecordSource,
    value: &str,
) -> Result<Option<D>, StoreError> {
    match source.read_raw(&D::UNIQUE_INDEX.key(value.as_bytes()))? {
        Some(bytes) => {
            let id = decode_id::<D>(&bytes)?;
            read_document(source, &id)
        }
        None => Ok(None),
    }
}

pub(crate) fn scan_documents<D: Document>(
    source: &impl RecordSource,
) -> Result<Vec<D>, StoreError> {
    source
        .scan_raw(D::PREFIX.as_bytes())?
        .iter()
        .map(|(_, bytes)| decode(bytes))
        .collect()
}
