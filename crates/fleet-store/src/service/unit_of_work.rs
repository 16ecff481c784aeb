use super::{decode_id, encode, find_document, read_document, scan_documents, RecordSource};
use crate::domain::document::Document;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use fleet_types::EntityId;
use std::collections::BTreeMap;

/// Staged changes of one atomic operation.
///
/// Reads consult staged writes first, so a cascade sees its own updates.
/// `None` in `staged` marks a pending delete.
pub struct UnitOfWork<'a, KV: KeyValueStore> {
    kv: &'a KV,
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, KV: KeyValueStore> UnitOfWork<'a, KV> {
    pub(crate) fn new(kv: &'a KV) -> Self {
        Self {
            kv,
            staged: BTreeMap::new(),
        }
    }

    pub fn get<D: Document>(&self, id: &EntityId) -> Result<Option<D>, StoreError> {
        read_document(self, id)
    }

    pub fn find_unique<D: Document>(&self, value: &str) -> Result<Option<D>, StoreError> {
        find_document(self, value)
    }

    pub fn all<D: Document>(&self) -> Result<Vec<D>, StoreError> {
        scan_documents(self)
    }

    /// Stage an insert or replacement of `doc`, maintaining its unique index.
    ///
    /// Fails with [`StoreError::UniqueViolation`] when the unique value is
    /// already held by a different entity.
    pub fn put<D: Document>(&mut self, doc: &D) -> Result<(), StoreError> {
        let id = doc.id();
        let value = doc.unique_value();
        let index_key = D::UNIQUE_INDEX.key(value.as_bytes());

        if let Some(owner) = self.read_raw(&index_key)? {
            if decode_id::<D>(&owner)? != id {
                return Err(StoreError::UniqueViolation {
                    kind: D::KIND,
                    field: D::UNIQUE_FIELD,
                    value: value.to_string(),
                });
            }
        }

        if let Some(previous) = self.get::<D>(&id)? {
            if previous.unique_value() != value {
                self.staged.insert(
                    D::UNIQUE_INDEX.key(previous.unique_value().as_bytes()),
                    None,
                );
            }
        }

        let bytes = encode(doc)?;
        self.staged
            .insert(index_key, Some(id.to_string().into_bytes()));
        self.staged.insert(D::PREFIX.id_key(&id), Some(bytes));
        Ok(())
    }

    /// Stage removal of a document and its index entry.
    ///
    /// Returns the removed document, or `None` if it did not exist.
    pub fn delete<D: Document>(&mut self, id: &EntityId) -> Result<Option<D>, StoreError> {
        let Some(previous) = self.get::<D>(id)? else {
            return Ok(None);
        };
        self.staged
            .insert(D::UNIQUE_INDEX.key(previous.unique_value().as_bytes()), None);
        self.staged.insert(D::PREFIX.id_key(id), None);
        Ok(Some(previous))
    }

    pub(crate) fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Write every staged change in one batch. Returns the batch size.
    pub(crate) fn commit(self) -> Result<usize, StoreError> {
        let operations: Vec<BatchOperation> = self
            .staged
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::put(key, value),
                None => BatchOperation::delete(key),
            })
            .collect();
        let count = operations.len();
        if count > 0 {
            self.kv.atomic_batch_write(operations)?;
        }
        Ok(count)
    }
}

impl<KV: KeyValueStore> RecordSource for UnitOfWork<'_, KV> {
    fn read_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.kv.get(key)?),
        }
    }

    fn scan_raw(&self, prefix: &[u8]) -> Result<ScanResult, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.kv.prefix_scan(prefix)?.into_iter().collect();
        for (key, value) in self
            .staged
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
