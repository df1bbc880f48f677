use std::sync::{Arc, Mutex, MutexGuard};

/// Fields a [`Resource`]'s lock guards, only ever touched while it is held
#[derive(Debug, Default)]
struct Record {
  value: Vec<u8>,
  updating: bool,
}

/// A named local record mirroring the value a remote CoAP server holds.
///
/// `host` is the endpoint the value is retrieved from, `path` the Uri-Path
/// the endpoint serves it under. The stored value and the `updating` flag
/// live behind a lock; every accessor takes it internally, so a `Resource`
/// can be shared freely across threads.
///
/// The retrieval core SETS `updating` (after a request has left the wire)
/// and never clears it - clearing is the job of whichever collaborator
/// consumes the freshly stored value. The flag is advisory for outside
/// readers, not a gate inside this crate.
#[derive(Debug)]
pub struct Resource {
  host: String,
  path: String,
  record: Mutex<Record>,
}

impl Resource {
  /// Create a record for the value `host` serves under `path`
  pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
    Self { host: host.into(),
           path: path.into(),
           record: Mutex::new(Record::default()) }
  }

  /// The host string the remote endpoint resolves from
  pub fn host(&self) -> &str {
    &self.host
  }

  /// The Uri-Path the remote endpoint serves this resource under
  pub fn path(&self) -> &str {
    &self.path
  }

  /// A copy of the last stored value
  pub fn value(&self) -> Vec<u8> {
    self.lock().value.clone()
  }

  /// Is a retrieval currently in flight for this record?
  pub fn is_updating(&self) -> bool {
    self.lock().updating
  }

  /// Store a freshly retrieved value.
  ///
  /// Safe to call from any thread and from transport callbacks: the
  /// record's lock is taken here, callers never pre-lock. Two concurrent
  /// calls serialize; their writes never interleave.
  pub fn set_value(&self, data: &[u8]) {
    let mut record = self.lock();
    record.value.clear();
    record.value.extend_from_slice(data);
  }

  pub(crate) fn mark_updating(&self) {
    self.lock().updating = true;
  }

  fn lock(&self) -> MutexGuard<'_, Record> {
    // a panic mid-write leaves a stale value, not a torn one
    self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

/// The shared set of local records.
///
/// Shared with the rest of the system; lookups and registration serialize
/// on an internal lock.
#[derive(Debug, Default)]
pub struct Registry {
  resources: Mutex<Vec<Arc<Resource>>>,
}

impl Registry {
  /// Create an empty registry
  pub fn new() -> Self {
    Default::default()
  }

  /// Add a record, yielding the shared handle to it
  pub fn register(&self, resource: Resource) -> Arc<Resource> {
    let handle = Arc::new(resource);
    self.lock().push(Arc::clone(&handle));
    handle
  }

  /// Look a record up by the exact bytes of its path.
  ///
  /// The path is compared with its explicit length - no terminator is
  /// assumed on either side.
  pub fn find_by_path(&self, path: &[u8]) -> Option<Arc<Resource>> {
    self.lock()
        .iter()
        .find(|resource| resource.path.as_bytes() == path)
        .map(Arc::clone)
  }

  fn lock(&self) -> MutexGuard<'_, Vec<Arc<Resource>>> {
    self.resources
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
