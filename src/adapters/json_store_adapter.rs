//! JSON file user store adapter.
//!
//! The whole store is one JSON object keyed by user id. Small enough to
//! rewrite wholesale on every mutation, which keeps the durability story
//! simple: write a sibling temp file, then rename over the store.

use crate::domain::error::SahambotError;
use crate::domain::user::UserRecord;
use crate::ports::store_port::UserStorePort;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct JsonStoreAdapter {
    path: PathBuf,
    // Held across the whole load-apply-save cycle in `update`.
    lock: Mutex<()>,
}

impl JsonStoreAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load_all(&self) -> Result<BTreeMap<String, UserRecord>, SahambotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            // A store that does not exist yet is an empty store.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SahambotError::Store {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| SahambotError::StoreCorrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save_all(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), SahambotError> {
        let json = serde_json::to_string_pretty(users).map_err(|e| SahambotError::Store {
            reason: format!("serialization failed: {}", e),
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| SahambotError::Store {
            reason: format!("failed to write {}: {}", tmp_path.display(), e),
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            SahambotError::Store {
                reason: format!("atomic rename failed: {}", e),
            }
        })
    }
}

impl UserStorePort for JsonStoreAdapter {
    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, SahambotError> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load_all()?.remove(user_id))
    }

    fn put(&self, record: &UserRecord) -> Result<(), SahambotError> {
        let _guard = self.lock.lock().unwrap();
        let mut users = self.load_all()?;
        users.insert(record.user_id.clone(), record.clone());
        self.save_all(&users)
    }

    fn update(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, SahambotError> {
        let _guard = self.lock.lock().unwrap();
        let mut users = self.load_all()?;
        let record = apply(users.remove(user_id));
        users.insert(user_id.to_string(), record.clone());
        self.save_all(&users)?;
        Ok(record)
    }

    fn count(&self) -> Result<usize, SahambotError> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load_all()?.len())
    }
}
