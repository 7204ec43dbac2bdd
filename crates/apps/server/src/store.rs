use std::path::PathBuf;
use tokio::sync::Mutex;

pub const ZONES_FILE_NAME: &str = "zones.json";

/// The persisted zones document. All access goes through one lock.
pub struct ZonesFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ZonesFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Creates the data directory and seeds an empty FeatureCollection when
    /// the file is missing. Returns `true` if it seeded.
    pub async fn ensure_exists(&self) -> Result<bool, String> {
        let _g = self.lock.lock().await;
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.write_unlocked(&formats::empty_collection_string())
                    .await?;
                Ok(true)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    pub async fn read(&self) -> Result<String, String> {
        let _g = self.lock.lock().await;
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(formats::empty_collection_string())
            }
            Err(e) => Err(e.to_string()),
        }
    }

    pub async fn write(&self, document: &str) -> Result<(), String> {
        let _g = self.lock.lock().await;
        self.write_unlocked(document).await
    }

    async fn write_unlocked(&self, document: &str) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, document)
            .await
            .map_err(|e| e.to_string())?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
