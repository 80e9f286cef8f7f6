//! File system backed persistence collaborator.
//!
//! Layout of a collection directory:
//!
//! ```text
//! my-api/
//! ├── collection.json        { id, name, schema_version }
//! ├── ping.json              { id, name, payload, schema_version, seq }
//! └── users/
//!     ├── folder.json        { id, name, schema_version }
//!     └── list.json
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use arbor_application::ports::{FileSystem, PersistenceCollaborator, PersistenceError};
use arbor_domain::collection::REQUEST_EXTENSION;
use arbor_domain::{
    Collection, Folder, Item, ItemKind, Request, SeqAssignment, Uid, generate_id, path,
};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::records::{
    COLLECTION_FILE, CURRENT_SCHEMA_VERSION, CollectionRecord, FOLDER_FILE, FolderRecord,
    RequestRecord,
};
use crate::serialization::{from_json, to_json_stable};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Stores a collection as a directory of JSON files.
pub struct FileSystemPersistence<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> FileSystemPersistence<F> {
    /// Creates a new store with the given file system implementation.
    #[must_use]
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Creates an empty collection at `root`.
    ///
    /// # Errors
    /// Returns `AlreadyExists` if `root` already holds a collection.
    pub async fn init_collection(
        &self,
        root: &str,
        name: &str,
    ) -> Result<Collection, PersistenceError> {
        let root = path::normalize(root);
        let metadata = path::join(&[root.as_str(), COLLECTION_FILE]);
        self.ensure_absent(&metadata).await?;

        let collection = Collection::new(name.trim(), root.as_str());
        self.fs.create_dir_all(Path::new(&root)).await?;
        self.save_json(&metadata, &CollectionRecord::from(&collection))
            .await?;

        info!(root = %root, name = %collection.name, "collection initialized");
        Ok(collection)
    }

    async fn ensure_absent(&self, path: &str) -> Result<(), PersistenceError> {
        if self.fs.exists(Path::new(path)).await {
            return Err(PersistenceError::AlreadyExists(path.to_string()));
        }
        Ok(())
    }

    async fn ensure_present(&self, path: &str) -> Result<(), PersistenceError> {
        if !self.fs.exists(Path::new(path)).await {
            return Err(PersistenceError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn load_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PersistenceError> {
        let content = self.fs.read_file_string(Path::new(path)).await?;
        Ok(from_json(&content)?)
    }

    async fn save_json<T: Serialize + Sync>(
        &self,
        path: &str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let json = to_json_stable(value)?;
        self.fs.write_file(Path::new(path), json.as_bytes()).await?;
        Ok(())
    }

    /// Reads every folder and request file directly inside `dir`.
    ///
    /// Unreadable request files are skipped with a warning.
    fn load_items<'a>(&'a self, dir: &'a str) -> BoxFuture<'a, Result<Vec<Item>, PersistenceError>> {
        Box::pin(async move {
            let request_suffix = format!(".{REQUEST_EXTENSION}");
            let mut items = Vec::new();

            for entry in self.fs.read_dir(Path::new(dir)).await? {
                let Some(filename) = entry.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if filename.starts_with('.') || filename == FOLDER_FILE || filename == COLLECTION_FILE
                {
                    continue;
                }
                let pathname = path::join(&[dir, filename]);

                if self.fs.is_dir(&entry).await {
                    let folder = self.load_folder(&pathname, filename.to_string()).await?;
                    items.push(folder.into());
                } else if filename.ends_with(&request_suffix) {
                    match self.load_json::<RequestRecord>(&pathname).await {
                        Ok(record) => items.push(
                            Request {
                                uid: record.id,
                                name: record.name,
                                filename: filename.to_string(),
                                pathname,
                                seq: record.seq,
                                payload: record.payload,
                            }
                            .into(),
                        ),
                        Err(error) => {
                            warn!(path = %pathname, %error, "skipping unreadable request file");
                        }
                    }
                }
            }
            Ok(items)
        })
    }

    async fn load_folder(&self, pathname: &str, filename: String) -> Result<Folder, PersistenceError> {
        let metadata = path::join(&[pathname, FOLDER_FILE]);
        let record = if self.fs.exists(Path::new(&metadata)).await {
            self.load_json(&metadata).await?
        } else {
            let record = FolderRecord {
                id: generate_id(),
                name: filename.clone(),
                schema_version: CURRENT_SCHEMA_VERSION,
            };
            self.save_json(&metadata, &record).await?;
            info!(path = %pathname, uid = %record.id, "wrote missing folder metadata");
            record
        };
        let FolderRecord { id: uid, name, .. } = record;

        Ok(Folder {
            uid,
            name,
            filename,
            pathname: pathname.to_string(),
            items: self.load_items(pathname).await?,
        })
    }

    /// Writes a folder subtree from memory, rooted at `dest`.
    fn write_folder<'a>(
        &'a self,
        folder: &'a Folder,
        dest: &'a str,
    ) -> BoxFuture<'a, Result<(), PersistenceError>> {
        Box::pin(async move {
            self.fs.create_dir_all(Path::new(dest)).await?;
            self.save_json(&path::join(&[dest, FOLDER_FILE]), &FolderRecord::from(folder))
                .await?;

            for child in &folder.items {
                let child_path = path::join(&[dest, child.filename()]);
                match child {
                    Item::Folder(sub) => self.write_folder(sub, &child_path).await?,
                    Item::Request(request) => {
                        self.save_json(&child_path, &RequestRecord::from(request))
                            .await?;
                    }
                }
            }
            Ok(())
        })
    }

    /// Gives every item whose uid was already seen a fresh one and writes it
    /// back, so copied files stop sharing an identity.
    async fn reassign_duplicate_uids(
        &self,
        collection: &mut Collection,
    ) -> Result<(), PersistenceError> {
        let mut seen = HashSet::from([collection.uid.clone()]);
        let mut reassigned = Vec::new();
        claim_uids(&mut collection.items, &mut seen, &mut reassigned);

        for (pathname, kind, previous, uid) in reassigned {
            match kind {
                ItemKind::Folder => {
                    let metadata = path::join(&[pathname.as_str(), FOLDER_FILE]);
                    let mut record: FolderRecord = self.load_json(&metadata).await?;
                    record.id.clone_from(&uid);
                    self.save_json(&metadata, &record).await?;
                }
                ItemKind::Request => {
                    let mut record: RequestRecord = self.load_json(&pathname).await?;
                    record.id.clone_from(&uid);
                    self.save_json(&pathname, &record).await?;
                }
            }
            warn!(path = %pathname, %previous, %uid, "reassigned duplicate uid");
        }
        Ok(())
    }

    async fn rewrite_name(
        &self,
        pathname: &str,
        uid: &str,
        name: &str,
    ) -> Result<(), PersistenceError> {
        if self.fs.is_dir(Path::new(pathname)).await {
            let metadata = path::join(&[pathname, FOLDER_FILE]);
            let record = if self.fs.exists(Path::new(&metadata)).await {
                let mut record: FolderRecord = self.load_json(&metadata).await?;
                record.name = name.to_string();
                record
            } else {
                FolderRecord {
                    id: uid.to_string(),
                    name: name.to_string(),
                    schema_version: CURRENT_SCHEMA_VERSION,
                }
            };
            self.save_json(&metadata, &record).await
        } else {
            let mut record: RequestRecord = self.load_json(pathname).await?;
            record.name = name.to_string();
            self.save_json(pathname, &record).await
        }
    }
}

/// Walks items in load order. The first holder of a uid keeps it.
fn claim_uids(
    items: &mut [Item],
    seen: &mut HashSet<Uid>,
    reassigned: &mut Vec<(String, ItemKind, Uid, Uid)>,
) {
    for item in items {
        if !seen.insert(item.uid().to_string()) {
            let uid = generate_id();
            let previous = match item {
                Item::Folder(folder) => std::mem::replace(&mut folder.uid, uid.clone()),
                Item::Request(request) => std::mem::replace(&mut request.uid, uid.clone()),
            };
            seen.insert(uid.clone());
            reassigned.push((item.pathname().to_string(), item.kind(), previous, uid));
        }
        if let Item::Folder(folder) = item {
            claim_uids(&mut folder.items, seen, reassigned);
        }
    }
}

#[async_trait]
impl<F: FileSystem> PersistenceCollaborator for FileSystemPersistence<F> {
    async fn persist_move(
        &self,
        old_path: &str,
        new_parent_dir: &str,
        kind: ItemKind,
    ) -> Result<(), PersistenceError> {
        let target = path::join(&[new_parent_dir, path::basename(old_path).as_str()]);
        self.ensure_present(old_path).await?;
        self.ensure_absent(&target).await?;

        self.fs.create_dir_all(Path::new(new_parent_dir)).await?;
        self.fs.rename(Path::new(old_path), Path::new(&target)).await?;
        debug!(%kind, from = old_path, to = %target, "moved");
        Ok(())
    }

    async fn persist_resequence(&self, items: &[SeqAssignment]) -> Result<(), PersistenceError> {
        for item in items {
            let mut record: RequestRecord = self.load_json(&item.pathname).await?;
            record.seq = item.seq;
            self.save_json(&item.pathname, &record).await?;
        }
        debug!(count = items.len(), "resequenced requests");
        Ok(())
    }

    async fn persist_rename(
        &self,
        uid: &str,
        old_path: &str,
        new_path: &str,
        new_name: Option<&str>,
        _new_filename: Option<&str>,
    ) -> Result<(), PersistenceError> {
        if old_path != new_path {
            self.ensure_present(old_path).await?;
            self.ensure_absent(new_path).await?;
            self.fs.rename(Path::new(old_path), Path::new(new_path)).await?;
        }
        if let Some(name) = new_name {
            self.rewrite_name(new_path, uid, name).await?;
        }
        debug!(from = old_path, to = new_path, "renamed");
        Ok(())
    }

    async fn persist_create(&self, path: &str, item: &Item) -> Result<(), PersistenceError> {
        self.ensure_absent(path).await?;
        match item {
            Item::Request(request) => {
                self.save_json(path, &RequestRecord::from(request)).await?;
            }
            Item::Folder(folder) => self.write_folder(folder, path).await?,
        }
        debug!(kind = %item.kind(), path, "created");
        Ok(())
    }

    async fn persist_delete(&self, path: &str, kind: ItemKind) -> Result<(), PersistenceError> {
        let target = Path::new(path);
        match kind {
            ItemKind::Folder => self.fs.remove_dir_all(target).await?,
            ItemKind::Request => self.fs.remove_file(target).await?,
        }
        debug!(%kind, path, "deleted");
        Ok(())
    }

    async fn persist_clone_folder(
        &self,
        folder: &Folder,
        dest_path: &str,
    ) -> Result<(), PersistenceError> {
        self.ensure_absent(dest_path).await?;
        self.write_folder(folder, dest_path).await?;
        debug!(dest = dest_path, "folder cloned");
        Ok(())
    }

    async fn load_collection(&self, root: &str) -> Result<Collection, PersistenceError> {
        let root = path::normalize(root);
        let metadata = path::join(&[root.as_str(), COLLECTION_FILE]);
        if !self.fs.exists(Path::new(&metadata)).await {
            return Err(PersistenceError::NotFound(root));
        }

        let record: CollectionRecord = self.load_json(&metadata).await?;
        if record.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(PersistenceError::InvalidData(format!(
                "unsupported schema version {} (expected at most {CURRENT_SCHEMA_VERSION})",
                record.schema_version
            )));
        }

        let items = self.load_items(&root).await?;
        let mut collection = Collection {
            uid: record.id,
            name: record.name,
            pathname: root,
            items,
        };
        self.reassign_duplicate_uids(&mut collection).await?;

        info!(
            root = %collection.pathname,
            requests = collection.request_count(),
            "collection loaded"
        );
        Ok(collection)
    }
}
