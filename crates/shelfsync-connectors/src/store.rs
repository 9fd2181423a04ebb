//! Node store — the data graph side of the connector.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use shelfsync_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::schema::ModelDefinition;
use crate::types::{Node, StoredNode};

/// Anything that accepts node-creation calls.
pub trait NodeSink: Send + Sync {
    /// Create (or replace) the node `node.id` of `model`.
    fn create(&self, model: &str, node: Node) -> Result<()>;

    /// Make every node created so far durable. Called once per ingestion run.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

type NodeKey = (String, String);

/// In-process node store with optional JSON persistence.
///
/// `create` only touches memory; `flush` writes the whole store to a temp
/// file next to `nodes_file` and renames it into place.
pub struct NodeStore {
    models: HashSet<String>,
    nodes_file: Option<PathBuf>,
    nodes: RwLock<BTreeMap<NodeKey, StoredNode>>,
    save_lock: Mutex<()>,
}

impl NodeStore {
    /// Create a store that keeps nodes in memory only.
    pub fn in_memory(models: &[ModelDefinition]) -> Self {
        Self {
            models: model_names(models),
            nodes_file: None,
            nodes: RwLock::new(BTreeMap::new()),
            save_lock: Mutex::new(()),
        }
    }

    /// Open a store backed by `nodes_file`, loading any nodes already there.
    ///
    /// An unreadable file is moved aside to `<nodes_file>.corrupt` and the
    /// store starts empty.
    pub fn open(nodes_file: &Path, models: &[ModelDefinition]) -> Self {
        let nodes: BTreeMap<NodeKey, StoredNode> = load_nodes(nodes_file)
            .into_iter()
            .map(|n| ((n.model.clone(), n.id.clone()), n))
            .collect();
        info!("NodeStore: {} nodes loaded", nodes.len());

        Self {
            models: model_names(models),
            nodes_file: Some(nodes_file.to_path_buf()),
            nodes: RwLock::new(nodes),
            save_lock: Mutex::new(()),
        }
    }

    /// List the nodes of a model, ordered by id.
    pub fn list(&self, model: &str) -> Vec<StoredNode> {
        self.nodes
            .read()
            .values()
            .filter(|n| n.model == model)
            .cloned()
            .collect()
    }

    pub fn get(&self, model: &str, id: &str) -> Option<StoredNode> {
        self.nodes
            .read()
            .get(&(model.to_string(), id.to_string()))
            .cloned()
    }

    /// Node count per declared model (zero for models with no nodes).
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            self.models.iter().map(|m| (m.clone(), 0)).collect();
        for node in self.nodes.read().values() {
            *counts.entry(node.model.clone()).or_default() += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn save(&self, path: &Path) -> Result<()> {
        // Serialize and persist under one lock so concurrent flushes land in order.
        let _guard = self.save_lock.lock();

        let data = {
            let nodes = self.nodes.read();
            let list: Vec<&StoredNode> = nodes.values().collect();
            serde_json::to_vec_pretty(&list).map_err(|e| {
                warn!("Failed to serialize nodes: {}", e);
                e
            })?
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Saved {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

impl NodeSink for NodeStore {
    fn create(&self, model: &str, node: Node) -> Result<()> {
        if !self.models.contains(model) {
            return Err(Error::UnknownModel(model.to_string()));
        }

        debug!("Creating {} node {}", model, node.id);
        let stored = StoredNode {
            model: model.to_string(),
            id: node.id,
            attributes: node.attributes,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.nodes
            .write()
            .insert((stored.model.clone(), stored.id.clone()), stored);

        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.nodes_file else {
            return Ok(());
        };
        self.save(path).map_err(|e| {
            warn!("Failed to save nodes to {}: {}", path.display(), e);
            e
        })
    }
}

fn model_names(models: &[ModelDefinition]) -> HashSet<String> {
    models.iter().map(|m| m.name.to_string()).collect()
}

/// Path the unreadable store file is moved to.
pub fn corrupt_path(nodes_file: &Path) -> PathBuf {
    let mut name = OsString::from(nodes_file.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}

fn load_nodes(path: &Path) -> Vec<StoredNode> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Vec::new(),
    };

    match serde_json::from_str(&data) {
        Ok(nodes) => nodes,
        Err(e) => {
            let aside = corrupt_path(path);
            warn!(
                "Unreadable node file {} ({}), moving it to {}",
                path.display(),
                e,
                aside.display()
            );
            if let Err(e) = std::fs::rename(path, &aside) {
                warn!("Failed to move {} aside: {}", path.display(), e);
            }
            Vec::new()
        }
    }
}
