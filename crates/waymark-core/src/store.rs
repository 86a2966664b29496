use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{ContentNode, NodePath};

/// Read-only access to the content tree
pub trait ContentStore: Send + Sync {
    /// Name of the store, e.g. `web` or `core`
    fn name(&self) -> &str;

    /// Find the node at a full path. Lookups ignore case.
    fn lookup(&self, path: &str) -> Option<&ContentNode>;

    /// Children of a node, in store order
    fn children<'s>(&'s self, node: &ContentNode) -> Vec<&'s ContentNode> {
        node.children
            .iter()
            .filter_map(|path| self.lookup(path))
            .collect()
    }
}

/// Tree description used to seed a [`MemoryStore`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

// In memory
pub struct MemoryStore {
    name: String,
    nodes: HashMap<String, ContentNode>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: HashMap::new(),
        }
    }

    /// Build a store from top-level tree nodes
    pub fn from_tree(name: impl Into<String>, roots: &[TreeNode]) -> Result<Self, ConfigError> {
        let mut store = Self::new(name);
        for root in roots {
            store.insert_tree(None, root)?;
        }
        Ok(store)
    }

    /// Parse a YAML list of top-level tree nodes
    pub fn from_yaml(name: impl Into<String>, content: &str) -> Result<Self, ConfigError> {
        let roots: Vec<TreeNode> = serde_yaml::from_str(content)?;
        Self::from_tree(name, &roots)
    }

    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(name, &content)
    }

    /// Add a node under `parent` (or as a top-level node) and return its full path
    pub fn insert(
        &mut self,
        parent: Option<&str>,
        name: &str,
        display_name: Option<&str>,
    ) -> Result<NodePath, ConfigError> {
        if name.is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidTree(format!(
                "node name {:?} must be non-empty and must not contain '/'",
                name
            )));
        }

        let full_path = match parent {
            Some(parent_path) => {
                let parent_node = self.nodes.get(&key(parent_path)).ok_or_else(|| {
                    ConfigError::InvalidTree(format!("parent {} does not exist", parent_path))
                })?;
                format!("{}/{}", parent_node.full_path, name)
            }
            None => format!("/{}", name),
        };

        let node_key = key(&full_path);
        if self.nodes.contains_key(&node_key) {
            return Err(ConfigError::InvalidTree(format!(
                "duplicate node path {}",
                full_path
            )));
        }

        self.nodes.insert(
            node_key,
            ContentNode {
                name: name.to_string(),
                display_name: display_name.map(str::to_string),
                full_path: full_path.clone(),
                children: Vec::new(),
            },
        );

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(&key(p))) {
            parent_node.children.push(full_path.clone());
        }

        Ok(full_path)
    }

    fn insert_tree(&mut self, parent: Option<&str>, node: &TreeNode) -> Result<(), ConfigError> {
        let path = self.insert(parent, &node.name, node.display_name.as_deref())?;
        for child in &node.children {
            self.insert_tree(Some(&path), child)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, path: &str) -> Option<&ContentNode> {
        self.nodes.get(&key(path))
    }
}

fn key(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    trimmed.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"
- name: sitecore
  children:
    - name: content
      children:
        - name: Home
          children:
            - name: Products
            - name: prod2
              displayName: Gadgets
"#;

    #[test]
    fn test_from_yaml_builds_paths_in_order() {
        let store = MemoryStore::from_yaml("web", TREE).unwrap();
        assert_eq!(store.name(), "web");
        assert_eq!(store.len(), 5);
        assert!(store.lookup("/sitecore").is_some());

        let home = store.lookup("/sitecore/content/Home").unwrap();
        let names: Vec<&str> = store
            .children(home)
            .iter()
            .map(|child| child.name.as_str())
            .collect();
        assert_eq!(names, vec!["Products", "prod2"]);

        let gadgets = store.lookup("/sitecore/content/home/prod2").unwrap();
        assert_eq!(gadgets.display_name.as_deref(), Some("Gadgets"));
        assert_eq!(gadgets.full_path, "/sitecore/content/Home/prod2");
    }

    #[test]
    fn test_lookup_ignores_case_and_trailing_slash() {
        let store = MemoryStore::from_yaml("web", TREE).unwrap();
        assert!(store.lookup("/SITECORE/Content/").is_some());
        assert!(store.lookup("/sitecore/missing").is_none());
        assert!(store.lookup("").is_none());
    }

    #[test]
    fn test_insert_rejects_bad_names() {
        let mut store = MemoryStore::new("web");
        assert!(store.is_empty());
        assert!(matches!(
            store.insert(None, "", None),
            Err(ConfigError::InvalidTree(_))
        ));
        assert!(matches!(
            store.insert(None, "a/b", None),
            Err(ConfigError::InvalidTree(_))
        ));
        assert!(matches!(
            store.insert(Some("/missing"), "a", None),
            Err(ConfigError::InvalidTree(_))
        ));

        store.insert(None, "root", None).unwrap();
        assert!(matches!(
            store.insert(None, "ROOT", None),
            Err(ConfigError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tree.yaml");
        std::fs::write(&path, TREE).unwrap();

        let store = MemoryStore::load("master", &path).unwrap();
        assert_eq!(store.name(), "master");
        assert!(store.lookup("/sitecore/content/home/products").is_some());

        let missing = MemoryStore::load("master", &dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
