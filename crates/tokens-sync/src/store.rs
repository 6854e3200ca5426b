//! Variable store abstraction
//!
//! The host design tool keeps variables in named collections. Each
//! collection has one or more modes and every variable holds one canonical
//! value per mode. [`VariableStore`] is the narrow surface the pipelines
//! need; [`MemoryStore`] is a serializable implementation used by the CLI
//! and in tests.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokens_core::{CanonicalValue, TokenKind};

use crate::config::DEFAULT_MODE;
use crate::error::{Error, Result};

/// Handle to a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub u32);

/// Handle to a mode within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub u32);

/// Handle to a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub collection: CollectionId,
    /// Slash-separated token path, e.g. `color/base/blue`
    pub name: String,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Operations the pipelines need from a host variable store
pub trait VariableStore {
    /// Find a collection by name
    fn find_collection(&self, name: &str) -> Result<Option<CollectionId>>;

    /// Find a collection by name, creating it with a single default mode
    fn get_or_create_collection(&mut self, name: &str) -> Result<CollectionId>;

    /// Modes of a collection, in creation order
    fn modes(&self, collection: CollectionId) -> Result<Vec<Mode>>;

    fn add_mode(&mut self, collection: CollectionId, name: &str) -> Result<ModeId>;

    /// Variables of a collection, in creation order
    fn variables(&self, collection: CollectionId) -> Result<Vec<Variable>>;

    /// Find a variable by name, creating it with `kind` when absent.
    ///
    /// Returns the variable and whether it was created. An existing
    /// variable is returned as-is even if its kind differs.
    fn get_or_create_variable(
        &mut self,
        collection: CollectionId,
        name: &str,
        kind: TokenKind,
    ) -> Result<(Variable, bool)>;

    fn set_description(&mut self, variable: VariableId, description: Option<&str>) -> Result<()>;

    /// Set the value of a variable in one mode.
    ///
    /// The value's kind must match the variable's kind.
    fn set_value(&mut self, variable: VariableId, mode: ModeId, value: CanonicalValue) -> Result<()>;

    fn value(&self, variable: VariableId, mode: ModeId) -> Result<Option<CanonicalValue>>;
}

/// Find a mode by name, adding it when absent
pub fn ensure_mode(
    store: &mut dyn VariableStore,
    collection: CollectionId,
    name: &str,
) -> Result<ModeId> {
    if let Some(mode) = store
        .modes(collection)?
        .into_iter()
        .find(|m| m.name == name)
    {
        return Ok(mode.id);
    }
    tracing::debug!(mode = name, "adding mode");
    store.add_mode(collection, name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredCollection {
    id: CollectionId,
    name: String,
    modes: Vec<Mode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredVariable {
    #[serde(flatten)]
    variable: Variable,
    values: Vec<(ModeId, CanonicalValue)>,
}

/// An in-memory store that round-trips through JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    collections: Vec<StoredCollection>,
    variables: Vec<StoredVariable>,
    next_id: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store file. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the store as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn collection(&self, id: CollectionId) -> Result<&StoredCollection> {
        self.collections
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::Store(format!("unknown collection {}", id.0)))
    }

    fn stored(&self, id: VariableId) -> Result<&StoredVariable> {
        self.variables
            .iter()
            .find(|v| v.variable.id == id)
            .ok_or_else(|| Error::Store(format!("unknown variable {}", id.0)))
    }

    fn stored_mut(&mut self, id: VariableId) -> Result<&mut StoredVariable> {
        self.variables
            .iter_mut()
            .find(|v| v.variable.id == id)
            .ok_or_else(|| Error::Store(format!("unknown variable {}", id.0)))
    }
}

impl VariableStore for MemoryStore {
    fn find_collection(&self, name: &str) -> Result<Option<CollectionId>> {
        Ok(self.collections.iter().find(|c| c.name == name).map(|c| c.id))
    }

    fn get_or_create_collection(&mut self, name: &str) -> Result<CollectionId> {
        if let Some(id) = self.find_collection(name)? {
            return Ok(id);
        }
        let id = CollectionId(self.allocate());
        let default_mode = Mode {
            id: ModeId(self.allocate()),
            name: DEFAULT_MODE.to_string(),
        };
        tracing::debug!(collection = name, "creating collection");
        self.collections.push(StoredCollection {
            id,
            name: name.to_string(),
            modes: vec![default_mode],
        });
        Ok(id)
    }

    fn modes(&self, collection: CollectionId) -> Result<Vec<Mode>> {
        Ok(self.collection(collection)?.modes.clone())
    }

    fn add_mode(&mut self, collection: CollectionId, name: &str) -> Result<ModeId> {
        self.collection(collection)?;
        let id = ModeId(self.allocate());
        if let Some(stored) = self.collections.iter_mut().find(|c| c.id == collection) {
            stored.modes.push(Mode {
                id,
                name: name.to_string(),
            });
        }
        Ok(id)
    }

    fn variables(&self, collection: CollectionId) -> Result<Vec<Variable>> {
        self.collection(collection)?;
        Ok(self
            .variables
            .iter()
            .filter(|v| v.variable.collection == collection)
            .map(|v| v.variable.clone())
            .collect())
    }

    fn get_or_create_variable(
        &mut self,
        collection: CollectionId,
        name: &str,
        kind: TokenKind,
    ) -> Result<(Variable, bool)> {
        self.collection(collection)?;
        if let Some(existing) = self
            .variables
            .iter()
            .find(|v| v.variable.collection == collection && v.variable.name == name)
        {
            return Ok((existing.variable.clone(), false));
        }
        let variable = Variable {
            id: VariableId(self.allocate()),
            collection,
            name: name.to_string(),
            kind,
            description: None,
        };
        self.variables.push(StoredVariable {
            variable: variable.clone(),
            values: Vec::new(),
        });
        Ok((variable, true))
    }

    fn set_description(&mut self, variable: VariableId, description: Option<&str>) -> Result<()> {
        self.stored_mut(variable)?.variable.description = description.map(str::to_string);
        Ok(())
    }

    fn set_value(&mut self, variable: VariableId, mode: ModeId, value: CanonicalValue) -> Result<()> {
        let collection = self.stored(variable)?.variable.collection;
        if !self.collection(collection)?.modes.iter().any(|m| m.id == mode) {
            return Err(Error::Store(format!("unknown mode {}", mode.0)));
        }

        let stored = self.stored_mut(variable)?;
        if value.kind() != stored.variable.kind {
            return Err(Error::Store(format!(
                "cannot set a {} value on {} variable '{}'",
                value.kind(),
                stored.variable.kind,
                stored.variable.name
            )));
        }
        match stored.values.iter_mut().find(|(m, _)| *m == mode) {
            Some((_, slot)) => *slot = value,
            None => stored.values.push((mode, value)),
        }
        Ok(())
    }

    fn value(&self, variable: VariableId, mode: ModeId) -> Result<Option<CanonicalValue>> {
        Ok(self
            .stored(variable)?
            .values
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, v)| v.clone()))
    }
}
