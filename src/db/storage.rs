// src/db/storage.rs

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::common::error::AppError;

/// Armazenamento chave-valor local. Cada chave guarda um valor JSON inteiro
/// (a coleção toda), sobrescrito a cada escrita.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

// Permite escolher o backend em tempo de execução (arquivo ou memória)
impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        (**self).remove(key)
    }
}

// ---
// Memória: usado nos testes e em sessões efêmeras
// ---
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ---
// Arquivos: um <chave>.json por chave dentro do diretório de dados
// ---
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Abre (e cria, se preciso) o diretório de dados.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::StorageError(format!("chave inválida: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        // Escreve num temporário e renomeia: o arquivo nunca fica pela metade
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("mototrack_deliveries", "[]").unwrap();
        assert_eq!(store.get("mototrack_deliveries").unwrap().as_deref(), Some("[]"));

        store.remove("mototrack_deliveries").unwrap();
        assert_eq!(store.get("mototrack_deliveries").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set("mototrack_deliverers", r#"[{"id":"1"}]"#).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("mototrack_deliverers").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert_eq!(store.get("mototrack_missing").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        let err = store.set("../fora", "x").unwrap_err();
        assert!(matches!(err, AppError::StorageError(_)));
    }

    #[test]
    fn removing_a_missing_key_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert!(store.remove("mototrack_nada").is_ok());
    }
}
