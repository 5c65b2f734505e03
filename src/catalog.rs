//! The error/alert code catalog.
//!
//! Date validation never reads from here. The catalog is the store the surrounding application
//! consults to turn a system's error code into a record.

use crate::error::CatalogError;
use core::fmt::{self, Display};
use std::collections::BTreeMap;
use tracing::debug;

/// Whether a catalog entry describes a hard error or an advisory alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Blocks the operation that raised it.
    Error,
    /// Shown to the user, but the operation proceeds.
    Alert,
}

impl Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Error => f.write_str("error"),
            AlertKind::Alert => f.write_str("alert"),
        }
    }
}

/// One catalog entry, identified by its system code and its own code within that system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAlert {
    /// Surrogate key, assigned by the store.
    pub id: u64,
    /// Code of the system this entry belongs to.
    pub system_code: String,
    /// Code of the entry, unique within its system.
    pub code: String,
    /// Error or alert.
    pub kind: AlertKind,
    /// Text shown to the user.
    pub message: String,
}

impl ErrorAlert {
    /// Creates an entry not yet stored (its `id` is assigned on insert).
    pub fn new(
        system_code: impl Into<String>,
        code: impl Into<String>,
        kind: AlertKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            system_code: system_code.into(),
            code: code.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Read and write access to stored error/alert entries.
pub trait AlertCatalog {
    /// Looks up the entry with `code` in `system_code`. There is at most one.
    fn find(&self, system_code: &str, code: &str) -> Result<Option<ErrorAlert>, CatalogError>;

    /// The greatest code stored for `system_code`, compared as text. `None` if the system has no
    /// entries.
    fn max_code(&self, system_code: &str) -> Result<Option<String>, CatalogError>;

    /// Every entry of `system_code`, ordered by code.
    fn list_for_system(&self, system_code: &str) -> Result<Vec<ErrorAlert>, CatalogError>;

    /// Stores a new entry and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// - Returns [CatalogError::Duplicate] if the system already has an entry with that code.
    fn insert(&mut self, alert: ErrorAlert) -> Result<ErrorAlert, CatalogError>;

    /// Replaces the kind and message of the entry with the same system and code.
    ///
    /// # Errors
    ///
    /// - Returns [CatalogError::NotFound] if there is no such entry.
    fn update(&mut self, alert: ErrorAlert) -> Result<ErrorAlert, CatalogError>;

    /// Deletes and returns the entry with `code` in `system_code`.
    ///
    /// # Errors
    ///
    /// - Returns [CatalogError::NotFound] if there is no such entry.
    fn remove(&mut self, system_code: &str, code: &str) -> Result<ErrorAlert, CatalogError>;
}

/// An [AlertCatalog] kept in memory, ordered by (system, code).
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    entries: BTreeMap<(String, String), ErrorAlert>,
    last_id: u64,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all systems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn system_entries<'a>(
        &'a self,
        system_code: &'a str,
    ) -> impl Iterator<Item = &'a ErrorAlert> + 'a {
        // a system's keys are contiguous and start at (system, "")
        self.entries
            .range((system_code.to_owned(), String::new())..)
            .take_while(move |((system, _), _)| system == system_code)
            .map(|(_, alert)| alert)
    }

    fn key(system_code: &str, code: &str) -> (String, String) {
        (system_code.to_owned(), code.to_owned())
    }

    fn not_found(system_code: &str, code: &str) -> CatalogError {
        CatalogError::NotFound {
            system_code: system_code.to_owned(),
            code: code.to_owned(),
        }
    }
}

impl AlertCatalog for InMemoryCatalog {
    fn find(&self, system_code: &str, code: &str) -> Result<Option<ErrorAlert>, CatalogError> {
        Ok(self.entries.get(&Self::key(system_code, code)).cloned())
    }

    fn max_code(&self, system_code: &str) -> Result<Option<String>, CatalogError> {
        // entries are ordered by (system, code), so the last match holds the greatest code
        Ok(self
            .system_entries(system_code)
            .last()
            .map(|alert| alert.code.clone()))
    }

    fn list_for_system(&self, system_code: &str) -> Result<Vec<ErrorAlert>, CatalogError> {
        Ok(self.system_entries(system_code).cloned().collect())
    }

    fn insert(&mut self, mut alert: ErrorAlert) -> Result<ErrorAlert, CatalogError> {
        let key = Self::key(&alert.system_code, &alert.code);
        if self.entries.contains_key(&key) {
            return Err(CatalogError::Duplicate {
                system_code: alert.system_code,
                code: alert.code,
            });
        }
        self.last_id += 1;
        alert.id = self.last_id;
        debug!(
            id = alert.id,
            system = %alert.system_code,
            code = %alert.code,
            kind = %alert.kind,
            "Inserted error/alert"
        );
        self.entries.insert(key, alert.clone());
        Ok(alert)
    }

    fn update(&mut self, alert: ErrorAlert) -> Result<ErrorAlert, CatalogError> {
        let stored = self
            .entries
            .get_mut(&Self::key(&alert.system_code, &alert.code))
            .ok_or_else(|| Self::not_found(&alert.system_code, &alert.code))?;
        stored.kind = alert.kind;
        stored.message = alert.message;
        debug!(
            id = stored.id,
            system = %stored.system_code,
            code = %stored.code,
            kind = %stored.kind,
            "Updated error/alert"
        );
        Ok(stored.clone())
    }

    fn remove(&mut self, system_code: &str, code: &str) -> Result<ErrorAlert, CatalogError> {
        let removed = self
            .entries
            .remove(&Self::key(system_code, code))
            .ok_or_else(|| Self::not_found(system_code, code))?;
        debug!(id = removed.id, system = %system_code, code = %code, "Removed error/alert");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        for (system, code, kind, message) in [
            ("SAJ", "E002", AlertKind::Error, "Processo não encontrado"),
            ("SAJ", "E010", AlertKind::Error, "Data inicial maior que a final"),
            ("SAJ", "A001", AlertKind::Alert, "Prazo próximo do vencimento"),
            ("PJE", "E999", AlertKind::Error, "Falha de comunicação"),
        ] {
            catalog
                .insert(ErrorAlert::new(system, code, kind, message))
                .unwrap();
        }
        catalog
    }

    #[rstest]
    fn test_find(catalog: InMemoryCatalog) {
        let found = catalog.find("SAJ", "E010").unwrap().unwrap();
        assert_eq!("Data inicial maior que a final", found.message);
        assert_eq!(AlertKind::Error, found.kind);

        assert_eq!(Ok(None), catalog.find("SAJ", "E999"));
        assert_eq!(Ok(None), catalog.find("XYZ", "E010"));
    }

    #[rstest]
    fn test_max_code(catalog: InMemoryCatalog) {
        assert_eq!(Ok(Some("E010".to_owned())), catalog.max_code("SAJ"));
        assert_eq!(Ok(Some("E999".to_owned())), catalog.max_code("PJE"));
        assert_eq!(Ok(None), catalog.max_code("XYZ"));
    }

    #[rstest]
    fn test_list_for_system(catalog: InMemoryCatalog) {
        let codes: Vec<_> = catalog
            .list_for_system("SAJ")
            .unwrap()
            .into_iter()
            .map(|alert| alert.code)
            .collect();
        assert_eq!(vec!["A001", "E002", "E010"], codes);
        assert_eq!(Ok(vec![]), catalog.list_for_system("XYZ"));
    }

    #[rstest]
    fn test_neighbouring_systems_stay_apart(mut catalog: InMemoryCatalog) {
        for system in ["SA", "SAJX", "SAK"] {
            catalog
                .insert(ErrorAlert::new(system, "Z999", AlertKind::Alert, "vizinho"))
                .unwrap();
        }
        catalog
            .insert(ErrorAlert::new("SAJ", "", AlertKind::Error, "sem código"))
            .unwrap();

        let codes: Vec<_> = catalog
            .list_for_system("SAJ")
            .unwrap()
            .into_iter()
            .map(|alert| alert.code)
            .collect();
        assert_eq!(vec!["", "A001", "E002", "E010"], codes);
        assert_eq!(Ok(Some("E010".to_owned())), catalog.max_code("SAJ"));
        assert_eq!(Ok(Some("Z999".to_owned())), catalog.max_code("SA"));
        assert_eq!(Ok(None), catalog.max_code("S"));
    }

    #[test]
    fn test_alert_kind_display() {
        assert_eq!("error", AlertKind::Error.to_string());
        assert_eq!("alert", AlertKind::Alert.to_string());
    }

    #[rstest]
    fn test_insert_assigns_ids(catalog: InMemoryCatalog) {
        let mut ids: Vec<_> = catalog
            .list_for_system("SAJ")
            .unwrap()
            .into_iter()
            .chain(catalog.list_for_system("PJE").unwrap())
            .map(|alert| alert.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(vec![1, 2, 3, 4], ids);
    }

    #[rstest]
    fn test_insert_duplicate(mut catalog: InMemoryCatalog) {
        let result = catalog.insert(ErrorAlert::new("SAJ", "E002", AlertKind::Alert, "again"));
        assert_eq!(
            Err(CatalogError::Duplicate {
                system_code: "SAJ".to_owned(),
                code: "E002".to_owned(),
            }),
            result
        );
        assert_eq!(4, catalog.len());
    }

    #[rstest]
    fn test_update(mut catalog: InMemoryCatalog) {
        let updated = catalog
            .update(ErrorAlert::new("SAJ", "A001", AlertKind::Error, "Prazo vencido"))
            .unwrap();
        assert_eq!(3, updated.id);
        assert_eq!(Ok(Some(updated)), catalog.find("SAJ", "A001"));

        assert!(matches!(
            catalog.update(ErrorAlert::new("SAJ", "Z000", AlertKind::Error, "")),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[rstest]
    fn test_remove(mut catalog: InMemoryCatalog) {
        let removed = catalog.remove("PJE", "E999").unwrap();
        assert_eq!("E999", removed.code);
        assert_eq!(Ok(None), catalog.max_code("PJE"));
        assert!(matches!(
            catalog.remove("PJE", "E999"),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(!catalog.is_empty());
    }
}
