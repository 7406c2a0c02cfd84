use crate::settings_store::{SettingsStore, SettingsStoreFacade, StoreError};
use std::collections::BTreeMap;
use std::sync::Mutex;

/**
 * A mock [SettingsStore] implementation for testing.
 *
 * The simulated database consists of the [StoreMockData] structure with a map of settings, keyed
 * by (module id, setting name). It can be directly modified and inspected by the tests.
 *
 * The [StoreMockData.next_error] attribute can be set to simulate a database error.
 */
#[derive(Default)]
pub struct StoreMock {
    pub data: Mutex<StoreMockData>,
}

impl SettingsStore for StoreMock {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn SettingsStoreFacade + 'a>, StoreError> {
        Ok(Box::new(StoreMockFacade { store: self }))
    }
}

#[derive(Default)]
pub struct StoreMockData {
    pub settings: BTreeMap<(String, String), Option<String>>,
    /// Number of facade calls that wrote to `settings`
    pub write_calls: usize,
    /// If not none, the next call to a store facade method will return this error.
    pub next_error: Option<StoreError>,
}

impl StoreMockData {
    pub fn get(&self, module_id: &str, name: &str) -> Option<&str> {
        self.settings
            .get(&(module_id.to_owned(), name.to_owned()))
            .and_then(|v| v.as_deref())
    }

    pub fn insert(&mut self, module_id: &str, name: &str, value: &str) {
        self.settings.insert(
            (module_id.to_owned(), name.to_owned()),
            Some(value.to_owned()),
        );
    }
}

struct StoreMockFacade<'a> {
    store: &'a StoreMock,
}

impl SettingsStoreFacade for StoreMockFacade<'_> {
    fn get_setting(&mut self, module_id: &str, name: &str) -> Result<Option<String>, StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        Ok(data.get(module_id, name).map(|v| v.to_owned()))
    }

    fn get_settings(&mut self, module_id: &str) -> Result<Vec<(String, String)>, StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        Ok(data
            .settings
            .iter()
            .filter(|((m, _), _)| m == module_id)
            .map(|((_, name), value)| (name.clone(), value.clone().unwrap_or_default()))
            .collect())
    }

    fn set_settings(
        &mut self,
        module_id: &str,
        values: &[(&str, String)],
    ) -> Result<(), StoreError> {
        let mut data = self.store.data.lock().expect("Error while locking mutex.");
        if let Some(e) = data.next_error.take() {
            return Err(e);
        }
        for (name, value) in values {
            data.insert(module_id, name, value);
        }
        data.write_calls += 1;
        Ok(())
    }
}
