//! Employee directory, loaded once per session

use std::sync::RwLock;

use crate::error::CoreResult;
use crate::loading::{read, write, LoadingFlag};
use crate::source::ApiRef;
use crate::types::Employee;

pub struct DirectoryLoader {
    api: ApiRef,
    employees: RwLock<Option<Vec<Employee>>>,
    loading: LoadingFlag,
}

impl DirectoryLoader {
    pub fn new(api: ApiRef) -> Self {
        Self {
            api,
            employees: RwLock::new(None),
            loading: LoadingFlag::new(),
        }
    }

    /// Fetch every employee unless the directory is already loaded
    ///
    /// On failure the directory stays unloaded and the loading flag clears.
    pub async fn load_all(&self) -> CoreResult<()> {
        if self.is_loaded() {
            log::debug!(target: "spendview::directory", "Directory already loaded, skipping fetch");
            return Ok(());
        }

        let _loading = self.loading.begin();
        let employees = self.api.employees().await?;
        log::info!(target: "spendview::directory", "Loaded {} employees", employees.len());
        *write(&self.employees) = Some(employees);
        Ok(())
    }

    /// Loaded, even if the directory turned out to be empty
    pub fn is_loaded(&self) -> bool {
        read(&self.employees).is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Selector entries: the "all employees" sentinel followed by the directory
    pub fn options(&self) -> Vec<Employee> {
        match read(&self.employees).as_ref() {
            Some(employees) => std::iter::once(Employee::all())
                .chain(employees.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }
}
