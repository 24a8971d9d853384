use std::sync::Mutex;

use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

pub trait Router: Send + Sync {
    fn navigate(&self, path: &str, options: NavigateOptions);

    fn current_path(&self) -> String;
}

/// Router that keeps its history in memory.
///
/// Used by the CLI host, where there is no browser history to drive.
pub struct MemoryRouter {
    history: Mutex<Vec<String>>,
}

impl MemoryRouter {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    /// Full history, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Router for MemoryRouter {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        debug!(path, replace = options.replace, "Navigating");
        let mut history = self.lock();
        if options.replace {
            history.pop();
        }
        history.push(path.to_string());
    }

    fn current_path(&self) -> String {
        self.lock().last().cloned().unwrap_or_else(|| "/".to_string())
    }
}
