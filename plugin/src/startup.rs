//! Startup initializer registry.
//!
//! A fixed set of modules must perform one-time setup before any per-frame
//! logic runs. The registry holds them as an explicit ordered list invoked
//! in sequence during boot; running the registry twice is an error.

use crate::error::PluginError;

type StartupStep<C> = Box<dyn FnOnce(&mut C) -> Result<(), PluginError>>;

/// Ordered one-shot initializers run during plugin boot.
pub struct StartupRegistry<C> {
    steps: Vec<(&'static str, StartupStep<C>)>,
    ran: bool,
}

impl<C> Default for StartupRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StartupRegistry<C> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            ran: false,
        }
    }

    /// Append a named initializer.
    pub fn register<F>(&mut self, name: &'static str, step: F)
    where
        F: FnOnce(&mut C) -> Result<(), PluginError> + 'static,
    {
        self.steps.push((name, Box::new(step)));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn has_run(&self) -> bool {
        self.ran
    }

    /// Run every registered initializer in registration order.
    pub fn run_all(&mut self, context: &mut C) -> Result<(), PluginError> {
        if self.ran {
            return Err(PluginError::StartupAlreadyRan);
        }
        self.ran = true;

        for (name, step) in self.steps.drain(..) {
            log::debug!("running startup step '{name}'");
            step(context).map_err(|error| PluginError::StartupStepFailed {
                step: name,
                reason: error.to_string(),
            })?;
        }
        Ok(())
    }
}
