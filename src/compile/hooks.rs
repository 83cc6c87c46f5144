//! Interception points around each compilation unit.
//!
//! Every unit (one model, enum, entity, the structure table, or one write)
//! runs inside a [`UnitHooks`]:
//!
//! ```text
//! on_start(config, input) → compile → on_success(output)
//!                               ↘ on_failure(config, input, error)
//! ```
//!
//! A start hook may replace the config and input the unit sees, a success
//! hook may replace the output, and a failure hook sees every error the
//! unit produces (including errors from the other two hooks) and returns
//! the error to propagate. Absent hooks are no-ops.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::{CompileError, EnumTable, ModelTables};
use crate::config::{EntitiesConfig, EnumsConfig, ModelsConfig, StructuresConfig};
use crate::model::{Entity, Enum, Model};
use crate::sql::{Table, View};

pub type StartHook<C, I> = Arc<dyn Fn(C, I) -> Result<(C, I), CompileError> + Send + Sync>;
pub type SuccessHook<O> = Arc<dyn Fn(O) -> Result<O, CompileError> + Send + Sync>;
pub type FailureHook<C, I> = Arc<dyn Fn(&C, &I, CompileError) -> CompileError + Send + Sync>;

/// Optional callbacks wrapped around one kind of unit.
pub struct UnitHooks<C, I, O> {
    pub on_start: Option<StartHook<C, I>>,
    pub on_success: Option<SuccessHook<O>>,
    pub on_failure: Option<FailureHook<C, I>>,
}

impl<C, I, O> Default for UnitHooks<C, I, O> {
    fn default() -> Self {
        Self {
            on_start: None,
            on_success: None,
            on_failure: None,
        }
    }
}

impl<C, I, O> Clone for UnitHooks<C, I, O> {
    fn clone(&self) -> Self {
        Self {
            on_start: self.on_start.clone(),
            on_success: self.on_success.clone(),
            on_failure: self.on_failure.clone(),
        }
    }
}

impl<C, I, O> fmt::Debug for UnitHooks<C, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitHooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

impl<C: Clone, I: Clone, O> UnitHooks<C, I, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(C, I) -> Result<(C, I), CompileError> + Send + Sync + 'static,
    {
        self.on_start = Some(Arc::new(hook));
        self
    }

    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(O) -> Result<O, CompileError> + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&C, &I, CompileError) -> CompileError + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Run `unit` with these hooks around it.
    ///
    /// Config and input are only cloned when a start hook is installed.
    pub fn run<F>(&self, config: &C, input: &I, unit: F) -> Result<O, CompileError>
    where
        F: FnOnce(&C, &I) -> Result<O, CompileError>,
    {
        let (config, input): (Cow<'_, C>, Cow<'_, I>) = match &self.on_start {
            Some(hook) => match hook(config.clone(), input.clone()) {
                Ok((c, i)) => (Cow::Owned(c), Cow::Owned(i)),
                Err(err) => return Err(self.fail(config, input, err)),
            },
            None => (Cow::Borrowed(config), Cow::Borrowed(input)),
        };

        let result = unit(&*config, &*input).and_then(|output| match &self.on_success {
            Some(hook) => hook(output),
            None => Ok(output),
        });

        result.map_err(|err| self.fail(&*config, &*input, err))
    }

    fn fail(&self, config: &C, input: &I, err: CompileError) -> CompileError {
        match &self.on_failure {
            Some(hook) => hook(config, input, err),
            None => err,
        }
    }
}

/// Hooks for every unit kind the compiler runs.
///
/// Write hooks take no config: their start hook may rewrite the IR before
/// it reaches the writer and their success hook may rewrite the bytes.
#[derive(Debug, Clone, Default)]
pub struct CompileHooks {
    pub model: UnitHooks<ModelsConfig, Model, ModelTables>,
    pub enumeration: UnitHooks<EnumsConfig, Enum, EnumTable>,
    pub entity: UnitHooks<EntitiesConfig, Entity, View>,
    pub structure: UnitHooks<StructuresConfig, (), Option<Table>>,
    pub write_table: UnitHooks<(), Table, Vec<u8>>,
    pub write_view: UnitHooks<(), View, Vec<u8>>,
}

impl CompileHooks {
    pub fn new() -> Self {
        Self::default()
    }
}
