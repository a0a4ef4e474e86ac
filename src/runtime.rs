//! The component runtime: one context run per call, then queued dispatch.

use portable_atomic_util::Arc;

use crate::context::{ContextCell, Subscriptions};
use crate::{Context, Error, Invoker, Pointer};

/// The state machine behind one component.
///
/// Every resolved action, interaction and reaction holds a weak handle to
/// this. Each call:
/// 1. Runs its transition through the [`ContextCell`], committing the
///    updated context and notifying observers at most once
/// 2. Drains the invoke queue filled during that run, dispatching every
///    command through the interactions [`Invoker`]
///
/// Both pointers are cleared on dispose, after which every call fails with
/// [`Error::Disposed`].
pub(crate) struct Runtime<S, D> {
    context: Pointer<Option<Arc<ContextCell<S, D>>>>,
    invoker: Pointer<Option<Arc<Invoker>>>,
}

impl<S, D> Runtime<S, D> {
    pub(crate) fn new(cell: ContextCell<S, D>) -> Self {
        Self {
            context: Pointer::new(Some(Arc::new(cell))),
            invoker: Pointer::new(None),
        }
    }

    /// Install the interactions used to dispatch queued commands.
    pub(crate) fn install(&self, invoker: Invoker) {
        self.invoker.set(Some(Arc::new(invoker)));
    }

    pub(crate) fn adopt(&self, subscriptions: Subscriptions) -> Result<(), Error> {
        self.cell()?.adopt(subscriptions);
        Ok(())
    }

    pub(crate) fn state(&self) -> Result<Arc<S>, Error> {
        self.cell()?.state()
    }

    pub(crate) fn run<R>(
        &self,
        transition: impl FnOnce(Context<S, D>) -> (R, Context<S, D>),
    ) -> Result<R, Error> {
        let cell = self.cell()?;
        let result = cell.run(transition)?;
        self.process_queued_commands(&cell)?;
        Ok(result)
    }

    /// Tear down the context and unsubscribe every external subscription.
    ///
    /// Idempotent: only the first call finds a context to dispose.
    pub(crate) fn dispose(&self) {
        let Some(cell) = self.context.get() else {
            return;
        };

        let subscriptions = cell.dispose();
        let count = subscriptions.as_ref().map_or(0, |subscriptions| subscriptions.len());
        tracing::debug!(subscriptions = count, "disposing component");

        if let Some(subscriptions) = subscriptions {
            for subscription in subscriptions.values() {
                subscription.unsubscribe();
            }
        }

        self.context.set(None);
        self.invoker.set(None);
    }

    fn cell(&self) -> Result<Arc<ContextCell<S, D>>, Error> {
        self.context.get().ok_or(Error::Disposed)
    }

    fn process_queued_commands(&self, cell: &ContextCell<S, D>) -> Result<(), Error> {
        let commands = cell.take_commands()?;
        if commands.is_empty() {
            return Ok(());
        }

        let invoker = self.invoker.get().ok_or(Error::Disposed)?;
        tracing::debug!(count = commands.len(), "dispatching queued commands");

        let total = commands.len();
        for (index, command) in commands.iter().enumerate() {
            tracing::trace!(kind = command.kind(), "dispatching command");
            if let Err(error) = invoker.invoke(command.kind(), command.payload()) {
                tracing::debug!(
                    kind = command.kind(),
                    discarded = total - index - 1,
                    %error,
                    "dispatch failed, discarding remaining commands"
                );
                return Err(error);
            }
        }

        Ok(())
    }
}

impl<S, D> Drop for Runtime<S, D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
