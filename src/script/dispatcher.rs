use crate::{
    codec,
    script::{Command, MapHandle, Query},
    traits::WebContext,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{cell::Cell, rc::Rc};

/// Submits commands and queries to the web context on behalf of one bridge.
///
/// The dispatcher tracks the context generation, which advances every time a
/// new document is loaded. A query completion that arrives for an older
/// generation is dropped without being called: its document no longer exists.
pub struct CommandDispatcher {
    handle: MapHandle,
    generation: Rc<Cell<u64>>,
}

impl CommandDispatcher {
    pub fn new(handle: MapHandle) -> Self {
        Self {
            handle,
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn handle(&self) -> &MapHandle {
        &self.handle
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Starts a new context generation, orphaning in-flight completions
    pub fn advance_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    /// Submits a fire-and-forget command. Returns `false` if the command
    /// could not be encoded and nothing was submitted.
    pub fn submit(&self, context: &mut dyn WebContext, command: &Command) -> bool {
        let Some(script) = command.to_script(&self.handle) else {
            log::debug!("{} not submitted: arguments could not be encoded", command.name());
            return false;
        };
        log::debug!("submitting {}", command.name());
        context.evaluate_script(&script, None);
        true
    }

    /// Submits a query and decodes its result as `T` for `completion`.
    ///
    /// The completion receives `None` for any result that does not decode.
    /// It is never called if the query could not be encoded or the context
    /// generation changed before the result arrived.
    pub fn query<T, F>(&self, context: &mut dyn WebContext, query: &Query, completion: F) -> bool
    where
        T: DeserializeOwned + 'static,
        F: FnOnce(Option<T>) + 'static,
    {
        let Some(script) = query.to_script(&self.handle) else {
            log::debug!("{} not submitted: arguments could not be encoded", query.name());
            return false;
        };

        let issued = self.generation.get();
        let generation = Rc::clone(&self.generation);
        let name = query.name();
        log::debug!("submitting {}", name);
        context.evaluate_script(
            &script,
            Some(Box::new(move |result: Option<Value>| {
                if generation.get() != issued {
                    log::debug!("discarding {} result from generation {}", name, issued);
                    return;
                }
                completion(result.as_ref().and_then(|value| codec::decode::<T>(value)));
            })),
        );
        true
    }
}
