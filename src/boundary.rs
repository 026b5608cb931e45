//! Fault isolation for rendering work
//!
//! A [`FaultBoundary`] runs a unit of rendering work, catches any panic it
//! raises and funnels it into [`ErrorHandler::handle_error`] with operation
//! `"ui_render"`. What gets rendered instead is up to the caller, which
//! receives the [`HandlingResult`] in place of the output.

use crate::core_types::{CustomMessages, ErrorContext, HandlingResult};
use crate::handler::ErrorHandler;
use crate::logging::log_warn;
use crate::normalize::{Normalize, RawFailure};

use futures::FutureExt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Operation name recorded for faults caught by a boundary.
pub const UI_RENDER_OPERATION: &str = "ui_render";

/// Scoped execution region that converts rendering faults into handled errors.
#[derive(Debug, Clone)]
pub struct FaultBoundary {
    handler: ErrorHandler,
    module: String,
    user_id: Option<String>,
    custom_messages: Option<CustomMessages>,
}

impl FaultBoundary {
    pub fn new(handler: ErrorHandler, module: impl Into<String>) -> Self {
        Self {
            handler,
            module: module.into(),
            user_id: None,
            custom_messages: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_custom_messages(mut self, custom_messages: CustomMessages) -> Self {
        self.custom_messages = Some(custom_messages);
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Run `work`, converting a panic into a handled error.
    pub fn render<R>(&self, work: impl FnOnce() -> R) -> Result<R, HandlingResult> {
        catch_unwind(AssertUnwindSafe(work))
            .map_err(|payload| self.handle(&RawFailure::from_panic(payload.as_ref())))
    }

    /// Run fallible `work`; both returned errors and panics are handled.
    pub fn try_render<R, E: Normalize>(
        &self,
        work: impl FnOnce() -> Result<R, E>,
    ) -> Result<R, HandlingResult> {
        match catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(error)) => Err(self.handle(&error)),
            Err(payload) => Err(self.handle(&RawFailure::from_panic(payload.as_ref()))),
        }
    }

    /// Asynchronous counterpart of [`render`](Self::render).
    pub async fn render_async<Fut: Future>(
        &self,
        work: Fut,
    ) -> Result<Fut::Output, HandlingResult> {
        AssertUnwindSafe(work)
            .catch_unwind()
            .await
            .map_err(|payload| self.handle(&RawFailure::from_panic(payload.as_ref())))
    }

    fn handle<E: Normalize + ?Sized>(&self, error: &E) -> HandlingResult {
        let mut context = ErrorContext::new(UI_RENDER_OPERATION, self.module.clone());
        if let Some(user_id) = &self.user_id {
            context = context.with_user(user_id.clone());
        }

        let result = self
            .handler
            .handle_error(error, &context, self.custom_messages.as_ref());

        log_warn!(
            module = %self.module,
            category = %result.category,
            "Rendering fault caught by boundary"
        );
        result
    }
}
