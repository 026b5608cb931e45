//! Error handling example demonstrating classification, messages, retries and boundaries.
//!
//! This example shows how to:
//! - Turn raw backend failures into a `HandlingResult`
//! - Supply page-specific messages for known error codes
//! - Retry a flaky operation with category-driven backoff
//! - Cancel a retry loop from the outside
//! - Contain a panicking render with a fault boundary
//!
//! # Running
//!
//! ```bash
//! cargo run --example error_handling
//! ```
//!
//! # Categories
//!
//! | Category | Status | Action |
//! |----------|--------|--------|
//! | Network | no response | Retry with backoff |
//! | Server | 5xx | Retry with backoff |
//! | Validation, Conflict, NotFound | 422, 409, 404 | Show message, do not retry |
//! | Authentication, Authorization | 401, 403 | Show message, do not retry |

use bizops_resilience::{
    create_context, CustomMessages, ErrorHandler, RawFailure, RetryError, RetryOptions,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shows the handling decision for a range of backend failures
fn demonstrate_handling(handler: &ErrorHandler) {
    println!("=== Handling Backend Failures ===\n");

    let context = create_context("save_employee", "hr", None);
    let failures = vec![
        RawFailure::Offline,
        RawFailure::response(401, r#"{"code":"TOKEN_EXPIRED"}"#),
        RawFailure::response(422, r#"{"code":"INVALID_FORMAT","message":"iban checksum"}"#),
        RawFailure::response(409, r#"{"code":"DUPLICATE_ENTRY"}"#),
        RawFailure::response(503, "Service Unavailable"),
        RawFailure::Response {
            status: 418,
            body: None,
        },
    ];

    for failure in failures {
        let result = handler.handle_error(&failure, &context, None);
        println!("{failure}:");
        println!("  Category: {}", result.category);
        println!("  Severity: {}", result.severity);
        println!("  Retry in: {:?}", result.retry_delay());
        println!("  Logged: {}", result.should_log);
        println!("  User message: {}\n", result.user_message);
    }
}

/// Shows that a page can replace the default text for a known code
fn demonstrate_custom_messages(handler: &ErrorHandler) {
    println!("=== Custom Messages ===\n");

    let mut messages = CustomMessages::new();
    messages.insert(
        "DUPLICATE_ENTRY".to_string(),
        "A supplier with this VAT number already exists.".to_string(),
    );

    let context = create_context("create_supplier", "procurement", None);
    let failure = RawFailure::response(409, r#"{"code":"DUPLICATE_ENTRY"}"#);

    let plain = handler.handle_error(&failure, &context, None);
    let custom = handler.handle_error(&failure, &context, Some(&messages));
    println!("Default: {}", plain.user_message);
    println!("Custom:  {}\n", custom.user_message);
}

/// Retries an operation that fails twice with a network error before succeeding
async fn demonstrate_retry(handler: &ErrorHandler) {
    println!("=== Retrying a Flaky Operation ===\n");

    let context = create_context("list_invoices", "finance", None);
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let outcome = handler
        .with_retry(
            move || {
                let counter = counter.clone();
                async move {
                    let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if call < 3 {
                        Err(RawFailure::Timeout)
                    } else {
                        Ok(vec!["INV-1001", "INV-1002"])
                    }
                }
            },
            &context,
            RetryOptions::new().base_delay(Duration::from_millis(100)),
        )
        .await;

    match outcome {
        Ok(invoices) => println!(
            "Loaded {} invoices after {} calls\n",
            invoices.len(),
            calls.load(Ordering::SeqCst)
        ),
        Err(err) => println!("Gave up after {} attempts\n", err.attempts()),
    }
}

/// Cancels a retry loop while it waits between attempts
async fn demonstrate_cancellation(handler: &ErrorHandler) {
    println!("=== Cancelling a Retry Loop ===\n");

    let context = create_context("sync_assets", "assets", None);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        trigger.cancel();
    });

    let outcome: Result<(), RetryError<RawFailure>> = handler
        .with_retry(
            || async { Err(RawFailure::Offline) },
            &context,
            RetryOptions::new()
                .base_delay(Duration::from_millis(500))
                .cancel_on(token),
        )
        .await;

    if let Err(err) = outcome {
        println!(
            "Cancelled: {}, attempts made: {}\n",
            err.is_cancelled(),
            err.attempts()
        );
    }
}

/// Contains a panic raised while building a view
fn demonstrate_boundary(handler: &ErrorHandler) {
    println!("=== Fault Boundary ===\n");

    let boundary = handler.boundary("crm").with_user("user-7");
    let rendered = boundary.render(|| -> String {
        let contacts: Vec<&str> = Vec::new();
        format!("Primary contact: {}", contacts[0])
    });

    match rendered {
        Ok(view) => println!("{view}"),
        Err(result) => println!("Fallback shown: {}\n", result.user_message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let handler = ErrorHandler::default();

    demonstrate_handling(&handler);
    demonstrate_custom_messages(&handler);
    demonstrate_retry(&handler).await;
    demonstrate_cancellation(&handler).await;
    demonstrate_boundary(&handler);

    println!("=== Error Handling Patterns Summary ===\n");
    println!("1. Pass every failure through handler.handle_error()");
    println!("2. Show result.user_message, never the raw backend text");
    println!("3. Only schedule a retry when result.should_retry() is true");
    println!("4. Wrap transient operations in handler.with_retry()");
    println!("5. Wrap rendering work in a FaultBoundary");

    Ok(())
}
