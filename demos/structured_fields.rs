//! Structured fields example
//!
//! Shows derived loggers, request context and how fields render in the text
//! and JSON formats.
//!
//! Run with: cargo run --example structured_fields

use leveled_logger::prelude::*;
use leveled_logger::info;

fn handle_request(logger: &Logger, ctx: &RequestContext) {
    let log = logger.with_context(ctx);
    info!(log, "handling {}", "/orders");
    log.with_fields([("items", FieldValue::from(3)), ("total", FieldValue::from(59.9))])
        .info("order placed");
}

fn main() {
    println!("=== Leveled Logger - Structured Fields Example ===\n");

    let ctx = RequestContext::new()
        .with_value(ContextKey::RequestId, "7f3a")
        .with_value(ContextKey::UserId, 1001u64);

    println!("1. Text output:");
    let text = Logger::builder()
        .show_caller(false)
        .field("service", "shop")
        .build();
    handle_request(&text, &ctx);

    println!("\n2. JSON output:");
    let json = Logger::builder().json(true).field("service", "shop").build();
    handle_request(&json, &ctx);

    println!("\n3. Child fields override the parent:");
    let staging = text.with_field("env", "staging");
    staging.with_field("env", "prod").warn("deployed");
    staging.info("parent is unchanged");

    println!("\n=== Example completed successfully! ===");
}
