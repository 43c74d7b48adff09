//! Groups and attributes example
//!
//! Shows how ambient groups become a path prefix, how a lone record group is
//! promoted into that path, and how other groups render inline.
//!
//! Run with: cargo run --example groups_and_attrs

use condensed_log::prelude::*;

fn main() -> Result<()> {
    println!("=== condensed_log - Groups and Attributes Example ===\n");

    let handler = TextHandler::builder()
        .time_pattern("%H:%M:%S%.4f")
        .level(Level::DEBUG)
        .hide_level(Level::INFO)
        .output(std::io::stdout())
        .build()?;
    let root = Logger::new(handler);

    println!("1. Ambient groups:");
    let http = root.with_group("http");
    http.info("listening");
    http.with_group("tls").info("certificate loaded");

    println!("\n2. Scalar and group attributes:");
    root.info_attrs(
        "request served",
        [
            Attr::new("path", "/index.html"),
            Attr::group(
                "client",
                [Attr::new("addr", "10.0.0.7"), Attr::new("agent", "curl/8.0")],
            ),
        ],
    );

    println!("\n3. A lone group is promoted into the prefix:");
    http.info_attrs(
        "handshake",
        [Attr::group("peer", [Attr::group("cert", [Attr::new("cn", "example.org")])])],
    );

    println!("\n4. Ambient attributes keep record groups inline:");
    let worker = root.with([Attr::new("worker", 3)]);
    worker.warn_attrs("job retried", [Attr::group("job", [Attr::new("id", 812)])]);

    println!("\n5. Source locations:");
    let traced = TextHandler::builder()
        .time_format(TimestampFormat::Omit)
        .include_source(true)
        .output(std::io::stdout())
        .build()?;
    Logger::new(traced).warn("where did this come from?");

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
