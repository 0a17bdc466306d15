use lucid_telemetry::{init_tracing, level_filter};

#[test]
fn configured_level_is_used() {
    assert_eq!(level_filter("debug").to_string(), "debug");
    assert_eq!(level_filter("warn").to_string(), "warn");
}

#[test]
fn invalid_level_falls_back_to_info() {
    assert_eq!(level_filter("not=a=level").to_string(), "info");
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing("info");
    init_tracing("debug");
    tracing::info!(component = "test", "tracing initialized twice");
}
