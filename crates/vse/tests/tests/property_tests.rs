#[path = "property/construction.rs"]
mod construction;

#[path = "property/text_roundtrip.rs"]
mod text_roundtrip;

#[path = "property/migration_idempotence.rs"]
mod migration_idempotence;

#[path = "property/strict_mode.rs"]
mod strict_mode;

#[path = "property/monitor_window.rs"]
mod monitor_window;
