#[path = "e2e/scenarios.rs"]
mod scenarios;

#[path = "e2e/full_pipeline.rs"]
mod full_pipeline;

#[path = "e2e/serialization.rs"]
mod serialization;
