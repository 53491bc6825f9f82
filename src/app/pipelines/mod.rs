pub mod profile_pipeline;
