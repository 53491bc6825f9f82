pub use crate::app::pipelines::profile_pipeline::ProfilePipeline;
