pub mod consts;
pub mod dedup;
pub mod detection;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod measure;
pub mod pipeline;
pub mod preprocess;
pub mod quality;
pub mod record;
pub mod summary;
