//! Block preview pipeline: normalize, convert, bind, reconcile, render.

pub mod builder;
pub mod context;
pub mod convert;
pub mod grid;
pub mod models;
pub mod normalize;
pub mod request;
pub mod service;
pub mod view;

pub use context::RenderContext;
pub use models::ModelRegistry;
pub use normalize::Normalizer;
pub use request::{BlockPreviewer, PreviewQuery, PreviewRequest};
pub use service::{
    BlockPreviewService, GridPreviewService, ListPreviewService, PreparedBlock, PreviewPipeline,
};
pub use view::{ViewData, ViewLocations, ViewRenderer};
