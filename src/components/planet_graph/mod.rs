//! Community-coloured planet graph: dataset contract, procedural planet
//! assets, the canvas scene engine and the Leptos component that ties them
//! together.

pub mod assets;
pub mod color;
mod component;
pub mod deferred;
pub mod engine;
pub mod error;
pub mod focus;
pub mod preset;
mod render;
pub mod state;
pub mod style;
pub mod texture;
pub mod tuner;
pub mod types;
pub mod view_model;

pub use assets::AssetRegistry;
pub use component::PlanetGraph;
pub use error::GraphDataError;
pub use types::{GraphData, GraphEdge, GraphNode, GraphStats};
pub use view_model::ViewModel;
