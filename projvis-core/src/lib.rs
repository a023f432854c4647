/// Projvis Core Library - Planar projective geometry for wireframe viewing
///
/// This library provides the stateless core: the generalized planar
/// perspective projection, viewport auto-fit, and the text loaders for
/// models and viewpoint configuration.

pub mod config;
pub mod frame;
pub mod model;
pub mod projection;
pub mod vector;
pub mod viewport;

// Re-export commonly used types
pub use config::{ConfigError, ProjectionConfig};
pub use frame::{Frame, Segment};
pub use model::{Face, ModelError, WireframeModel};
pub use projection::{ProjectionError, ProjectionSystem};
pub use vector::Vec3;
pub use viewport::{fit, Viewport};
