pub mod complex;
pub mod compute_data;
pub mod config;
pub mod error;
pub mod pixel_rect;
pub mod transforms;
pub mod view_path;
pub mod view_state;

pub use complex::Complex;
pub use compute_data::PixelSample;
pub use config::{calculate_max_iterations, BackgroundConfig};
pub use error::ConfigError;
pub use pixel_rect::PixelRect;
pub use transforms::{complex_to_pixel, pixel_to_complex};
pub use view_path::{spiral_at, PathEvent, ViewPathController, ZoomDirection, WAYPOINTS};
pub use view_state::ViewState;
