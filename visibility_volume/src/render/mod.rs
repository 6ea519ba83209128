pub mod render_context;
pub mod mock_render_context;

pub use render_context::{RenderContext, RenderStats};
