/*!
# Visibility Volume - Software Renderer Backend

Headless CPU implementation of the `visibility_volume` render traits.

The backend rasterizes triangle meshes into reversed-Z depth targets
(cleared to 0.0, GREATER test, near plane at 1.0) and needs no GPU, window
or driver. Scene meshes are loaded from OBJ files or built in code.

```no_run
use visibility_volume::visvol::{CaptureDriver, ObjFileSink, VisibilityVolumeDesc};
use visibility_volume_renderer_soft::{builtin_scene, SoftRenderContext};

let mut ctx = SoftRenderContext::new(builtin_scene());
let mut sink = ObjFileSink::new();
CaptureDriver::default().process(&mut ctx, VisibilityVolumeDesc::default(), &mut sink)?;
# Ok::<(), visibility_volume::visvol::Error>(())
```
*/

mod rasterizer;
mod scene;
mod obj_loader;
mod soft_render_context;

pub use rasterizer::{rasterize_triangle, DepthTarget};
pub use scene::{builtin_scene, SceneMesh, SceneMeshKey, SoftScene};
pub use obj_loader::{load_obj_triangles, parse_obj};
pub use soft_render_context::SoftRenderContext;
