use glam::{Mat4, Vec4};
use oceanview_camera::Camera;
use oceanview_mesh::GridMesh;

/// View and projection transforms for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    /// Maps world space into camera space.
    pub view: Mat4,
    /// Maps camera space into clip space.
    pub projection: Mat4,
}

impl FrameTransforms {
    /// Derive both transforms from a camera and the viewport size in pixels.
    pub fn from_camera(camera: &Camera, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(viewport_width, viewport_height),
        }
    }

    /// Combined clip-from-world transform: `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Backend-agnostic draw interface. All presentation surfaces implement
/// this trait.
///
/// A surface receives the frame transforms and the static mesh, then
/// produces output. It never mutates either. Depth testing, where the
/// backend supports it, applies for the duration of one `present` call only.
pub trait PresentationSurface {
    /// The output type produced by this surface.
    type Output;

    /// Present one frame of the mesh under the given transforms.
    fn present(&self, transforms: &FrameTransforms, mesh: &GridMesh) -> Self::Output;
}

/// Debug text surface — workaround for the wgpu GPU backend.
///
/// Produces a human-readable frame summary. Useful for logging and for
/// testing the presentation interface without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextSurface;

impl DebugTextSurface {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationSurface for DebugTextSurface {
    type Output = String;

    fn present(&self, transforms: &FrameTransforms, mesh: &GridMesh) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame ({}x{} grid) ===\n",
            mesh.width(),
            mesh.height()
        ));
        out.push_str(&format!(
            "Mesh: {} vertices, {} indices, {} triangles\n",
            mesh.vertex_count(),
            mesh.index_count(),
            mesh.triangle_count()
        ));

        if let Some(vertex) = mesh.vertices().first() {
            let [x, y, z] = vertex.position;
            let clip = transforms.view_projection() * Vec4::new(x, y, z, 1.0);
            out.push_str(&format!(
                "Vertex 0 clip: ({:.2}, {:.2}, {:.2}, {:.2})\n",
                clip.x, clip.y, clip.z, clip.w
            ));
        }

        out
    }
}
