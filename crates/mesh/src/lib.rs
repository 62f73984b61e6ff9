//! Flat grid mesh used as the water surface.
//!
//! Built once at startup and immutable afterward. Vertices lie in the XZ
//! plane at y = −1; vertex `(x, row)` sits at world `(x, -1, -row)`, so the
//! grid extends ahead of an identity camera at the origin.
//!
//! # Invariants
//! - Triangles wind counter-clockwise seen from above (+Y), so back-face
//!   culling shows the grid from above.
//! - Index ordering per cell is `(v, v+1, v+W)` then `(v+1, v+W+1, v+W)`,
//!   where `v` is the cell's row-major top-left vertex and `W` the row
//!   width. Renderers rely on this exact ordering for winding.

use bytemuck::{Pod, Zeroable};

/// Color applied to every grid vertex: opaque blue.
pub const GRID_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// A single grid vertex in the GPU buffer layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// A triangulated vertex grid and its index list.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    vertices: Vec<GridVertex>,
    indices: Vec<u32>,
    width: u32,
    height: u32,
}

impl GridMesh {
    /// Vertex buffer contents.
    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }

    /// Index buffer contents, three entries per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Build a `width × height` vertex grid triangulated into two triangles per
/// cell.
///
/// `width` and `height` count vertices, not cells: a 10×10 grid has 100
/// vertices and `9 × 9 × 2` triangles. Grids with fewer than two vertices
/// in either dimension have no cells and produce an empty index list.
pub fn build_grid(width: u32, height: u32) -> GridMesh {
    let mut vertices = Vec::with_capacity((width as usize) * (height as usize));
    for row in 0..height {
        for x in 0..width {
            vertices.push(GridVertex {
                position: [x as f32, -1.0, -(row as f32)],
                color: GRID_COLOR,
            });
        }
    }

    let cells_x = width.saturating_sub(1) as usize;
    let cells_z = height.saturating_sub(1) as usize;
    let mut indices = Vec::with_capacity(cells_x * cells_z * 6);
    for row in 0..cells_z as u32 {
        for x in 0..cells_x as u32 {
            let v = row * width + x;
            indices.extend_from_slice(&[v, v + 1, v + width]);
            indices.extend_from_slice(&[v + 1, v + width + 1, v + width]);
        }
    }

    GridMesh {
        vertices,
        indices,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_by_ten_grid_counts() {
        let mesh = build_grid(10, 10);
        assert_eq!(mesh.vertex_count(), 100);
        assert_eq!(mesh.index_count(), 486);
        assert_eq!(mesh.triangle_count(), 162);
    }

    #[test]
    fn first_cell_triangle_ordering() {
        let mesh = build_grid(10, 10);
        assert_eq!(&mesh.indices()[..6], &[0, 1, 10, 1, 11, 10]);
    }

    #[test]
    fn vertices_lie_in_plane_below_origin() {
        let mesh = build_grid(10, 10);
        // Row-major: vertex (x=3, row=2) is index 2 * 10 + 3.
        let v = mesh.vertices()[23];
        assert_eq!(v.position, [3.0, -1.0, -2.0]);
        assert_eq!(v.color, GRID_COLOR);

        let last = mesh.vertices()[99];
        assert_eq!(last.position, [9.0, -1.0, -9.0]);
    }

    #[test]
    fn first_triangle_faces_up() {
        let mesh = build_grid(10, 10);
        let [a, b, c] = [
            mesh.vertices()[mesh.indices()[0] as usize].position,
            mesh.vertices()[mesh.indices()[1] as usize].position,
            mesh.vertices()[mesh.indices()[2] as usize].position,
        ];
        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let normal_y = ab[2] * ac[0] - ab[0] * ac[2];
        assert!(normal_y > 0.0, "winding must face +Y, got y = {normal_y}");
    }

    #[test]
    fn all_indices_in_bounds() {
        let mesh = build_grid(7, 5);
        assert_eq!(mesh.vertex_count(), 35);
        assert_eq!(mesh.index_count(), (7 - 1) * (5 - 1) * 6);
        for &i in mesh.indices() {
            assert!((i as usize) < mesh.vertex_count());
        }
    }

    #[test]
    fn single_row_grid_has_no_cells() {
        let mesh = build_grid(10, 1);
        assert_eq!(mesh.vertex_count(), 10);
        assert!(mesh.indices().is_empty());
    }

    #[test]
    fn single_vertex_grid() {
        let mesh = build_grid(1, 1);
        assert_eq!(mesh.vertex_count(), 1);
        assert!(mesh.indices().is_empty());
    }

    #[test]
    fn empty_grid() {
        let mesh = build_grid(0, 0);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.indices().is_empty());
    }

    #[test]
    fn vertex_layout_is_pod() {
        let mesh = build_grid(2, 2);
        let bytes: &[u8] = bytemuck::cast_slice(mesh.vertices());
        assert_eq!(bytes.len(), 4 * std::mem::size_of::<GridVertex>());
        assert_eq!(std::mem::size_of::<GridVertex>(), 28);
    }
}
