//! Quasi-uniform sphere sampling by icosahedral subdivision.
//!
//! Starting from a regular icosahedron, `divisions` evenly interpolated
//! points are inserted along each of the 30 edges and a triangular grid
//! of points fills each of the 20 faces. Every inserted point is then
//! projected onto the unit sphere and each vertex's neighbor ring is
//! sorted into a consistent counterclockwise cyclic order (as seen from
//! outside the sphere). The construction is pure precomputation, fully
//! deterministic, and independent of any volume data, so one sampling
//! can be shared across estimator runs.

// Vertex indices travel through i32 neighbor slots (-1 marks unused);
// the construction guarantees every stored index is in range.
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::Vector3;

/// Coordinates of the 12 icosahedron vertices.
const BASE_VERTICES: [[f64; 3]; 12] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.894_427_191_0, 0.447_213_595_0],
    [0.850_650_808_0, 0.276_393_202_0, 0.447_213_595_0],
    [0.525_731_112_0, -0.723_606_797_0, 0.447_213_595_0],
    [-0.525_731_112_0, -0.723_606_797_0, 0.447_213_595_0],
    [-0.850_650_808_0, 0.276_393_202_0, 0.447_213_595_0],
    [-0.850_650_808_0, -0.276_393_202_0, -0.447_213_595_0],
    [-0.525_731_112_0, 0.723_606_797_0, -0.447_213_595_0],
    [0.525_731_112_0, 0.723_606_797_0, -0.447_213_595_0],
    [0.850_650_808_0, -0.276_393_202_0, -0.447_213_595_0],
    [0.0, -0.894_427_191_0, -0.447_213_595_0],
    [0.0, 0.0, -1.0],
];

/// Adjacency of the 12 icosahedron vertices (5 neighbors each).
const BASE_NEIGHBORS: [[i32; 5]; 12] = [
    [1, 5, 4, 3, 2],
    [0, 2, 8, 7, 5],
    [0, 3, 9, 8, 1],
    [0, 4, 10, 9, 2],
    [0, 5, 6, 10, 3],
    [0, 1, 7, 6, 4],
    [4, 5, 7, 11, 10],
    [1, 8, 11, 6, 5],
    [1, 2, 9, 11, 7],
    [2, 3, 10, 11, 8],
    [3, 4, 6, 11, 9],
    [6, 7, 8, 9, 10],
];

/// Vertex under construction: position plus up to six neighbor slots,
/// unused slots marked -1.
#[derive(Debug, Clone, Copy)]
struct BuildVertex {
    pos: Vector3<f64>,
    neighbors: [i32; 6],
}

/// A subdivided icosahedral sphere sampling.
///
/// Vertex directions are quasi-uniform over the unit sphere; triangle
/// enumeration supports using averaged face corners as directions
/// instead. With `d` subdivisions the sampling has `12 + 30d + 10(d²−d)`
/// vertices, `2V − 4` triangles and `3V − 6` edges.
///
/// # Example
///
/// ```
/// use vessel_diameter::SphereSampling;
///
/// let sphere = SphereSampling::new(2);
/// assert_eq!(sphere.vertex_count(), 92);
/// assert_eq!(sphere.triangle_count(), 180);
/// assert_eq!(sphere.edge_count(), 270);
///
/// let v = sphere.vertex(50).unwrap();
/// assert!((v.norm() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SphereSampling {
    vertices: Vec<BuildVertex>,
    divisions: u32,
}

impl SphereSampling {
    /// Number of vertices a sampling with the given subdivision count has.
    #[must_use]
    pub const fn vertex_count_for(divisions: u32) -> usize {
        let d = divisions as usize;
        12 + 30 * d + 10 * (d * d - d)
    }

    /// Build a sampling with `divisions` points inserted per edge.
    #[must_use]
    pub fn new(divisions: u32) -> Self {
        let mut vertices = Vec::with_capacity(Self::vertex_count_for(divisions));
        for w in 0..12 {
            let mut neighbors = [-1i32; 6];
            neighbors[..5].copy_from_slice(&BASE_NEIGHBORS[w]);
            vertices.push(BuildVertex {
                pos: Vector3::from(BASE_VERTICES[w]),
                neighbors,
            });
        }

        if divisions >= 1 {
            let d = divisions as usize;
            vertices.resize(
                Self::vertex_count_for(divisions),
                BuildVertex {
                    pos: Vector3::zeros(),
                    neighbors: [-1; 6],
                },
            );
            insert_edge_points(&mut vertices, d);
            insert_face_points(&mut vertices, d);

            // project inserted points onto the unit sphere
            for vertex in vertices.iter_mut().skip(12) {
                vertex.pos /= vertex.pos.norm();
            }
        }

        let mut sphere = Self {
            vertices,
            divisions,
        };
        sphere.sort_neighbors_counterclockwise();
        sphere
    }

    /// Subdivision count this sampling was built with.
    #[must_use]
    pub const fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        2 * self.vertices.len() - 4
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        3 * self.vertices.len() - 6
    }

    /// Unit-length position of the vertex at `index`.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Vector3<f64>> {
        self.vertices.get(index).map(|v| v.pos)
    }

    /// All vertex positions, in index order.
    pub fn vertex_directions(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.vertices.iter().map(|v| v.pos)
    }

    /// Ring size of the vertex at `index` (5 for the 12 icosahedron
    /// vertices, 6 everywhere else).
    fn ring_len(&self, index: usize) -> usize {
        if index < 12 {
            5
        } else {
            6
        }
    }

    /// Cyclically ordered neighbor ring of the vertex at `index`,
    /// counterclockwise as seen from outside the sphere.
    #[must_use]
    pub fn neighbor_ring(&self, index: usize) -> Option<Vec<u32>> {
        let vertex = self.vertices.get(index)?;
        Some(
            vertex.neighbors[..self.ring_len(index)]
                .iter()
                .map(|&n| n as u32)
                .collect(),
        )
    }

    /// Enumerate all triangles as vertex index triples.
    ///
    /// Each triangle appears exactly once: vertices are visited from
    /// the highest index down, and a triangle is emitted by its
    /// highest-indexed corner, pairing consecutive ring neighbors whose
    /// own turn has not yet come.
    #[must_use]
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let count = self.vertices.len();
        let mut pending = vec![true; count];
        let mut triangles = Vec::with_capacity(self.triangle_count());
        for k in (0..count).rev() {
            pending[k] = false;
            let s = self.ring_len(k);
            for i in 0..s {
                let j = (i + 1) % s;
                let (ni, nj) = (
                    self.vertices[k].neighbors[i] as usize,
                    self.vertices[k].neighbors[j] as usize,
                );
                if pending[ni] && pending[nj] {
                    triangles.push([k as u32, nj as u32, ni as u32]);
                }
            }
        }
        triangles
    }

    /// Enumerate all edges as vertex index pairs, lower index first.
    #[must_use]
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let count = self.vertices.len();
        let mut edges = Vec::with_capacity(self.edge_count());
        for k in (0..count).rev() {
            for i in 0..self.ring_len(k) {
                let n = self.vertices[k].neighbors[i];
                if n > k as i32 {
                    edges.push([k as u32, n as u32]);
                }
            }
        }
        edges
    }

    /// Sort every vertex's neighbor slots into counterclockwise cyclic
    /// order, starting from the lowest-indexed neighbor.
    ///
    /// The turn direction is fixed by a signed-volume test on the first
    /// two ring members; the rest of the ring follows by walking to the
    /// nearest unvisited neighbor, which on a geodesic ring is always
    /// the adjacent one.
    fn sort_neighbors_counterclockwise(&mut self) {
        for w in 0..self.vertices.len() {
            let max = self.ring_len(w);
            let mut ring = [-1i32; 6];
            ring[..max].copy_from_slice(&self.vertices[w].neighbors[..max]);

            // lowest-indexed neighbor anchors the ring
            let mut kp = 0;
            for k in 1..max {
                if ring[k] < ring[kp] {
                    kp = k;
                }
            }
            let mut current = ring[kp];

            // the two ring members adjacent to the anchor
            let (mut d1, mut d2) = (12.0f64, 12.0f64);
            let (mut k1, mut k2) = (0usize, 0usize);
            let anchor_pos = self.vertices[current as usize].pos;
            for k in 0..max {
                if k == kp {
                    continue;
                }
                let d = (self.vertices[ring[k] as usize].pos - anchor_pos).norm_squared();
                if d1 > d {
                    if d2 > d1 {
                        d2 = d1;
                        k2 = k1;
                    }
                    d1 = d;
                    k1 = k;
                } else if d2 > d {
                    d2 = d;
                    k2 = k;
                }
            }

            // signed volume decides which adjacent member continues
            // counterclockwise as seen from outside
            let center = self.vertices[w].pos;
            let candidate = self.vertices[ring[k1] as usize].pos;
            let turn = (center - anchor_pos)
                .cross(&(center - candidate))
                .dot(&center);
            let (second, last) = if turn > 0.0 { (k1, k2) } else { (k2, k1) };

            self.vertices[w].neighbors[0] = current;
            ring[kp] = -1;
            current = ring[second];
            self.vertices[w].neighbors[1] = current;
            ring[second] = -1;
            self.vertices[w].neighbors[max - 1] = ring[last];
            ring[last] = -1;

            // walk the remaining members by nearest-to-previous
            for slot in 2..max - 1 {
                let mut best = 12.0f64;
                let mut best_k = 0usize;
                let current_pos = self.vertices[current as usize].pos;
                for k in 0..max {
                    if ring[k] < 0 {
                        continue;
                    }
                    let d = (self.vertices[ring[k] as usize].pos - current_pos).norm_squared();
                    if best > d {
                        best = d;
                        best_k = k;
                    }
                }
                current = ring[best_k];
                self.vertices[w].neighbors[slot] = current;
                ring[best_k] = -1;
            }
        }
    }
}

/// Insert `d` interpolated points along every icosahedron edge.
///
/// Each edge is claimed by its lower-numbered endpoint; the endpoint's
/// neighbor slot is redirected to the first inserted point and the run
/// of inserted points is chained through slots 0 and 1 (previous and
/// next along the edge).
fn insert_edge_points(vertices: &mut [BuildVertex], d: usize) {
    let mut next = 12usize;
    for w in 0..11 {
        for k in 0..5 {
            if BASE_NEIGHBORS[w][k] > w as i32 {
                let v = BASE_NEIGHBORS[w][k] as usize;
                let mut back_slot = 0;
                for l in 0..5 {
                    if BASE_NEIGHBORS[v][l] == w as i32 {
                        back_slot = l;
                        break;
                    }
                }

                vertices[w].neighbors[k] = next as i32;
                let (from, to) = (vertices[w].pos, vertices[v].pos);
                for j in 1..=d {
                    vertices[next].neighbors =
                        [next as i32 - 1, next as i32 + 1, -1, -1, -1, -1];
                    vertices[next].pos =
                        (to * j as f64 + from * (d + 1 - j) as f64) / (d + 1) as f64;
                    next += 1;
                }
                vertices[next - d].neighbors[0] = w as i32;
                vertices[next - 1].neighbors[1] = v as i32;
                vertices[v].neighbors[back_slot] = next as i32 - 1;
            }
        }
    }
}

/// Link `value` into the first free face-neighbor slot of `target`.
fn attach(vertices: &mut [BuildVertex], target: i32, value: i32) {
    let t = target as usize;
    for slot in 2..6 {
        if vertices[t].neighbors[slot] < 0 {
            vertices[t].neighbors[slot] = value;
            return;
        }
    }
}

/// Fill every face with a triangular grid of `d·(d−1)/2` points.
///
/// A face is claimed by its lowest-numbered corner `w` via two
/// consecutive higher-numbered neighbors. Rows of the grid are laid
/// parallel to the far edge; row points connect to the two near edges'
/// inserted points, to one another, and (on the last row) to the far
/// edge's inserted points.
fn insert_face_points(vertices: &mut [BuildVertex], d: usize) {
    let mut next = (12 + 30 * d) as i32;
    let dw = d as i32;

    for w in 0..11usize {
        for k in 0..5usize {
            let wi = w as i32;
            if BASE_NEIGHBORS[w][k] <= wi || BASE_NEIGHBORS[w][(k + 1) % 5] <= wi {
                continue;
            }
            // corners: w < v < l; wv/wl are w's slots toward v and l
            let (mut v, mut l) = (BASE_NEIGHBORS[w][k], BASE_NEIGHBORS[w][(k + 1) % 5]);
            let (wv, wl) = if l < v {
                std::mem::swap(&mut v, &mut l);
                ((k + 1) % 5, k)
            } else {
                (k, (k + 1) % 5)
            };
            let (v, l) = (v as usize, l as usize);
            let mut vl = 0;
            for t in 0..5 {
                if BASE_NEIGHBORS[v][t] == l as i32 {
                    vl = t;
                    break;
                }
            }

            // first inserted point of each bounding edge
            let edge_wv = vertices[w].neighbors[wv];
            let edge_wl = vertices[w].neighbors[wl];
            let edge_vl = vertices[v].neighbors[vl];

            // stitch the edge points nearest each corner to one another
            attach(vertices, edge_wl, edge_wv);
            attach(vertices, edge_wv, edge_wl);
            attach(vertices, edge_vl, edge_wv + dw - 1);
            attach(vertices, edge_wv + dw - 1, edge_vl);
            attach(vertices, edge_wl + dw - 1, edge_vl + dw - 1);
            attach(vertices, edge_vl + dw - 1, edge_wl + dw - 1);

            // interior rows, row jj has jj points
            for jj in 1..dw {
                for j in 1..=jj {
                    if j <= 1 {
                        vertices[next as usize].neighbors[0] = edge_wv + jj;
                        attach(vertices, edge_wv + jj, next);
                        vertices[next as usize].neighbors[1] = edge_wv + jj - 1;
                        attach(vertices, edge_wv + jj - 1, next);
                    } else {
                        vertices[next as usize].neighbors[0] = next - 1;
                        vertices[next as usize].neighbors[1] = next - jj;
                    }

                    if j >= jj {
                        vertices[next as usize].neighbors[2] = edge_wl + jj;
                        attach(vertices, edge_wl + jj, next);
                        vertices[next as usize].neighbors[3] = edge_wl + jj - 1;
                        attach(vertices, edge_wl + jj - 1, next);
                    } else {
                        vertices[next as usize].neighbors[2] = next + 1;
                        vertices[next as usize].neighbors[3] = next - jj + 1;
                    }

                    if jj >= dw - 1 {
                        vertices[next as usize].neighbors[4] = edge_vl + j - 1;
                        attach(vertices, edge_vl + j - 1, next);
                        vertices[next as usize].neighbors[5] = edge_vl + j;
                        attach(vertices, edge_vl + j, next);
                    } else {
                        vertices[next as usize].neighbors[4] = next + jj;
                        vertices[next as usize].neighbors[5] = next + jj + 1;
                    }

                    {
                        let row_wv = vertices[(edge_wv + jj) as usize].pos;
                        let row_wl = vertices[(edge_wl + jj) as usize].pos;
                        vertices[next as usize].pos =
                            (row_wv * (jj + 1 - j) as f64 + row_wl * j as f64) / (jj + 1) as f64;
                    }
                    next += 1;
                }
            }
        }
    }
}
