//! Static map geometry: the collision queries the simulation runs every tick
//! and the paint coverage that decides the match.
//!
//! [`MapGeometry`] is the boundary the simulation talks to. [`MeshMap`] is an
//! in-memory triangle mesh implementing it, either from raw vertex/face data
//! or as a generated walled arena.

use arena_shared::{GREEN, PINK};
use glam::Vec3;

use crate::error::ServerError;

pub type FaceId = u32;

/// Where a query touched the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub face: FaceId,
}

/// Result of a player collision query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Sum of the normals of every face touched, each facing the query point.
    /// Zero when nothing was touched.
    pub normal_sum: Vec3,
    /// The highest contact point and its face.
    pub surface: Option<SurfaceHit>,
}

/// Share of the total surface area owned by each team, plus what is left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaintScores {
    pub green: f32,
    pub pink: f32,
    pub unpainted: f32,
}

pub trait MapGeometry {
    fn collide(&self, position: Vec3, radius: f32) -> Contact;
    fn projectile_collide(&self, position: Vec3, radius: f32) -> Option<SurfaceHit>;
    fn paint(&mut self, face: FaceId, point: Vec3, radius: f32, color: u32);
    fn score(&self) -> PaintScores;
}

/// World units covered by one unit of paint radius.
pub const PAINT_SCALE: f32 = 0.01;

#[derive(Debug, Clone)]
struct Face {
    vertices: [Vec3; 3],
    normal: Vec3,
    centroid: Vec3,
    area: f32,
    color: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct MeshMap {
    faces: Vec<Face>,
    total_area: f32,
}

impl MeshMap {
    pub fn new(vertices: &[Vec3], faces: &[[u32; 3]]) -> Result<Self, ServerError> {
        let faces = faces
            .iter()
            .enumerate()
            .map(|(index, indices)| -> Result<Face, ServerError> {
                let mut corners = [Vec3::ZERO; 3];
                for (corner, &vertex) in corners.iter_mut().zip(indices) {
                    *corner = *vertices
                        .get(vertex as usize)
                        .ok_or(ServerError::InvalidMesh { face: index })?;
                }
                Ok(Face::new(corners))
            })
            .collect::<Result<Vec<_>, ServerError>>()?;

        Ok(Self::from_faces(faces))
    }

    /// A square floor of `cells` x `cells` quads centred on the origin at
    /// height `floor_z`, closed in by four walls of `wall_height`.
    pub fn arena(half_extent: f32, cells: u32, floor_z: f32, wall_height: f32) -> Self {
        let cells = cells.max(1);
        let cell = 2.0 * half_extent / cells as f32;
        let mut faces = Vec::new();

        for row in 0..cells {
            for col in 0..cells {
                let x0 = -half_extent + col as f32 * cell;
                let y0 = -half_extent + row as f32 * cell;
                push_quad(
                    &mut faces,
                    [
                        Vec3::new(x0, y0, floor_z),
                        Vec3::new(x0 + cell, y0, floor_z),
                        Vec3::new(x0 + cell, y0 + cell, floor_z),
                        Vec3::new(x0, y0 + cell, floor_z),
                    ],
                );
            }
        }

        let top = floor_z + wall_height;
        let h = half_extent;
        let corners = [
            Vec3::new(-h, -h, floor_z),
            Vec3::new(h, -h, floor_z),
            Vec3::new(h, h, floor_z),
            Vec3::new(-h, h, floor_z),
        ];
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            push_quad(&mut faces, [a, b, b.with_z(top), a.with_z(top)]);
        }

        Self::from_faces(faces)
    }

    fn from_faces(faces: Vec<Face>) -> Self {
        let total_area = faces.iter().map(|face| face.area).sum();
        Self {
            faces,
            total_area,
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn face_color(&self, face: FaceId) -> Option<u32> {
        self.faces.get(face as usize).and_then(|f| f.color)
    }

    /// Nearest face touched by a sphere, with its distance.
    fn closest_hit(&self, position: Vec3, radius: f32) -> Option<(f32, SurfaceHit)> {
        self.touching(position, radius)
            .map(|(face, point, distance)| (distance, SurfaceHit { point, face }))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Faces within `radius` of `position` with their closest points.
    fn touching(
        &self,
        position: Vec3,
        radius: f32,
    ) -> impl Iterator<Item = (FaceId, Vec3, f32)> + '_ {
        self.faces.iter().enumerate().filter_map(move |(index, face)| {
            let point = face.closest_point(position);
            let distance = position.distance(point);
            (distance < radius).then_some((index as FaceId, point, distance))
        })
    }
}

impl MapGeometry for MeshMap {
    fn collide(&self, position: Vec3, radius: f32) -> Contact {
        let mut normal_sum = Vec3::ZERO;
        let mut surface: Option<SurfaceHit> = None;

        for (face, point, _) in self.touching(position, radius) {
            let mut normal = self.faces[face as usize].normal;
            if normal.dot(position - point) < 0.0 {
                normal = -normal;
            }
            normal_sum += normal;

            if surface.map_or(true, |best| point.z > best.point.z) {
                surface = Some(SurfaceHit { point, face });
            }
        }

        Contact {
            normal_sum,
            surface,
        }
    }

    fn projectile_collide(&self, position: Vec3, radius: f32) -> Option<SurfaceHit> {
        self.closest_hit(position, radius).map(|(_, hit)| hit)
    }

    fn paint(&mut self, face: FaceId, point: Vec3, radius: f32, color: u32) {
        let reach = radius * PAINT_SCALE;
        if let Some(target) = self.faces.get_mut(face as usize) {
            target.color = Some(color);
        }
        for other in &mut self.faces {
            if other.centroid.distance(point) <= reach {
                other.color = Some(color);
            }
        }
    }

    fn score(&self) -> PaintScores {
        if self.total_area <= 0.0 {
            return PaintScores {
                unpainted: 1.0,
                ..PaintScores::default()
            };
        }

        let mut scores = PaintScores::default();
        for face in &self.faces {
            let share = face.area / self.total_area;
            match face.color {
                Some(GREEN) => scores.green += share,
                Some(PINK) => scores.pink += share,
                _ => scores.unpainted += share,
            }
        }
        scores
    }
}

fn push_quad(faces: &mut Vec<Face>, [a, b, c, d]: [Vec3; 4]) {
    faces.push(Face::new([a, b, c]));
    faces.push(Face::new([a, c, d]));
}

impl Face {
    fn new(vertices: [Vec3; 3]) -> Self {
        let [a, b, c] = vertices;
        let cross = (b - a).cross(c - a);
        Self {
            vertices,
            normal: cross.normalize_or_zero(),
            centroid: (a + b + c) / 3.0,
            area: 0.5 * cross.length(),
            color: None,
        }
    }

    /// Closest point on the triangle to `p`, by Voronoi region.
    fn closest_point(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.vertices;
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
        }

        let denom = 1.0 / (va + vb + vc);
        a + ab * (vb * denom) + ac * (vc * denom)
    }
}
