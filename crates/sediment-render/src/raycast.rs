//! Ray queries against the mesher's instance lists.
//!
//! A query runs as two dispatches: a one-worker setup that resets the running
//! minimum and sizes the intersection dispatch from the live instance counts,
//! then one worker per instance that tests both triangles of its face and
//! atomically lowers the fixed-point hit distance.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Mat3, Mat4, UVec3, Vec2, Vec3};
use sediment_core::constants::{NO_HIT_DISTANCE, RAYCAST_WORKGROUP_SIZE};
use sediment_core::direction::Face;
use sediment_world::Dispatcher;

use crate::instances::InstanceList;
use crate::pick::{PendingHit, RayHit};

/// A world-space ray. The direction is expected to be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from a camera at `position` through a cursor in normalized device
    /// coordinates, unprojected at depth 0.5.
    pub fn from_camera(position: Vec3, ndc: Vec2, inverse_projection: Mat4, inverse_view: Mat4) -> Self {
        let view = inverse_projection.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let world = inverse_view.project_point3(view);
        Self {
            origin: position,
            direction: (world - position).normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Launch size written by the setup kernel and read by the intersection
/// dispatch. Layout matches `wgpu::util::DispatchIndirectArgs`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IndirectDispatch {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Unit quad facing +z, as two triangles.
const QUAD: [[Vec3; 3]; 2] = [
    [
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
    ],
    [
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
        Vec3::new(-0.5, -0.5, 0.5),
    ],
];

/// Rotation taking the +z quad onto a face.
pub fn face_rotation(face: Face) -> Mat3 {
    match face {
        Face::North => Mat3::IDENTITY,
        Face::Up => Mat3::from_cols(Vec3::X, Vec3::NEG_Z, Vec3::Y),
        Face::Down => Mat3::from_cols(Vec3::X, Vec3::Z, Vec3::NEG_Y),
        Face::West => Mat3::from_cols(Vec3::Z, Vec3::Y, Vec3::NEG_X),
        Face::East => Mat3::from_cols(Vec3::NEG_Z, Vec3::Y, Vec3::X),
        Face::South => Mat3::from_cols(Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
    }
}

/// The two world-space triangles of a face instance.
pub fn face_triangles(origin: Vec3, face: Face) -> [[Vec3; 3]; 2] {
    let r = face_rotation(face);
    QUAD.map(|tri| tri.map(|v| r * v + origin))
}

/// Ray/triangle distance. Returns 0 for a miss, for a back face, and for a
/// triangle behind the origin.
pub fn intersect_triangle(a: Vec3, b: Vec3, c: Vec3, ray: &Ray) -> f32 {
    let edge1 = b - a;
    let edge2 = c - a;
    let normal = edge1.cross(edge2);
    let d_dot_n = -ray.direction.dot(normal);
    if d_dot_n <= 0.0 {
        return 0.0;
    }
    let diff = ray.origin - a;
    let d_dot_q_x_e2 = -ray.direction.dot(diff.cross(edge2));
    if d_dot_q_x_e2 < 0.0 {
        return 0.0;
    }
    let d_dot_e1_x_q = -ray.direction.dot(edge1.cross(diff));
    if d_dot_e1_x_q < 0.0 || d_dot_q_x_e2 + d_dot_e1_x_q > d_dot_n {
        return 0.0;
    }
    let q_dot_n = diff.dot(normal);
    if q_dot_n < 0.0 {
        return 0.0;
    }
    q_dot_n / d_dot_n
}

/// Two triangles spanning `[-X, 2X] x [-Z, 2Z]` on the lower face of the
/// floor layer. Used as the fallback target when the voxels are missed.
pub fn ground_plane(extents: UVec3) -> [[Vec3; 3]; 2] {
    let x = extents.x as f32;
    let z = extents.z as f32;
    let y = -0.5;
    [
        [
            Vec3::new(-x, y, 2.0 * z),
            Vec3::new(2.0 * x, y, 2.0 * z),
            Vec3::new(2.0 * x, y, -z),
        ],
        [
            Vec3::new(2.0 * x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, y, 2.0 * z),
        ],
    ]
}

/// Shared query state written by the kernels.
struct Query {
    ray: Ray,
    distance: AtomicU32,
    face: AtomicU32,
}

pub struct Raycaster {
    dispatcher: Dispatcher,
    precision: f32,
    query: Query,
    workgroups: [AtomicU32; 3],
}

impl Raycaster {
    pub fn new(dispatcher: Dispatcher, precision: f32) -> Self {
        Self {
            dispatcher,
            precision,
            query: Query {
                ray: Ray::new(Vec3::ZERO, Vec3::NEG_Y),
                distance: AtomicU32::new(NO_HIT_DISTANCE),
                face: AtomicU32::new(0),
            },
            workgroups: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
        }
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    /// The dispatch record written by the last setup.
    pub fn dispatch_record(&self) -> IndirectDispatch {
        IndirectDispatch {
            x: self.workgroups[0].load(Ordering::Relaxed),
            y: self.workgroups[1].load(Ordering::Relaxed),
            z: self.workgroups[2].load(Ordering::Relaxed),
        }
    }

    /// Setup kernel: reset the running minimum and size the intersection
    /// dispatch for `total` instances.
    fn setup(&self, total: u32) {
        let query = &self.query;
        let workgroups = &self.workgroups;
        self.dispatcher.run(1, |_| {
            query.distance.store(NO_HIT_DISTANCE, Ordering::Relaxed);
            workgroups[0].store(total.div_ceil(RAYCAST_WORKGROUP_SIZE), Ordering::Relaxed);
            workgroups[1].store(1, Ordering::Relaxed);
            workgroups[2].store(1, Ordering::Relaxed);
        });
    }

    /// Run the query against `lists` and start the asynchronous readback of
    /// the result.
    pub fn submit<'a>(&mut self, ray: Ray, lists: impl IntoIterator<Item = &'a InstanceList>) -> PendingHit {
        self.query.ray = ray;
        let lists: Vec<&InstanceList> = lists.into_iter().collect();

        // Prefix offsets of each list's live instances in the flat worker range.
        let mut starts = Vec::with_capacity(lists.len());
        let mut total = 0u32;
        for list in &lists {
            starts.push(total);
            total += list.len() as u32;
        }
        self.setup(total);

        let record = self.dispatch_record();
        let workers = (record.x * record.y * record.z * RAYCAST_WORKGROUP_SIZE) as usize;
        let query = &self.query;
        let precision = self.precision;
        self.dispatcher.run(workers, |id| {
            let id = id as u32;
            if id >= total {
                return;
            }
            let l = starts.partition_point(|s| *s <= id) - 1;
            if let Some(instance) = lists[l].get((id - starts[l]) as usize) {
                intersect_instance(query, precision, instance.origin(), instance.face());
            }
        });

        let words = [
            self.query.distance.load(Ordering::Relaxed),
            self.query.face.load(Ordering::Relaxed),
        ];
        log::debug!("Raycaster: {} instances tested, raw distance {:#x}", total, words[0]);
        PendingHit::spawn(ray, words, self.precision)
    }

    /// Host-side test against an arbitrary triangle set. Reports `face` as
    /// the hit orientation.
    pub fn compute_cpu(ray: &Ray, triangles: &[[Vec3; 3]], face: Face) -> Option<RayHit> {
        let distance = triangles
            .iter()
            .map(|t| intersect_triangle(t[0], t[1], t[2], ray))
            .filter(|d| *d != 0.0)
            .fold(f32::INFINITY, f32::min);
        distance
            .is_finite()
            .then(|| RayHit::new(ray, distance, face))
    }
}

/// Intersection kernel body for one face instance.
fn intersect_instance(query: &Query, precision: f32, origin: Vec3, face: Face) {
    for [a, b, c] in face_triangles(origin, face) {
        let d = intersect_triangle(a, b, c, &query.ray);
        if d != 0.0 {
            let distance = (d / precision).round() as u32;
            // The face store is not fused with the minimum; near-ties between
            // workers may leave a face that does not match the distance.
            if query.distance.fetch_min(distance, Ordering::Relaxed) > distance {
                query.face.store(face.index(), Ordering::Relaxed);
            }
        }
    }
}
