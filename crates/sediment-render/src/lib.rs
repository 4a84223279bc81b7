pub mod instances;
pub mod mesher;
pub mod pick;
pub mod raycast;
pub mod upload;

pub use instances::{ChunkInstances, DrawHeader, Instance, InstanceList};
pub use mesher::{MeshStats, Mesher};
pub use pick::{PendingHit, RayHit};
pub use raycast::{ground_plane, IndirectDispatch, Ray, Raycaster};
pub use upload::InstanceUpload;
