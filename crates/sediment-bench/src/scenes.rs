use glam::{IVec3, Vec3};
use sediment::{BrushCommand, GeneratorParams, Material, Volume, VolumeConfig};

/// What a scene puts in the world before and during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Generated terrain left to settle.
    Terrain,
    /// Generated terrain with sand and water strokes dropped every frame.
    Rain,
    /// One tall sand column collapsing onto an empty floor.
    Column,
}

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: SceneKind,
    pub volume: VolumeConfig,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
}

impl SceneConfig {
    pub fn camera_ray(&self) -> sediment::Ray {
        let position = Vec3::from(self.camera_position);
        let target = Vec3::from(self.camera_target);
        sediment::Ray::new(position, (target - position).normalize_or_zero())
    }
}

/// Return the standard suite: every scene kind on a default-sized world.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let volume = VolumeConfig::default();
    let size = volume.world_size().as_vec3();
    let center = [size.x / 2.0, 0.0, size.z / 2.0];
    let above = [size.x / 2.0 + 60.0, size.y + 40.0, size.z / 2.0 + 60.0];

    vec![
        SceneConfig {
            name: "terrain",
            kind: SceneKind::Terrain,
            volume: volume.clone(),
            camera_position: above,
            camera_target: center,
        },
        SceneConfig {
            name: "terrain+rain",
            kind: SceneKind::Rain,
            volume: volume.clone(),
            camera_position: above,
            camera_target: center,
        },
        SceneConfig {
            name: "column",
            kind: SceneKind::Column,
            volume,
            camera_position: above,
            camera_target: center,
        },
    ]
}

/// Fill the world for the first frame.
pub fn populate(volume: &mut Volume, kind: SceneKind) {
    match kind {
        SceneKind::Terrain | SceneKind::Rain => {
            volume.generate(&GeneratorParams::default());
        }
        SceneKind::Column => {
            let size = volume.world_size().as_ivec3();
            let radius = (size.x.min(size.z) / 8).max(1) as u32;
            for y in (0..size.y).step_by(radius as usize) {
                let center = IVec3::new(size.x / 2, y, size.z / 2);
                volume.brush(&BrushCommand::paint(center, Material::Granular, 0xC2_B2_80, radius, 24));
            }
            volume.remesh();
        }
    }
}

/// Strokes dropped on `frame` of a rain scene. Positions walk the world on a
/// fixed stride so runs are comparable.
pub fn rain_strokes(volume: &Volume, frame: u32) -> Vec<BrushCommand> {
    let size = volume.world_size().as_ivec3();
    let top = size.y - 1;
    let step = frame as i32 * 37;
    let sand = IVec3::new((step * 7) % size.x, top, (step * 13) % size.z);
    let water = IVec3::new((step * 11 + size.x / 2) % size.x, top, (step * 5 + size.z / 2) % size.z);
    vec![
        BrushCommand::paint(sand, Material::Granular, 0xC2_B2_80, 4, 24),
        BrushCommand::paint(water, Material::Liquid, 0x33_66_CC, 4, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scenes_are_valid() {
        let scenes = standard_scenes();
        assert_eq!(scenes.len(), 3);
        for scene in &scenes {
            assert!(scene.volume.validate().is_ok(), "{}", scene.name);
            assert!(scene.camera_ray().direction.is_normalized());
        }
    }

    #[test]
    fn test_column_fills_small_world() {
        let mut volume = Volume::new(&VolumeConfig::new([16, 16, 16], [16, 16, 16])).expect("volume");
        populate(&mut volume, SceneKind::Column);
        assert!(volume.grid().occupied() > 0);
    }

    #[test]
    fn test_rain_stays_in_world() {
        let volume = Volume::new(&VolumeConfig::new([32, 16, 32], [16, 16, 16])).expect("volume");
        for frame in 0..50 {
            for stroke in rain_strokes(&volume, frame) {
                assert!(volume.grid().contains(stroke.position), "frame {frame}: {:?}", stroke.position);
            }
        }
    }
}
