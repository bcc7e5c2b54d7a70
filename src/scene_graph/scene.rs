use glam::Mat4;

use crate::config::{self, ConfigError, PlacementKind, PlacementRecord};
use crate::equipment::{build_conveyor, build_rotary_table, Composite};
use crate::scene_graph::environment::Environment;
use crate::scene_graph::mesh_library::{Mesh, MeshId, MeshLibrary};
use crate::scene_graph::object3d::Visual;

pub struct Scene {
    pub environment: Environment,
    environment_meshes: MeshLibrary,
    /// Meshes of the loaded composites, replaced together with them.
    meshes: MeshLibrary,
    composites: Vec<Composite>,
}

impl Scene {
    pub fn new() -> Self {
        let mut environment_meshes = MeshLibrary::new();
        let environment = Environment::new(&mut environment_meshes);

        Self {
            environment,
            environment_meshes,
            meshes: MeshLibrary::new(),
            composites: Vec::new(),
        }
    }

    /// Every mesh currently referenced by the scene.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.environment_meshes.iter().chain(self.meshes.iter())
    }

    pub fn composites(&self) -> &[Composite] {
        &self.composites
    }

    /// Replaces every loaded composite with the ones described by `records`.
    pub fn load(&mut self, records: &[PlacementRecord]) {
        self.composites.clear();
        self.meshes = MeshLibrary::new();

        for record in records {
            let composite = self.instantiate(record);
            self.composites.push(composite);
        }

        log::info!(
            "Loaded {} composites ({} distinct meshes)",
            self.composites.len(),
            self.meshes.len()
        );
    }

    /// Parses `text` and loads it. On a parse error the current composites
    /// are kept as they are.
    pub fn reload(&mut self, text: &str) -> Result<usize, ConfigError> {
        let records = config::parse_layout(text)?;
        self.load(&records);
        Ok(self.composites.len())
    }

    fn instantiate(&mut self, record: &PlacementRecord) -> Composite {
        let mut composite = match record.kind {
            // The width doubles as the table diameter.
            PlacementKind::Rotary => build_rotary_table(&mut self.meshes, record.width as f32),
            _ => build_conveyor(&mut self.meshes, record.length, record.width),
        };

        let transform = &mut composite.root.transform;
        transform.translation = record.position();
        transform.rotation.y = record.yaw_radians();
        composite.kind = record.kind.clone();

        log::debug!(
            "Placed {} ({:?}) at {}",
            composite.root.name,
            composite.kind,
            transform.translation
        );

        composite
    }

    /// Animates every composite once, in load order.
    pub fn update(&mut self, delta_time: f32) {
        for composite in &mut self.composites {
            composite.animate(delta_time);
        }
    }

    pub fn visit_visuals<F>(&self, mut f: F)
    where
        F: FnMut(&Visual, Mat4),
    {
        self.environment.ground.visit_visuals(Mat4::IDENTITY, &mut f);

        for composite in &self.composites {
            composite.visit_visuals(&mut f);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec3;

    use super::*;
    use crate::equipment::Motion;

    const SINGLE_CONVEYOR: &str =
        r#"[{"x": 0, "y": 0, "z": 0, "length": 10, "width": 2, "r": 0, "type": "Rouleau"}]"#;

    fn kinds(scene: &Scene) -> Vec<PlacementKind> {
        scene
            .composites()
            .iter()
            .map(|composite| composite.kind.clone())
            .collect()
    }

    #[test]
    fn loads_records_in_order_with_their_tags() {
        let mut scene = Scene::new();
        scene.load(&config::default_layout());

        assert_eq!(
            kinds(&scene),
            vec![
                PlacementKind::Roller,
                PlacementKind::Roller,
                PlacementKind::Rotary
            ]
        );

        let second = &scene.composites()[1].root.transform;
        assert_eq!(second.translation, Vec3::new(10.0, 0.0, 0.0));
        assert!((second.rotation.y - FRAC_PI_2).abs() < 1e-6);

        let table = &scene.composites()[2];
        assert_eq!(table.motion, Motion::RotaryTable { rotation_angle: 0.0 });
        assert_eq!(table.root.transform.translation, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn placement_overrides_the_conveyor_offset() {
        let mut scene = Scene::new();
        scene.reload(SINGLE_CONVEYOR).unwrap();

        let conveyor = &scene.composites()[0];
        assert_eq!(conveyor.root.transform.translation, Vec3::ZERO);
        assert_eq!(conveyor.motion, Motion::Conveyor { length: 10.0 });
    }

    #[test]
    fn untyped_records_become_still_conveyors() {
        let mut scene = Scene::new();
        scene
            .reload(r#"[{"x": 1, "y": 0, "z": 0, "length": 4, "width": 1}]"#)
            .unwrap();

        let composite = &scene.composites()[0];
        assert_eq!(composite.kind, PlacementKind::Other(None));
        assert_eq!(composite.motion, Motion::Conveyor { length: 4.0 });
        assert_eq!(composite.root.transform.rotation.y, 0.0);

        scene.update(1.0);
        assert_eq!(scene.composites()[0].pallet.transform.translation.x, -2.0);
    }

    #[test]
    fn malformed_reload_keeps_the_previous_layout() {
        let mut scene = Scene::new();
        scene.load(&config::default_layout());
        let before = kinds(&scene);

        assert!(scene.reload("[{\"x\": 0,").is_err());
        assert!(scene.reload("not json").is_err());

        assert_eq!(kinds(&scene), before);
    }

    #[test]
    fn empty_layout_clears_composites_but_keeps_the_ground() {
        let mut scene = Scene::new();
        scene.load(&config::default_layout());

        assert_eq!(scene.reload("[]").unwrap(), 0);
        assert!(scene.composites().is_empty());

        let mut visuals = 0;
        scene.visit_visuals(|_, _| visuals += 1);
        assert_eq!(visuals, 1);
        assert_eq!(scene.environment.grid.lines().len(), 102);
    }

    #[test]
    fn reload_replaces_rather_than_appends() {
        let mut scene = Scene::new();
        scene.load(&config::default_layout());
        scene.load(&config::default_layout());
        assert_eq!(scene.composites().len(), 3);
    }

    #[test]
    fn single_conveyor_scenario() {
        let mut scene = Scene::new();
        scene.reload(SINGLE_CONVEYOR).unwrap();

        scene.update(5.0);
        assert_eq!(scene.composites()[0].pallet.transform.translation.x, 0.0);

        scene.update(6.0);
        assert_eq!(scene.composites()[0].pallet.transform.translation.x, -5.0);
    }

    #[test]
    fn pallet_is_drawn_relative_to_its_conveyor() {
        let mut scene = Scene::new();
        scene
            .reload(r#"[{"x": 3, "y": 0, "z": 7, "length": 10, "width": 2, "r": 0, "type": "Rouleau"}]"#)
            .unwrap();

        let mut origins = Vec::new();
        scene.composites()[0].visit_visuals(&mut |visual, world| {
            if visual.material == crate::scene_graph::material::PALLET_DECK {
                origins.push(world.transform_point3(Vec3::ZERO));
            }
        });

        assert_eq!(origins.len(), 1);
        let expected = Vec3::new(3.0 - 5.0, 0.4 + 0.072, 7.0);
        assert!(origins[0].abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn reloading_the_same_layout_yields_the_same_meshes() {
        let mut scene = Scene::new();
        scene.load(&config::default_layout());
        let meshes = scene.meshes().count();

        scene.load(&config::default_layout());
        assert_eq!(scene.meshes().count(), meshes);
    }

    #[test]
    fn meshes_of_discarded_composites_are_freed() {
        let mut scene = Scene::new();
        let baseline = scene.meshes().count();
        assert_eq!(baseline, 1);

        for i in 0..200 {
            let length = 5.0 + i as f64 / 100.0;
            let record = PlacementRecord::new(0.0, 0.0, 0.0, length, 2.0, 0.0, PlacementKind::Roller);
            scene.load(&[record]);
        }
        let single_conveyor = scene.meshes().count();
        assert!(single_conveyor < 20);

        scene.reload("[]").unwrap();
        assert_eq!(scene.meshes().count(), baseline);

        let mut visuals = Vec::new();
        scene.visit_visuals(|visual, _| visuals.push(visual.mesh_id));
        let live: Vec<_> = scene.meshes().map(|(id, _)| id).collect();
        assert_eq!(visuals, live);
    }
}
