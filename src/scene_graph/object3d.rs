use glam::{Mat4, Vec3};

use crate::geometry::{Shape, ShapeKind};
use crate::scene_graph::material::Material;
use crate::scene_graph::mesh_library::{MeshId, MeshLibrary};
use crate::scene_graph::transform::Transform;

#[derive(Debug, Clone, Copy)]
pub struct Visual {
    pub mesh_id: MeshId,
    pub kind: ShapeKind,
    pub material: Material,
}

/// A node of the scene graph. Nodes own their children.
#[derive(Debug, Clone)]
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub visual: Option<Visual>,
    pub children: Vec<Object3D>,
}

impl Object3D {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            visual: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(
        name: impl Into<String>,
        meshes: &mut MeshLibrary,
        shape: Shape,
        material: Material,
    ) -> Self {
        let visual = Visual {
            mesh_id: meshes.get_or_create(shape),
            kind: shape.kind(),
            material,
        };

        Self {
            visual: Some(visual),
            ..Self::group(name)
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform = self.transform.with_rotation(rotation);
        self
    }

    pub fn add(&mut self, child: Object3D) {
        self.children.push(child);
    }

    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.visual.map(|visual| visual.kind)
    }

    pub fn children_of_kind(&self, kind: ShapeKind) -> impl Iterator<Item = &Object3D> {
        self.children
            .iter()
            .filter(move |child| child.shape_kind() == Some(kind))
    }

    pub fn children_of_kind_mut(&mut self, kind: ShapeKind) -> impl Iterator<Item = &mut Object3D> {
        self.children
            .iter_mut()
            .filter(move |child| child.shape_kind() == Some(kind))
    }

    /// Calls `f` for this node and every descendant that carries a visual,
    /// with its world matrix.
    pub fn visit_visuals<F>(&self, parent_world_matrix: Mat4, f: &mut F)
    where
        F: FnMut(&Visual, Mat4),
    {
        let world_matrix = parent_world_matrix * self.transform.local_matrix();

        if let Some(visual) = &self.visual {
            f(visual, world_matrix);
        }

        for child in &self.children {
            child.visit_visuals(world_matrix, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::material;

    #[test]
    fn visits_nested_visuals_with_world_matrices() {
        let mut meshes = MeshLibrary::new();
        let mut root = Object3D::group("root").at(Vec3::new(10.0, 0.0, 0.0));
        let mut inner = Object3D::group("inner").at(Vec3::new(0.0, 1.0, 0.0));
        inner.add(
            Object3D::mesh("leaf", &mut meshes, Shape::cuboid(1.0, 1.0, 1.0), material::LEG)
                .at(Vec3::new(0.0, 0.0, 2.0)),
        );
        root.add(inner);

        let mut origins = Vec::new();
        root.visit_visuals(Mat4::IDENTITY, &mut |_, world| {
            origins.push(world.transform_point3(Vec3::ZERO));
        });

        assert_eq!(origins, vec![Vec3::new(10.0, 1.0, 2.0)]);
    }

    #[test]
    fn filters_children_by_shape() {
        let mut meshes = MeshLibrary::new();
        let mut root = Object3D::group("root");
        root.add(Object3D::mesh(
            "box",
            &mut meshes,
            Shape::cuboid(1.0, 1.0, 1.0),
            material::LEG,
        ));
        root.add(Object3D::mesh(
            "roller",
            &mut meshes,
            Shape::cylinder(0.1, 0.1, 1.0, 8),
            material::ROLLER,
        ));
        root.add(Object3D::group("empty"));

        let names: Vec<_> = root
            .children_of_kind(ShapeKind::Cylinder)
            .map(|child| child.name.as_str())
            .collect();
        assert_eq!(names, vec!["roller"]);
    }
}
