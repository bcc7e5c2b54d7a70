use std::collections::HashMap;

use id_arena::{Arena, Id};

use crate::geometry::{MeshData, Shape, ShapeKey};

pub type MeshId = Id<Mesh>;

pub struct Mesh {
    pub name: String,
    pub shape: Shape,
    pub data: MeshData,
}

/// Generated meshes, shared between every node built with the same shape.
///
/// A library lives as long as the objects built from it; dropping it is the
/// only way meshes are freed.
pub struct MeshLibrary {
    meshes: Arena<Mesh>,
    by_shape: HashMap<ShapeKey, MeshId>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self {
            meshes: Arena::new(),
            by_shape: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, shape: Shape) -> MeshId {
        let key = shape.key();

        if let Some(mesh_id) = self.by_shape.get(&key).copied() {
            return mesh_id;
        }

        let mesh = Mesh {
            name: shape.label(),
            shape,
            data: shape.generate(),
        };
        log::debug!(
            "Generated mesh {} ({} vertices)",
            mesh.name,
            mesh.data.vertices.len()
        );

        let mesh_id = self.meshes.alloc(mesh);
        self.by_shape.insert(key, mesh_id);
        mesh_id
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }
}
