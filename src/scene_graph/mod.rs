pub mod environment;
pub mod material;
pub mod mesh_library;
pub mod object3d;
pub mod scene;
pub mod transform;
