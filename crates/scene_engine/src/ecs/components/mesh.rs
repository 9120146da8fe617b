//! Mesh component

use crate::foundation::math::Vec3;
use crate::render::{GeometryIndex, ResourceLoader};
use serde::{Deserialize, Serialize};

/// What kind of geometry the mesh references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectType {
    /// No geometry assigned
    #[default]
    None,
    /// Static triangle mesh loaded from a file
    StaticMesh,
}

/// Per-instance material override, exposed as plain data for the
/// serialization collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Base color
    pub albedo: Vec3,
    /// Metalness factor
    pub metallic: f32,
    /// Surface roughness
    pub roughness: f32,
    /// Emissive color
    pub emissive: Vec3,
}

bitflags::bitflags! {
    /// Mesh state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MeshFlags: u32 {
        /// Geometry finished loading in the resource collaborator
        const LOADED = 1 << 0;
    }
}

/// Reference to backend geometry plus per-instance material overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshComponent {
    /// Kind of geometry referenced
    pub object_type: ObjectType,
    /// Source filename handed to the resource loader
    pub filename: String,
    /// Geometry handle in the rendering backend, set once loaded
    #[serde(skip)]
    pub geometry_index: Option<GeometryIndex>,
    /// Mesh state flags
    #[serde(skip)]
    flags: MeshFlags,
    /// Per-instance material overrides
    pub custom_materials: Vec<Material>,
}

impl MeshComponent {
    /// Point the component at a geometry source; loading is deferred
    /// until [`Self::load`]
    pub fn set_mesh_data(&mut self, filename: impl Into<String>, object_type: ObjectType) {
        self.filename = filename.into();
        self.object_type = object_type;
        self.geometry_index = None;
        self.flags.remove(MeshFlags::LOADED);
    }

    /// Whether geometry data has been assigned at all
    #[must_use]
    pub fn mesh_data_set(&self) -> bool {
        self.object_type != ObjectType::None && !self.filename.is_empty()
    }

    /// Whether the referenced geometry finished loading
    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.flags.contains(MeshFlags::LOADED)
    }

    /// Load the referenced geometry through the resource collaborator.
    ///
    /// Failures are logged and leave the component unloaded; loading is
    /// never fatal.
    pub fn load(&mut self, loader: &mut dyn ResourceLoader) {
        if !self.mesh_data_set() {
            log::error!("MeshComponent::load without mesh data set");
            return;
        }

        match loader.load(&self.filename, self.object_type) {
            Ok(index) => {
                self.geometry_index = Some(index);
                self.flags.insert(MeshFlags::LOADED);
            }
            Err(err) => {
                log::error!("failed to load mesh '{}': {err}", self.filename);
            }
        }
    }

    /// Reset the component to its unloaded default state
    pub fn destroy(&mut self) {
        *self = Self::default();
    }
}
