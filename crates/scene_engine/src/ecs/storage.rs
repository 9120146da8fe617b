//! Parallel-array component storage with slot reuse
//!
//! Every component kind lives in its own `Vec`, indexed by entity slot.
//! Deleting an entity resets its components and parks the index on a
//! free list; the next creation pops the free list before growing the
//! arrays and bumps the slot's generation, so long-running worlds do
//! not leak slots and stale handles fail their check.

use crate::ecs::components::{
    CollisionComponent, ComponentMask, MeshComponent, PhysicsComponent, TransformComponent,
};
use crate::ecs::{Entity, EntityFlags, EntityId};

/// Entity records and component data in parallel arrays
#[derive(Debug, Default)]
pub struct EntityStorage {
    entities: Vec<Entity>,
    generations: Vec<u32>,
    transforms: Vec<TransformComponent>,
    physics: Vec<PhysicsComponent>,
    collisions: Vec<CollisionComponent>,
    meshes: Vec<MeshComponent>,
    reusable: Vec<u32>,
}

impl EntityStorage {
    /// Number of live entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len() - self.reusable.len()
    }

    /// Whether no live entities exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots, live or reusable
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of slots currently parked for reuse
    #[must_use]
    pub fn reusable_count(&self) -> usize {
        self.reusable.len()
    }

    /// Grow every array so at least `min_len` slots exist.
    ///
    /// New slots are default-initialized, marked destroyed and parked
    /// on the free list, so bulk scene loads can pre-size the arrays
    /// without exposing phantom live entities.
    pub fn ensure_capacity(&mut self, min_len: usize) {
        while self.entities.len() < min_len {
            #[allow(clippy::cast_possible_truncation)]
            let index = self.entities.len() as u32;
            let mut entity = Entity::default();
            entity.flags.insert(EntityFlags::DESTROYED);
            self.entities.push(entity);
            self.generations.push(0);
            self.transforms.push(TransformComponent::default());
            self.physics.push(PhysicsComponent::default());
            self.collisions.push(CollisionComponent::default());
            self.meshes.push(MeshComponent::default());
            self.reusable.push(index);
        }
    }

    /// Drop every entity and slot, returning the storage to its empty
    /// state
    pub fn clear(&mut self) {
        self.entities.clear();
        self.generations.clear();
        self.transforms.clear();
        self.physics.clear();
        self.collisions.clear();
        self.meshes.clear();
        self.reusable.clear();
    }

    /// Store an entity, reusing a freed slot when one exists, and
    /// return the handle assigned to it
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.flags.insert(EntityFlags::REGISTERED);
        entity.flags.remove(EntityFlags::DESTROYED);

        if let Some(index) = self.reusable.pop() {
            let slot = index as usize;
            // Bumping on reuse (not on free) keeps a deleted slot's
            // generation intact, so a double delete is distinguishable
            // from a reused slot
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            let id = EntityId {
                index,
                generation: self.generations[slot],
            };
            entity.id = id;
            self.entities[slot] = entity;
            self.transforms[slot].set_defaults();
            self.physics[slot].set_defaults();
            self.collisions[slot].set_defaults();
            self.meshes[slot].destroy();
            return id;
        }

        #[allow(clippy::cast_possible_truncation)]
        let index = self.entities.len() as u32;
        let id = EntityId {
            index,
            generation: 0,
        };
        entity.id = id;
        self.entities.push(entity);
        self.generations.push(0);
        self.transforms.push(TransformComponent::default());
        self.physics.push(PhysicsComponent::default());
        self.collisions.push(CollisionComponent::default());
        self.meshes.push(MeshComponent::default());
        id
    }

    /// Mark a slot destroyed: reset its components and park the index
    /// for reuse. The generation only moves when [`Self::insert`] hands
    /// the slot out again.
    ///
    /// The caller is expected to have validated the handle.
    pub fn free(&mut self, index: u32) {
        let slot = index as usize;
        self.entities[slot].flags.insert(EntityFlags::DESTROYED);
        self.entities[slot].render_id = None;
        self.entities[slot].events = Default::default();
        self.transforms[slot].set_defaults();
        self.physics[slot].set_defaults();
        self.collisions[slot].set_defaults();
        self.meshes[slot].destroy();
        self.reusable.push(index);
    }

    /// Whether a handle still refers to the slot's current occupant
    #[must_use]
    pub fn is_current(&self, id: EntityId) -> bool {
        let slot = id.index as usize;
        slot < self.entities.len()
            && self.generations[slot] == id.generation
            && !self.entities[slot].destroyed()
    }

    /// Current generation of a slot
    #[must_use]
    pub fn generation(&self, index: u32) -> u32 {
        self.generations[index as usize]
    }

    /// Entity record at a slot
    #[must_use]
    pub fn entity(&self, index: u32) -> &Entity {
        &self.entities[index as usize]
    }

    /// Mutable entity record at a slot
    pub fn entity_mut(&mut self, index: u32) -> &mut Entity {
        &mut self.entities[index as usize]
    }

    /// Component mask at a slot
    #[must_use]
    pub fn mask(&self, index: u32) -> ComponentMask {
        self.entities[index as usize].mask
    }

    /// Transform component at a slot
    #[must_use]
    pub fn transform(&self, index: u32) -> &TransformComponent {
        &self.transforms[index as usize]
    }

    /// Mutable transform component at a slot
    pub fn transform_mut(&mut self, index: u32) -> &mut TransformComponent {
        &mut self.transforms[index as usize]
    }

    /// Physics component at a slot
    #[must_use]
    pub fn physics(&self, index: u32) -> &PhysicsComponent {
        &self.physics[index as usize]
    }

    /// Mutable physics component at a slot
    pub fn physics_mut(&mut self, index: u32) -> &mut PhysicsComponent {
        &mut self.physics[index as usize]
    }

    /// Collision component at a slot
    #[must_use]
    pub fn collision(&self, index: u32) -> &CollisionComponent {
        &self.collisions[index as usize]
    }

    /// Mutable collision component at a slot
    pub fn collision_mut(&mut self, index: u32) -> &mut CollisionComponent {
        &mut self.collisions[index as usize]
    }

    /// Mesh component at a slot
    #[must_use]
    pub fn mesh(&self, index: u32) -> &MeshComponent {
        &self.meshes[index as usize]
    }

    /// Mutable mesh component at a slot
    pub fn mesh_mut(&mut self, index: u32) -> &mut MeshComponent {
        &mut self.meshes[index as usize]
    }

    /// Iterate the handles of all live entities, in slot order
    #[allow(clippy::cast_possible_truncation)]
    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (entity, _))| !entity.destroyed())
            .map(|(index, (_, generation))| EntityId {
                index: index as u32,
                generation: *generation,
            })
    }
}
