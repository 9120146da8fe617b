//! The world: entity directory, systems pipeline, broad-phase index
//! and deferred event queue

use crate::ecs::components::{
    CollisionComponent, ComponentMask, MeshComponent, PhysicsComponent, TransformComponent,
};
use crate::ecs::systems::{CollisionSystem, EventSystem, PhysicsSystem};
use crate::ecs::{Entity, EntityFlags, EntityId, EntityStorage, Event, System};
use crate::error::EcsError;
use crate::render::{NullRenderer, RenderBackend};
use crate::spatial::CompactBvh;

/// Owner of all simulation state.
///
/// Entity creation is immediate but initialization is deferred: a
/// created entity only becomes visible to systems (and the rendering
/// backend) after the next [`World::post_frame`]. Deletion is
/// immediate; handles held across a deletion fail their generation
/// check from then on.
pub struct World {
    storage: EntityStorage,
    systems: Vec<Box<dyn System>>,
    collision_bvh: CompactBvh,
    added_entities: Vec<EntityId>,
    pending_events: Vec<Event>,
    renderer: Box<dyn RenderBackend>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Box::new(NullRenderer::default()))
    }
}

impl World {
    /// Create an empty world driving the given rendering backend
    #[must_use]
    pub fn new(renderer: Box<dyn RenderBackend>) -> Self {
        Self {
            storage: EntityStorage::default(),
            systems: Vec::new(),
            collision_bvh: CompactBvh::default(),
            added_entities: Vec::new(),
            pending_events: Vec::new(),
            renderer,
        }
    }

    /// Install the standard systems pipeline: physics integration,
    /// collision resolution, then deferred event dispatch
    pub fn initialize(&mut self) {
        self.add_system(Box::new(PhysicsSystem::default()));
        self.add_system(Box::new(CollisionSystem::default()));
        self.add_system(Box::new(EventSystem::default()));
        log::info!("world initialized with {} systems", self.systems.len());
    }

    /// Install a system at the end of the pipeline
    pub fn add_system(&mut self, mut system: Box<dyn System>) {
        system.initialize();
        self.systems.push(system);
    }

    /// Create an entity; matching systems are notified immediately, but
    /// the entity only joins the simulation on the next
    /// [`Self::post_frame`]
    pub fn create(&mut self, entity: Entity) -> EntityId {
        let id = self.storage.insert(entity);
        self.added_entities.push(id);
        log::debug!("created entity '{}' as {id:?}", self.storage.entity(id.index).name);

        let mask = self.storage.entity(id.index).mask;
        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            if mask.contains(system.component_mask()) {
                system.register_entity(id);
            }
        }
        systems.extend(self.systems.drain(..));
        self.systems = systems;
        id
    }

    /// Delete an entity: unregister it from the rendering backend,
    /// reset its components and park its slot for reuse.
    ///
    /// A rejected delete is logged and leaves all state untouched.
    ///
    /// # Errors
    /// [`EcsError::StaleEntity`] for handles whose slot was reused,
    /// [`EcsError::AlreadyDestroyed`] for a second delete of the same
    /// handle, [`EcsError::NotInitialized`] for entities still awaiting
    /// their deferred initialization.
    pub fn delete(&mut self, id: EntityId) -> Result<(), EcsError> {
        if let Err(err) = self.validate(id) {
            log::error!("delete ignored: {err}");
            return Err(err);
        }
        if !self
            .storage
            .entity(id.index)
            .flags
            .contains(EntityFlags::INITIALIZED)
        {
            log::error!("delete ignored: entity {id:?} is not initialized");
            return Err(EcsError::NotInitialized(id));
        }
        if let Some(render_id) = self.storage.entity(id.index).render_id {
            self.renderer.unregister_entity(render_id);
        }
        log::debug!("deleting entity '{}' {id:?}", self.storage.entity(id.index).name);
        self.storage.free(id.index);
        Ok(())
    }

    /// Remove every entity, pending event and broad-phase node,
    /// unregistering all backend-registered entities first
    pub fn clear(&mut self) {
        for id in self.storage.live_ids().collect::<Vec<_>>() {
            if let Some(render_id) = self.storage.entity(id.index).render_id {
                self.renderer.unregister_entity(render_id);
            }
        }
        self.storage.clear();
        self.added_entities.clear();
        self.pending_events.clear();
        self.collision_bvh = CompactBvh::default();
        log::info!("world cleared");
    }

    /// Whether a handle still refers to a live entity
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.storage.is_current(id)
    }

    /// Current handle of the entity occupying a slot, if it is live
    #[must_use]
    pub fn id_at(&self, index: u32) -> Option<EntityId> {
        if (index as usize) < self.storage.slot_count()
            && !self.storage.entity(index).destroyed()
        {
            Some(EntityId {
                index,
                generation: self.storage.generation(index),
            })
        } else {
            None
        }
    }

    /// Number of live entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the world holds no live entities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Read access to the raw storage
    #[must_use]
    pub const fn storage(&self) -> &EntityStorage {
        &self.storage
    }

    /// Handles of all initialized, updatable entities whose mask
    /// contains `mask`, in slot order
    #[must_use]
    pub fn query_by_mask(&self, mask: ComponentMask) -> Vec<EntityId> {
        self.storage
            .live_ids()
            .filter(|id| {
                let entity = self.storage.entity(id.index);
                entity.mask.contains(mask)
                    && entity
                        .flags
                        .contains(EntityFlags::INITIALIZED | EntityFlags::CAN_UPDATE)
            })
            .collect()
    }

    /// Finish deferred initialization of entities created since the
    /// last call, in creation order: register renderables with the
    /// backend and mark the entities initialized
    pub fn post_frame(&mut self) {
        let added = std::mem::take(&mut self.added_entities);
        for id in added {
            if !self.storage.is_current(id) {
                // Deleted before it ever initialized
                continue;
            }
            let mask = self.storage.entity(id.index).mask;
            if mask.contains(ComponentMask::TRANSFORM | ComponentMask::MESH) {
                let render_id = self
                    .renderer
                    .register_entity(self.storage.transform(id.index), self.storage.mesh(id.index));
                let entity = self.storage.entity_mut(id.index);
                entity.render_id = Some(render_id);
                entity.flags.insert(EntityFlags::REGISTERED_BACKEND);
            }
            self.storage
                .entity_mut(id.index)
                .flags
                .insert(EntityFlags::INITIALIZED);
        }
    }

    /// Run one frame: every installed system in order, then push the
    /// resulting transforms to the rendering backend
    pub fn update(&mut self, delta_time: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            system.update(self, delta_time);
        }
        systems.extend(self.systems.drain(..));
        self.systems = systems;

        self.sync_render_transforms();
    }

    /// Rebuild the broad-phase hierarchy from the current bounds of all
    /// initialized collidable entities
    pub fn update_collision_bvh(&mut self) {
        let required = ComponentMask::TRANSFORM | ComponentMask::COLLISION;
        let mut items = Vec::new();
        for id in self.storage.live_ids() {
            let entity = self.storage.entity(id.index);
            // Entities awaiting deferred initialization are not part of
            // the simulation yet
            if !entity.mask.contains(required)
                || !entity.flags.contains(EntityFlags::INITIALIZED)
            {
                continue;
            }
            match self
                .storage
                .collision(id.index)
                .encapsulating_aabb(self.storage.transform(id.index))
            {
                Ok(bounds) => items.push((id.index, bounds)),
                Err(err) => {
                    log::warn!("excluding '{}' from broad phase: {err}", entity.name);
                }
            }
        }
        self.collision_bvh = CompactBvh::build(&items);
    }

    /// The broad-phase hierarchy as of the last
    /// [`Self::update_collision_bvh`]
    #[must_use]
    pub const fn collision_bvh(&self) -> &CompactBvh {
        &self.collision_bvh
    }

    /// Queue an event for the next event-system flush
    pub fn push_event(&mut self, event: Event) {
        self.pending_events.push(event);
    }

    /// Drain the queued events; events pushed after this call wait for
    /// the next drain
    #[must_use]
    pub fn take_pending_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending_events)
    }

    /// Entity record behind a handle
    ///
    /// # Errors
    /// [`EcsError::StaleEntity`] or [`EcsError::AlreadyDestroyed`] for
    /// handles that no longer refer to a live entity.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, EcsError> {
        self.validate(id)?;
        Ok(self.storage.entity(id.index))
    }

    /// Mutable entity record behind a handle
    ///
    /// # Errors
    /// Same conditions as [`Self::entity`].
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EcsError> {
        self.validate(id)?;
        Ok(self.storage.entity_mut(id.index))
    }

    /// Transform component of an entity
    ///
    /// # Errors
    /// Handle errors as in [`Self::entity`];
    /// [`EcsError::MissingComponent`] if the entity carries no
    /// transform.
    pub fn transform(&self, id: EntityId) -> Result<&TransformComponent, EcsError> {
        self.check_access(id, ComponentMask::TRANSFORM)?;
        Ok(self.storage.transform(id.index))
    }

    /// Mutable transform component of an entity
    ///
    /// # Errors
    /// Same conditions as [`Self::transform`].
    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut TransformComponent, EcsError> {
        self.check_access(id, ComponentMask::TRANSFORM)?;
        Ok(self.storage.transform_mut(id.index))
    }

    /// Physics component of an entity
    ///
    /// # Errors
    /// Handle errors as in [`Self::entity`];
    /// [`EcsError::MissingComponent`] if the entity carries no physics.
    pub fn physics(&self, id: EntityId) -> Result<&PhysicsComponent, EcsError> {
        self.check_access(id, ComponentMask::PHYSICS)?;
        Ok(self.storage.physics(id.index))
    }

    /// Mutable physics component of an entity
    ///
    /// # Errors
    /// Same conditions as [`Self::physics`].
    pub fn physics_mut(&mut self, id: EntityId) -> Result<&mut PhysicsComponent, EcsError> {
        self.check_access(id, ComponentMask::PHYSICS)?;
        Ok(self.storage.physics_mut(id.index))
    }

    /// Collision component of an entity
    ///
    /// # Errors
    /// Handle errors as in [`Self::entity`];
    /// [`EcsError::MissingComponent`] if the entity carries no
    /// collision shape.
    pub fn collision(&self, id: EntityId) -> Result<&CollisionComponent, EcsError> {
        self.check_access(id, ComponentMask::COLLISION)?;
        Ok(self.storage.collision(id.index))
    }

    /// Mutable collision component of an entity
    ///
    /// # Errors
    /// Same conditions as [`Self::collision`].
    pub fn collision_mut(&mut self, id: EntityId) -> Result<&mut CollisionComponent, EcsError> {
        self.check_access(id, ComponentMask::COLLISION)?;
        Ok(self.storage.collision_mut(id.index))
    }

    /// Mesh component of an entity
    ///
    /// # Errors
    /// Handle errors as in [`Self::entity`];
    /// [`EcsError::MissingComponent`] if the entity carries no mesh.
    pub fn mesh(&self, id: EntityId) -> Result<&MeshComponent, EcsError> {
        self.check_access(id, ComponentMask::MESH)?;
        Ok(self.storage.mesh(id.index))
    }

    /// Mutable mesh component of an entity
    ///
    /// # Errors
    /// Same conditions as [`Self::mesh`].
    pub fn mesh_mut(&mut self, id: EntityId) -> Result<&mut MeshComponent, EcsError> {
        self.check_access(id, ComponentMask::MESH)?;
        Ok(self.storage.mesh_mut(id.index))
    }

    fn sync_render_transforms(&mut self) {
        for id in self.storage.live_ids() {
            if let Some(render_id) = self.storage.entity(id.index).render_id {
                self.renderer
                    .update_transform(render_id, self.storage.transform(id.index));
            }
        }
    }

    fn validate(&self, id: EntityId) -> Result<(), EcsError> {
        if (id.index as usize) >= self.storage.slot_count()
            || self.storage.generation(id.index) != id.generation
        {
            return Err(EcsError::StaleEntity(id));
        }
        if self.storage.entity(id.index).destroyed() {
            return Err(EcsError::AlreadyDestroyed(id));
        }
        Ok(())
    }

    fn check_access(&self, id: EntityId, required: ComponentMask) -> Result<(), EcsError> {
        self.validate(id)?;
        let mask = self.storage.entity(id.index).mask;
        if mask.contains(required) {
            Ok(())
        } else {
            Err(EcsError::MissingComponent {
                id,
                missing: required.difference(mask),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::ObjectType;
    use crate::foundation::math::Vec3;
    use crate::render::RenderId;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct RecorderState {
        registered: Vec<RenderId>,
        unregistered: Vec<RenderId>,
        transform_updates: Vec<(RenderId, Vec3)>,
    }

    /// Render backend fake that records every call
    #[derive(Debug, Default)]
    struct RecordingRenderer {
        state: Rc<RefCell<RecorderState>>,
        next_id: u32,
    }

    impl RecordingRenderer {
        fn new() -> (Self, Rc<RefCell<RecorderState>>) {
            let state = Rc::new(RefCell::new(RecorderState::default()));
            (
                Self {
                    state: Rc::clone(&state),
                    next_id: 0,
                },
                state,
            )
        }
    }

    impl RenderBackend for RecordingRenderer {
        fn register_entity(
            &mut self,
            _transform: &TransformComponent,
            _mesh: &MeshComponent,
        ) -> RenderId {
            let id = RenderId(self.next_id);
            self.next_id += 1;
            self.state.borrow_mut().registered.push(id);
            id
        }

        fn unregister_entity(&mut self, id: RenderId) {
            self.state.borrow_mut().unregistered.push(id);
        }

        fn update_transform(&mut self, id: RenderId, transform: &TransformComponent) {
            self.state
                .borrow_mut()
                .transform_updates
                .push((id, transform.position));
        }
    }

    fn physics_entity(name: &str) -> Entity {
        Entity::new(name, ComponentMask::TRANSFORM | ComponentMask::PHYSICS)
    }

    #[test]
    fn created_entity_initializes_on_post_frame() {
        let mut world = World::default();
        let id = world.create(physics_entity("a"));
        assert!(world.is_alive(id));
        assert!(world
            .query_by_mask(ComponentMask::TRANSFORM)
            .is_empty());

        world.post_frame();
        assert_eq!(world.query_by_mask(ComponentMask::TRANSFORM), vec![id]);
    }

    #[test]
    fn delete_invalidates_the_handle() {
        let mut world = World::default();
        let id = world.create(physics_entity("a"));
        world.post_frame();

        world.delete(id).unwrap();
        assert!(!world.is_alive(id));
        assert_eq!(world.transform(id), Err(EcsError::AlreadyDestroyed(id)));
        assert_eq!(world.delete(id), Err(EcsError::AlreadyDestroyed(id)));
    }

    #[test]
    fn reused_slot_rejects_the_old_handle() {
        let mut world = World::default();
        let old = world.create(physics_entity("a"));
        world.post_frame();
        world.delete(old).unwrap();

        let new = world.create(physics_entity("b"));
        assert_eq!(new.index, old.index);
        assert!(world.is_alive(new));
        assert!(!world.is_alive(old));
        assert_eq!(world.transform(old), Err(EcsError::StaleEntity(old)));
        assert_eq!(world.delete(old), Err(EcsError::StaleEntity(old)));
    }

    #[test]
    fn delete_before_initialization_is_rejected() {
        let mut world = World::default();
        let id = world.create(physics_entity("a"));
        assert_eq!(world.delete(id), Err(EcsError::NotInitialized(id)));
        assert!(world.is_alive(id));

        world.post_frame();
        assert!(world.delete(id).is_ok());
    }

    #[test]
    fn clear_empties_the_world_and_the_backend() {
        let (renderer, state) = RecordingRenderer::new();
        let mut world = World::new(Box::new(renderer));
        world.create(Entity::new(
            "crate",
            ComponentMask::TRANSFORM | ComponentMask::MESH,
        ));
        world.create(physics_entity("loose"));
        world.post_frame();
        assert_eq!(state.borrow().registered.len(), 1);

        world.clear();
        assert!(world.is_empty());
        assert_eq!(world.storage().slot_count(), 0);
        assert_eq!(state.borrow().unregistered.len(), 1);
        assert!(world.take_pending_events().is_empty());
    }

    #[test]
    fn churn_does_not_grow_the_arrays() {
        let mut world = World::default();
        for i in 0..100 {
            let id = world.create(physics_entity(&format!("e{i}")));
            world.post_frame();
            world.delete(id).unwrap();
        }
        assert_eq!(world.storage().slot_count(), 1);
        assert!(world.is_empty());
    }

    #[test]
    fn component_access_respects_the_mask() {
        let mut world = World::default();
        let id = world.create(Entity::new("t", ComponentMask::TRANSFORM));
        world.post_frame();

        assert!(world.transform(id).is_ok());
        assert_eq!(
            world.physics(id),
            Err(EcsError::MissingComponent {
                id,
                missing: ComponentMask::PHYSICS,
            })
        );
    }

    #[test]
    fn query_by_mask_requires_every_bit() {
        let mut world = World::default();
        let both = world.create(physics_entity("both"));
        let transform_only = world.create(Entity::new("t", ComponentMask::TRANSFORM));
        world.post_frame();

        let physical = world.query_by_mask(ComponentMask::TRANSFORM | ComponentMask::PHYSICS);
        assert_eq!(physical, vec![both]);
        let spatial = world.query_by_mask(ComponentMask::TRANSFORM);
        assert_eq!(spatial, vec![both, transform_only]);
    }

    #[test]
    fn renderable_entities_register_with_the_backend() {
        let (renderer, state) = RecordingRenderer::new();
        let mut world = World::new(Box::new(renderer));

        let id = world.create(Entity::new(
            "crate",
            ComponentMask::TRANSFORM | ComponentMask::MESH,
        ));
        world
            .mesh_mut(id)
            .unwrap()
            .set_mesh_data("models/crate.obj", ObjectType::StaticMesh);
        assert!(state.borrow().registered.is_empty());

        world.post_frame();
        assert_eq!(state.borrow().registered.len(), 1);
        let render_id = world.entity(id).unwrap().render_id.unwrap();

        world.transform_mut(id).unwrap().position = Vec3::new(1.0, 2.0, 3.0);
        world.update(1.0 / 60.0);
        assert_eq!(
            state.borrow().transform_updates.last(),
            Some(&(render_id, Vec3::new(1.0, 2.0, 3.0)))
        );

        world.delete(id).unwrap();
        assert_eq!(state.borrow().unregistered, vec![render_id]);
    }

    #[test]
    fn non_renderable_entities_skip_the_backend() {
        let (renderer, state) = RecordingRenderer::new();
        let mut world = World::new(Box::new(renderer));
        world.create(physics_entity("a"));
        world.post_frame();
        assert!(state.borrow().registered.is_empty());
    }

    #[test]
    fn broad_phase_skips_uninitialized_entities() {
        use crate::scene::Aabb;

        let mut world = World::default();
        let mask = ComponentMask::TRANSFORM | ComponentMask::COLLISION;
        let seen = world.create(Entity::new("seen", mask));
        world
            .collision_mut(seen)
            .unwrap()
            .set_aabb(&Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0)));
        world.post_frame();

        // Created after post_frame, so still awaiting initialization
        let ghost = world.create(Entity::new("ghost", mask));
        world
            .collision_mut(ghost)
            .unwrap()
            .set_aabb(&Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0)));

        world.update_collision_bvh();
        let hits = world
            .collision_bvh()
            .query(&Aabb::new(Vec3::repeat(-2.0), Vec3::repeat(2.0)));
        assert_eq!(hits, vec![seen.index]);
    }

    #[test]
    fn standard_pipeline_dispatches_collisions_the_same_frame() {
        use crate::scene::Aabb;
        use approx::assert_relative_eq;

        let mut world = World::default();
        world.initialize();

        let mask = ComponentMask::TRANSFORM | ComponentMask::COLLISION;
        let floor = world.create(Entity::new("floor", mask));
        let floor_collision = world.collision_mut(floor).unwrap();
        floor_collision.set_aabb(&Aabb::new(Vec3::repeat(-5.0), Vec3::repeat(5.0)));
        floor_collision.static_body = true;

        let body = world.create(Entity::new("body", mask | ComponentMask::PHYSICS));
        world
            .transform_mut(body)
            .unwrap()
            .set_location(Vec3::new(0.0, 0.0, 9.0));
        world
            .collision_mut(body)
            .unwrap()
            .set_aabb(&Aabb::new(Vec3::repeat(-5.0), Vec3::repeat(5.0)));

        let contacts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&contacts);
        world.entity_mut(body).unwrap().events.on_collision =
            Some(Rc::new(move |world, event| {
                // Resolution already ran when the callback fires
                let z = world.transform(event.entity).unwrap().position.z;
                sink.borrow_mut().push((event.other, z));
            }));
        world.post_frame();

        // One frame: physics drops the body into the floor, collision
        // pushes it back out and queues the event, the event flush
        // dispatches it before the frame ends
        world.update(1.0 / 60.0);
        assert_eq!(contacts.borrow().len(), 1);
        let (other, z) = contacts.borrow()[0];
        assert_eq!(other, floor);
        assert_relative_eq!(z, 10.0);
        assert!(world.take_pending_events().is_empty());
        assert!(world.physics(body).unwrap().on_surface);
    }

    #[test]
    fn pending_events_drain_once() {
        use crate::ecs::{CollisionEvent, Event};
        use crate::physics::CollisionData;

        let mut world = World::default();
        let a = world.create(physics_entity("a"));
        let b = world.create(physics_entity("b"));
        world.push_event(Event::Collision(CollisionEvent {
            entity: a,
            other: b,
            data: CollisionData::default(),
        }));

        assert_eq!(world.take_pending_events().len(), 1);
        assert!(world.take_pending_events().is_empty());
    }
}
