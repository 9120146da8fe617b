//! Deferred event dispatch

use crate::ecs::components::ComponentMask;
use crate::ecs::{Event, System, World};

/// Flushes the world's event queue once per frame.
///
/// The queue is drained before dispatch, so events pushed from inside a
/// callback wait for the next frame's flush. Events whose target was
/// destroyed in the meantime are dropped silently.
#[derive(Debug, Default)]
pub struct EventSystem;

impl System for EventSystem {
    fn component_mask(&self) -> ComponentMask {
        ComponentMask::empty()
    }

    fn update(&mut self, world: &mut World, _delta_time: f32) {
        let events = world.take_pending_events();
        for event in events {
            match event {
                Event::Collision(collision) => {
                    // The callback gets the whole world, so clone the
                    // binding out of the entity before invoking it
                    let Ok(entity) = world.entity(collision.entity) else {
                        continue;
                    };
                    if let Some(callback) = entity.events.on_collision.clone() {
                        callback(world, &collision);
                    }
                }
            }
        }
    }
}
