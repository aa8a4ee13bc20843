use super::components::*;
use super::resources::*;
use crate::host::*;
use specs::prelude::*;

/// Steps every live agent toward its target at its own speed and expires
/// idle postures.
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (WriteStorage<'a, AgentBody>, ReadExpect<'a, MapBounds>, Read<'a, SimClock>);

    fn run(&mut self, (mut bodies, bounds, clock): Self::SystemData) {
        let delta = clock.delta_seconds();

        for body in (&mut bodies).join() {
            if !body.is_alive() {
                continue;
            }

            if let Posture::Idle { remaining_seconds } = body.posture {
                let remaining_seconds = remaining_seconds - delta;

                body.posture = if remaining_seconds > 0.0 {
                    Posture::Idle { remaining_seconds }
                } else {
                    Posture::Autonomous
                };
            }

            if let Some(target) = body.target {
                body.position = body.position.step_toward(target, body.speed * delta as f32);
                body.tile = bounds.tile_at(body.position);

                if body.position == target {
                    body.target = None;
                }
            }
        }
    }
}
