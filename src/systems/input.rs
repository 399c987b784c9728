//! Input snapshot processing.
//!
//! - [`emit_jump_commands`] turns a jump press into one [`JumpCommand`] per
//!   controlled actor at the start of the frame
//! - [`clear_input_edges`] drops press/release edges once the frame is done

use bevy_ecs::prelude::*;

use crate::components::motion::MotionTuning;
use crate::events::input::JumpCommand;
use crate::resources::input::InputState;

pub fn emit_jump_commands(
    input: Res<InputState>,
    actors: Query<Entity, With<MotionTuning>>,
    mut writer: MessageWriter<JumpCommand>,
) {
    if !input.jump.just_pressed {
        return;
    }
    for actor in actors.iter() {
        writer.write(JumpCommand { actor });
    }
}

pub fn clear_input_edges(mut input: ResMut<InputState>) {
    input.clear_edges();
}

/// Advance the [`JumpCommand`] queue. Runs at the end of every fixed tick, so
/// a command survives render frames that run no fixed tick.
pub fn update_jump_commands(mut msgs: ResMut<Messages<JumpCommand>>) {
    msgs.update();
}
