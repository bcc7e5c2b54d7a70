use std::time::Instant;

use crate::{ui::PanelActions, viewer::ViewerState};

/// Measures the time between redraws.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Seconds since the previous tick; zero on the first one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta_time = self
            .last
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        delta_time
    }
}

/// One simulation step: editor actions, file changes, camera, then animation.
pub fn update(state: &mut ViewerState, delta_time: f32, actions: PanelActions) {
    if actions.reset {
        state.reset_editor_to_default();
    } else if actions.apply {
        state.apply_editor_text();
    }

    state.poll_config_file();
    state.camera.update();
    state.scene.update(delta_time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::ViewerOptions;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.tick() >= 0.0);
    }

    #[test]
    fn update_applies_before_animating() {
        let mut state = ViewerState::new(&ViewerOptions::default()).unwrap();
        state.editor.text =
            r#"[{"x": 0, "y": 0, "z": 0, "length": 10, "width": 2, "r": 0, "type": "Rouleau"}]"#
                .to_string();

        update(
            &mut state,
            2.0,
            PanelActions {
                apply: true,
                reset: false,
            },
        );

        let composites = state.scene.composites();
        assert_eq!(composites.len(), 1);
        assert_eq!(composites[0].pallet.transform.translation.x, -3.0);
    }
}
