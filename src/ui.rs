use imgui::Condition;

use crate::{config::PlacementKind, viewer::ViewerState};

const ERROR_POPUP: &str = "Invalid configuration";
const ERROR_COLOR: [f32; 4] = [0.85, 0.2, 0.2, 1.0];

/// Buttons pressed in the configuration panel this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PanelActions {
    pub apply: bool,
    pub reset: bool,
}

pub fn draw_config_panel(ui: &imgui::Ui, state: &mut ViewerState) -> PanelActions {
    let mut actions = PanelActions::default();

    let conveyors = count_of(state, &PlacementKind::Roller);
    let tables = count_of(state, &PlacementKind::Rotary);
    let total = state.scene.composites().len();

    ui.window("Configuration")
        .position([10.0, 10.0], Condition::FirstUseEver)
        .size([380.0, 460.0], Condition::FirstUseEver)
        .build(|| {
            ui.input_text_multiline("##layout", &mut state.editor.text, [-1.0, 320.0])
                .build();

            actions.apply = ui.button("Apply");
            ui.same_line();
            actions.reset = ui.button("Default");

            ui.separator();
            ui.text(format!(
                "{total} objects: {conveyors} conveyors, {tables} rotary tables"
            ));
            ui.text_disabled("Left drag: orbit, right drag: pan, wheel: zoom");

            if let Some(error) = &state.editor.error {
                ui.text_colored(ERROR_COLOR, error);
            }
        });

    if state.editor.take_error_popup() {
        ui.open_popup(ERROR_POPUP);
    }

    ui.modal_popup(ERROR_POPUP, || {
        if let Some(error) = &state.editor.error {
            ui.text(error);
        }
        if ui.button("OK") {
            ui.close_current_popup();
        }
    });

    actions
}

fn count_of(state: &ViewerState, kind: &PlacementKind) -> usize {
    state
        .scene
        .composites()
        .iter()
        .filter(|composite| &composite.kind == kind)
        .count()
}
