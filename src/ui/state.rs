use gpui::{Hsla, rgb};
use shortgen::domain::{DragState, ProbeState, Slot, SubmissionState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ZoneColors {
    pub(super) border: Hsla,
    pub(super) background: Hsla,
    pub(super) accent: Hsla,
}

/// Drag hover wins over the attached-file look, matching the web form.
pub(super) fn upload_zone_colors(has_file: bool, dragging: bool) -> ZoneColors {
    if dragging {
        ZoneColors {
            border: rgb(0xc084fc).into(),
            background: rgb(0x2e1065).into(),
            accent: rgb(0xd8b4fe).into(),
        }
    } else if has_file {
        ZoneColors {
            border: rgb(0x4ade80).into(),
            background: rgb(0x052e16).into(),
            accent: rgb(0x86efac).into(),
        }
    } else {
        ZoneColors {
            border: rgb(0x475569).into(),
            background: rgb(0x0f172a).into(),
            accent: rgb(0x94a3b8).into(),
        }
    }
}

pub(super) fn submit_button_label(submission: &SubmissionState) -> &'static str {
    if submission.is_in_flight() {
        "Generating Your Short..."
    } else {
        "Create YouTube Short"
    }
}

pub(super) fn probe_button_label(probe: ProbeState) -> &'static str {
    if probe.is_testing() {
        "Testing..."
    } else {
        "Test Connection"
    }
}

pub(super) fn probe_banner_color(probe: ProbeState) -> Hsla {
    match probe {
        ProbeState::Reachable => rgb(0x86efac).into(),
        ProbeState::Unreachable => rgb(0xfca5a5).into(),
        ProbeState::NotRun | ProbeState::Testing => rgb(0x94a3b8).into(),
    }
}

pub(super) fn zone_hint(has_file: bool) -> &'static str {
    if has_file {
        "Drop another file or browse to replace it"
    } else {
        "Drop your MP3 file here or click to browse"
    }
}

/// Slots still flagged as hovered once no external drag is in progress. An OS drag
/// that is cancelled or leaves the window quickly ends without a final move event.
pub(super) fn stale_drag_slots(drag: DragState, drag_in_progress: bool) -> Vec<Slot> {
    if drag_in_progress {
        return Vec::new();
    }
    Slot::ALL
        .into_iter()
        .filter(|slot| drag.is_active(*slot))
        .collect()
}
