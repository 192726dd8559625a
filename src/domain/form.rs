use serde::Serialize;

use super::AudioFile;

pub const PROMPT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Cta,
    Bgm,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Cta, Slot::Bgm];

    /// Multipart field name the webhook expects for this slot.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Cta => "cta",
            Self::Bgm => "bgm",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Cta => "Call-to-Action Audio",
            Self::Bgm => "Background Music",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Cta => "Upload your CTA voice recording",
            Self::Bgm => "Upload your background music track",
        }
    }
}

/// Prompt text that can never grow past [`PROMPT_MAX_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PromptText(String);

impl PromptText {
    /// Replaces the text unless `candidate` exceeds the ceiling, in which case
    /// the current text is kept and `false` is returned.
    pub fn try_replace(&mut self, candidate: &str) -> bool {
        if candidate.chars().count() > PROMPT_MAX_CHARS {
            return false;
        }
        self.0.clear();
        self.0.push_str(candidate);
        true
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn counter_label(&self) -> String {
        format!("{}/{PROMPT_MAX_CHARS}", self.char_count())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormInputs {
    pub cta: Option<AudioFile>,
    pub bgm: Option<AudioFile>,
    pub prompt: PromptText,
}

impl FormInputs {
    pub fn slot(&self, slot: Slot) -> Option<&AudioFile> {
        match slot {
            Slot::Cta => self.cta.as_ref(),
            Slot::Bgm => self.bgm.as_ref(),
        }
    }

    /// Stores `file` in `slot` and reports whether a previous file was replaced.
    pub fn attach(&mut self, slot: Slot, file: AudioFile) -> bool {
        let target = match slot {
            Slot::Cta => &mut self.cta,
            Slot::Bgm => &mut self.bgm,
        };
        target.replace(file).is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.cta.is_some() && self.bgm.is_some() && !self.prompt.is_blank()
    }

    pub fn is_empty(&self) -> bool {
        self.cta.is_none() && self.bgm.is_none() && self.prompt.as_str().is_empty()
    }

    pub fn clear(&mut self) {
        self.cta = None;
        self.bgm = None;
        self.prompt.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DragState {
    pub cta_active: bool,
    pub bgm_active: bool,
}

impl DragState {
    pub fn is_active(&self, slot: Slot) -> bool {
        match slot {
            Slot::Cta => self.cta_active,
            Slot::Bgm => self.bgm_active,
        }
    }

    pub fn set(&mut self, slot: Slot, active: bool) {
        match slot {
            Slot::Cta => self.cta_active = active,
            Slot::Bgm => self.bgm_active = active,
        }
    }
}
