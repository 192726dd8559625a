use gpui::{App, Global, Hsla, Pixels, SharedString, px, rgb};
use gpui_component::Theme;

#[derive(Debug, Clone, Copy)]
pub(super) struct ThemeColors {
    pub(super) surface_background: Hsla,
    pub(super) surface_foreground: Hsla,
    pub(super) panel_background: Hsla,
    pub(super) panel_border: Hsla,
    pub(super) primary: Hsla,
    pub(super) primary_dark: Hsla,
    pub(super) accent: Hsla,
    pub(super) muted_foreground: Hsla,
    pub(super) success_foreground: Hsla,
    pub(super) error_foreground: Hsla,
}

#[derive(Debug, Clone)]
pub(super) struct ShortgenTheme {
    pub(super) colors: ThemeColors,
    pub(super) font_family: SharedString,
    pub(super) font_size: Pixels,
    pub(super) control_radius: Pixels,
    pub(super) panel_radius: Pixels,
}

impl Default for ShortgenTheme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                surface_background: rgb(0x111827).into(),
                surface_foreground: rgb(0xf9fafb).into(),
                panel_background: rgb(0x0f172a).into(),
                panel_border: rgb(0x475569).into(),
                primary: rgb(0x9333ea).into(),
                primary_dark: rgb(0x7e22ce).into(),
                accent: rgb(0xdb2777).into(),
                muted_foreground: rgb(0x94a3b8).into(),
                success_foreground: rgb(0x86efac).into(),
                error_foreground: rgb(0xfca5a5).into(),
            },
            font_family: ".SystemUIFont".into(),
            font_size: px(16.0),
            control_radius: px(8.0),
            panel_radius: px(16.0),
        }
    }
}

impl Global for ShortgenTheme {}

pub(super) fn apply_default_theme(cx: &mut App) {
    let theme = ShortgenTheme::default();
    cx.set_global(theme.clone());
    apply_to_gpui_component_theme(&theme, cx);
}

fn apply_to_gpui_component_theme(theme: &ShortgenTheme, cx: &mut App) {
    let component_theme = Theme::global_mut(cx);
    let colors = theme.colors;

    component_theme.font_family = theme.font_family.clone();
    component_theme.font_size = theme.font_size;
    component_theme.radius = theme.control_radius;
    component_theme.radius_lg = theme.panel_radius;

    component_theme.background = colors.surface_background;
    component_theme.foreground = colors.surface_foreground;
    component_theme.border = colors.panel_border;
    component_theme.input = colors.panel_border;

    // Purple primary with a pink hover keeps the submit button close to the web gradient.
    component_theme.primary = colors.primary;
    component_theme.primary_hover = colors.accent;
    component_theme.primary_active = colors.primary_dark;
    component_theme.primary_foreground = colors.surface_foreground;

    component_theme.secondary = colors.panel_background;
    component_theme.secondary_hover = colors.panel_border;
    component_theme.secondary_active = colors.panel_border;
    component_theme.secondary_foreground = colors.surface_foreground;

    component_theme.danger = colors.error_foreground;
    component_theme.danger_foreground = colors.surface_background;
    component_theme.success = colors.success_foreground;
    component_theme.success_foreground = colors.surface_background;

    component_theme.muted_foreground = colors.muted_foreground;
    component_theme.ring = colors.primary;
}
