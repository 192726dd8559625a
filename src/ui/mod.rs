use gpui::{App, AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use gpui_component::Root;

mod backend;
mod state;
mod theme;
mod utils;
mod window;

const FORM_WINDOW_WIDTH: f32 = 820.0;
const FORM_WINDOW_HEIGHT: f32 = 760.0;
const PROMPT_EDITOR_HEIGHT_PX: f32 = 160.0;
const PROMPT_EDITOR_ROWS: usize = 6;
const JOB_UPDATE_POLL_INTERVAL_MS: u64 = 50;

const HEADER_TITLE: &str = "YouTube Shorts Generator";
const HEADER_SUBTITLE: &str =
    "Transform your ideas into engaging YouTube Shorts with AI-powered video generation";
const FOOTER_TEXT: &str = "Powered by AI • Generate amazing YouTube Shorts in minutes";
const PROMPT_PLACEHOLDER: &str = "Enter your creative prompt here... Describe the style, mood, visuals, and any specific requirements for your YouTube Short.";
const SUPPORTED_FORMATS_HINT: &str = "Supports MP3, WAV, M4A";
const FILE_PICKER_PROMPT: &str = "Select Audio File";
const UNCONFIGURED_WEBHOOK_NOTICE: &str = "No webhook is configured. Set SHORTGEN_WEBHOOK_URL to an http(s) URL to enable submissions.";
const DEBUG_PROMPT_LOG_ENV: &str = "SHORTGEN_DEBUG_PROMPT_LOG";
const DEBUG_PROMPT_PREVIEW_CHARS: usize = 120;

pub(crate) fn run_form_window() {
    Application::new().run(|cx: &mut App| {
        gpui_component::init(cx);
        theme::apply_default_theme(cx);

        let bounds = Bounds::centered(
            None,
            size(px(FORM_WINDOW_WIDTH), px(FORM_WINDOW_HEIGHT)),
            cx,
        );
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        };

        if cx
            .open_window(options, |window, cx| {
                let view = cx.new(|cx| window::ShortsFormWindow::new(window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })
            .is_err()
        {
            cx.quit();
            return;
        }

        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        cx.activate(true);
    });
}
