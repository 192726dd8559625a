use std::sync::Arc;
use std::time::{Duration, Instant};

use gpui::{
    Context, Div, DragMoveEvent, Entity, ExternalPaths, IntoElement, PathPromptOptions, Render,
    Stateful, Subscription, Task, Timer, Window, div, prelude::*, px, rgb,
};
use gpui_component::{
    Disableable,
    button::{Button, ButtonVariants as _},
    input::{Input, InputEvent, InputState},
    label::Label,
    scroll::ScrollableElement,
};
use shortgen::{
    app::{
        FormController, IntakeOutcome, SubmissionJobKind, SubmissionJobManager,
        SubmissionJobState, SubmissionJobUpdate,
    },
    domain::{SUCCESS_BANNER_MESSAGE, Slot, SubmissionError, SubmissionState},
    infra::audio::load_audio_file,
};
use tracing::{debug, warn};

use super::backend::{FormBackend, build_form_backend};
use super::state::{
    probe_banner_color, probe_button_label, stale_drag_slots, submit_button_label,
    upload_zone_colors, zone_hint,
};
use super::utils::{dropped_audio_files, log_submission};
use super::{
    FILE_PICKER_PROMPT, FOOTER_TEXT, HEADER_SUBTITLE, HEADER_TITLE, JOB_UPDATE_POLL_INTERVAL_MS,
    PROMPT_EDITOR_HEIGHT_PX, PROMPT_EDITOR_ROWS, PROMPT_PLACEHOLDER, SUPPORTED_FORMATS_HINT,
};

pub(super) struct ShortsFormWindow {
    prompt_input: Entity<InputState>,
    _prompt_input_subscription: Subscription,
    controller: FormController,
    job_manager: Arc<SubmissionJobManager>,
    endpoint: String,
    debug_prompt_log: bool,
    submission_job: Option<u64>,
    probe_job: Option<u64>,
    file_error: Option<(Slot, String)>,
    startup_notice: Option<String>,
    _update_poll_task: Task<()>,
    _file_picker_task: Task<()>,
}

impl ShortsFormWindow {
    pub(super) fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let prompt_input = cx.new(|cx| {
            InputState::new(window, cx)
                .multi_line(true)
                .rows(PROMPT_EDITOR_ROWS)
                .placeholder(PROMPT_PLACEHOLDER)
        });
        let prompt_input_subscription =
            cx.subscribe_in(&prompt_input, window, Self::on_prompt_input_event);

        let FormBackend {
            job_manager,
            controller_config,
            endpoint,
            debug_prompt_log,
            startup_notice,
        } = build_form_backend();

        Self {
            prompt_input,
            _prompt_input_subscription: prompt_input_subscription,
            controller: FormController::new(controller_config),
            job_manager,
            endpoint,
            debug_prompt_log,
            submission_job: None,
            probe_job: None,
            file_error: None,
            startup_notice,
            _update_poll_task: Task::ready(()),
            _file_picker_task: Task::ready(()),
        }
    }

    fn on_prompt_input_event(
        &mut self,
        state: &Entity<InputState>,
        event: &InputEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !matches!(event, InputEvent::Change) {
            return;
        }

        let value = state.read(cx).value().to_string();
        if !self.controller.edit_prompt(&value) {
            let current = self.controller.state().inputs.prompt.as_str().to_string();
            state.update(cx, |input, cx| input.set_value(current, window, cx));
        }
        cx.notify();
    }

    fn on_upload_zone_hover(&mut self, slot: Slot, inside: bool, cx: &mut Context<Self>) {
        if self.controller.state().drag.is_active(slot) == inside {
            return;
        }
        if inside {
            self.controller.drag_enter(slot);
        } else {
            self.controller.drag_leave(slot);
        }
        cx.notify();
    }

    fn on_upload_zone_drop(&mut self, slot: Slot, paths: &ExternalPaths, cx: &mut Context<Self>) {
        match dropped_audio_files(paths.paths()) {
            Ok(files) => {
                self.clear_file_error(slot);
                let outcome = self.controller.drop_files(slot, files);
                debug!(slot = slot.field_name(), ?outcome, "drop handled");
            }
            Err(error) => {
                self.controller.drag_leave(slot);
                self.file_error = Some((slot, error.user_message()));
            }
        }
        cx.notify();
    }

    fn on_browse_clicked(&mut self, slot: Slot, window: &mut Window, cx: &mut Context<Self>) {
        let receiver = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: Some(FILE_PICKER_PROMPT.into()),
        });

        self._file_picker_task = cx.spawn_in(window, async move |view, window| {
            let Ok(result) = receiver.await else {
                return;
            };

            let _ = view.update_in(window, |view, _window, cx| {
                match result {
                    Ok(Some(paths)) => {
                        let file = match paths.into_iter().next().map(load_audio_file) {
                            Some(Ok(file)) => Some(file),
                            Some(Err(error)) => {
                                view.file_error = Some((slot, error.user_message()));
                                cx.notify();
                                return;
                            }
                            None => None,
                        };
                        view.clear_file_error(slot);
                        let outcome = view.controller.pick_file(slot, file);
                        if let IntakeOutcome::Ignored { reason } = outcome {
                            debug!(slot = slot.field_name(), ?reason, "picked file ignored");
                        }
                    }
                    Ok(None) => {}
                    Err(error) => {
                        view.file_error =
                            Some((slot, format!("Could not open the file dialog: {error}")));
                    }
                }
                cx.notify();
            });
        });
    }

    fn on_submit_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(payload) = self.controller.begin_submission() else {
            cx.notify();
            return;
        };

        log_submission(&payload, self.debug_prompt_log);
        match self.job_manager.submit(payload) {
            Ok(job_id) => {
                self.submission_job = Some(job_id);
                self.start_update_polling(window, cx);
            }
            Err(error) => {
                self.controller.finish_submission(
                    Err(SubmissionError::unknown(error.user_message())),
                    Instant::now(),
                );
            }
        }
        cx.notify();
    }

    fn on_test_connection_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.controller.begin_probe() {
            return;
        }

        match self.job_manager.probe() {
            Ok(job_id) => {
                self.probe_job = Some(job_id);
                self.start_update_polling(window, cx);
            }
            Err(error) => {
                warn!(%error, "connectivity probe could not be queued");
                self.controller.finish_probe(false);
            }
        }
        cx.notify();
    }

    fn on_reset_clicked(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.controller.reset();
        self.file_error = None;
        self.clear_prompt_input(window, cx);
        cx.notify();
    }

    fn clear_prompt_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.prompt_input
            .update(cx, |input, cx| input.set_value("", window, cx));
    }

    fn clear_file_error(&mut self, slot: Slot) {
        if self
            .file_error
            .as_ref()
            .is_some_and(|(error_slot, _)| *error_slot == slot)
        {
            self.file_error = None;
        }
    }

    fn start_update_polling(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self._update_poll_task = cx.spawn_in(window, async move |view, window| {
            loop {
                Timer::after(Duration::from_millis(JOB_UPDATE_POLL_INTERVAL_MS)).await;
                let keep_polling = match view
                    .update_in(window, |view, window, cx| view.poll_updates(window, cx))
                {
                    Ok(keep_polling) => keep_polling,
                    Err(_) => break,
                };

                if !keep_polling {
                    break;
                }
            }
        });
    }

    fn poll_updates(&mut self, window: &mut Window, cx: &mut Context<Self>) -> bool {
        let updates = self.job_manager.drain_updates();
        let mut changed = !updates.is_empty();
        for update in updates {
            self.apply_job_update(update);
        }

        if self.controller.poll_pending_reset(Instant::now()) {
            self.clear_prompt_input(window, cx);
            changed = true;
        }

        if changed {
            cx.notify();
        }

        self.submission_job.is_some()
            || self.probe_job.is_some()
            || self.controller.has_pending_reset()
    }

    fn apply_job_update(&mut self, update: SubmissionJobUpdate) {
        if !update.is_finished() {
            return;
        }

        match update.kind {
            SubmissionJobKind::Submission if self.submission_job == Some(update.job_id) => {
                self.submission_job = None;
                let result = match update.error {
                    Some(error) => Err(error),
                    None => Ok(()),
                };
                self.controller.finish_submission(result, Instant::now());
            }
            SubmissionJobKind::Probe if self.probe_job == Some(update.job_id) => {
                self.probe_job = None;
                self.controller
                    .finish_probe(update.state == SubmissionJobState::Succeeded);
            }
            _ => {}
        }
    }

    fn render_upload_zone(&self, slot: Slot, cx: &mut Context<Self>) -> Stateful<Div> {
        let file = self.controller.state().inputs.slot(slot);
        let dragging = self.controller.state().drag.is_active(slot);
        let colors = upload_zone_colors(file.is_some(), dragging);
        let hover_colors = upload_zone_colors(file.is_some(), true);
        let file_error = self
            .file_error
            .as_ref()
            .filter(|(error_slot, _)| *error_slot == slot)
            .map(|(_, message)| message.clone());

        div()
            .id(upload_zone_id(slot))
            .flex()
            .flex_col()
            .flex_1()
            .gap_2()
            .p_4()
            .border_2()
            .rounded_lg()
            .border_color(colors.border)
            .bg(colors.background)
            .can_drop(|value, _, _| {
                value
                    .downcast_ref::<ExternalPaths>()
                    .is_some_and(|paths| !paths.paths().is_empty())
            })
            .drag_over::<ExternalPaths>(move |style, _, _, _| {
                style
                    .border_color(hover_colors.border)
                    .bg(hover_colors.background)
            })
            .on_drag_move(cx.listener(
                move |this, event: &DragMoveEvent<ExternalPaths>, _window, cx| {
                    let inside = event.bounds.contains(&event.event.position);
                    this.on_upload_zone_hover(slot, inside, cx)
                },
            ))
            .on_drop(cx.listener(move |this, paths: &ExternalPaths, _window, cx| {
                this.on_upload_zone_drop(slot, paths, cx)
            }))
            .child(Label::new(slot.title()))
            .child(div().text_color(rgb(0x94a3b8)).child(slot.description()))
            .children(file.map(|file| {
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .child(
                        div()
                            .text_color(colors.accent)
                            .child(format!("✓ {}", file.name())),
                    )
                    .child(div().text_color(rgb(0x94a3b8)).child(file.size_label()))
            }))
            .child(div().text_color(colors.accent).child(zone_hint(file.is_some())))
            .child(div().text_color(rgb(0x64748b)).child(SUPPORTED_FORMATS_HINT))
            .children(file_error.map(|message| div().text_color(rgb(0xfca5a5)).child(message)))
            .child(
                Button::new(browse_button_id(slot))
                    .label("Browse")
                    .on_click(cx.listener(move |this, _, window, cx| {
                        this.on_browse_clicked(slot, window, cx)
                    })),
            )
    }
}

fn upload_zone_id(slot: Slot) -> &'static str {
    match slot {
        Slot::Cta => "upload-zone-cta",
        Slot::Bgm => "upload-zone-bgm",
    }
}

fn browse_button_id(slot: Slot) -> &'static str {
    match slot {
        Slot::Cta => "browse-button-cta",
        Slot::Bgm => "browse-button-bgm",
    }
}

impl Render for ShortsFormWindow {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        for slot in stale_drag_slots(self.controller.state().drag, cx.has_active_drag()) {
            self.controller.drag_leave(slot);
        }

        let state = self.controller.state();
        let submission = state.submission.clone();
        let probe = state.probe;
        let prompt_counter = state.inputs.prompt.counter_label();
        let in_flight = submission.is_in_flight();
        let can_submit = self.controller.can_submit();
        let cta_zone = self.render_upload_zone(Slot::Cta, cx);
        let bgm_zone = self.render_upload_zone(Slot::Bgm, cx);

        let error_banner = submission.error_message().map(|message| {
            div()
                .flex()
                .flex_col()
                .gap_2()
                .p_3()
                .border_1()
                .rounded_lg()
                .border_color(rgb(0x7f1d1d))
                .bg(rgb(0x450a0a))
                .child(div().text_color(rgb(0xfca5a5)).child("Connection Error"))
                .child(div().text_color(rgb(0xfecaca)).child(message.to_string()))
                .child(
                    Button::new("test-connection-button")
                        .label(probe_button_label(probe))
                        .loading(probe.is_testing())
                        .disabled(probe.is_testing())
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.on_test_connection_clicked(window, cx)
                        })),
                )
        });
        let probe_banner = probe.banner_message().map(|message| {
            div()
                .p_3()
                .border_1()
                .rounded_lg()
                .border_color(probe_banner_color(probe))
                .text_color(probe_banner_color(probe))
                .child(format!("Webhook ({}): {message}", self.endpoint))
        });
        let success_banner = matches!(submission, SubmissionState::Succeeded).then(|| {
            div()
                .p_3()
                .border_1()
                .rounded_lg()
                .border_color(rgb(0x166534))
                .bg(rgb(0x052e16))
                .text_color(rgb(0x86efac))
                .child(SUCCESS_BANNER_MESSAGE)
        });

        div()
            .size_full()
            .overflow_y_scrollbar()
            .overflow_x_hidden()
            .flex()
            .flex_col()
            .gap_3()
            .p_4()
            .bg(rgb(0x111827))
            .text_color(rgb(0xf9fafb))
            .child(Label::new(HEADER_TITLE))
            .child(div().text_color(rgb(0x94a3b8)).child(HEADER_SUBTITLE))
            .child(div().flex().gap_3().child(cta_zone).child(bgm_zone))
            .child(Label::new("Video Prompt"))
            .child(
                div()
                    .text_color(rgb(0x94a3b8))
                    .child("Describe your video concept and style"),
            )
            .child(Input::new(&self.prompt_input).h(px(PROMPT_EDITOR_HEIGHT_PX)))
            .child(div().text_color(rgb(0x64748b)).child(prompt_counter))
            .children(error_banner)
            .children(probe_banner)
            .children(success_banner)
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(
                        Button::new("submit-button")
                            .primary()
                            .label(submit_button_label(&submission))
                            .loading(in_flight)
                            .disabled(!can_submit)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.on_submit_clicked(window, cx)
                            })),
                    )
                    .child(
                        Button::new("reset-button")
                            .label("Reset")
                            .disabled(in_flight)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.on_reset_clicked(window, cx)
                            })),
                    ),
            )
            .children(self.startup_notice.iter().map(|notice| {
                div()
                    .text_color(rgb(0x93c5fd))
                    .child(format!("Backend: {notice}"))
            }))
            .child(div().text_color(rgb(0x64748b)).child(FOOTER_TEXT))
    }
}
