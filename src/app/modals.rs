//! Modal dialogs (error alert, settings) and the toast overlay

use super::session::AlertKind;
use super::App;
use crate::client::parse_endpoint;
use crate::constants::APP_NAME;
use crate::theme;
use crate::types::Language;
use crate::ui::components::close_button;
use eframe::egui;
use tracing::info;

const TOAST_VISIBLE_SECS: f32 = 3.0;
const TOAST_FADE_SECS: f32 = 0.5;

/// Parse the timeout field. Blank or zero means no overall timeout.
fn parse_timeout_draft(draft: &str) -> Result<Option<u64>, String> {
    let trimmed = draft.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err(format!("Timeout must be a whole number of seconds, got {trimmed:?}")),
    }
}

/// Text input styled like the rest of the dark surfaces
fn input_field(ui: &mut egui::Ui, text: &mut String, hint: &str) -> egui::Response {
    egui::Frame::new()
        .fill(theme::BG_INPUT)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(text)
                    .frame(false)
                    .hint_text(hint)
                    .desired_width(f32::INFINITY)
                    .text_color(theme::TEXT_SECONDARY),
            )
        })
        .inner
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(egui::RichText::new(text).size(theme::FONT_LABEL).color(theme::ACCENT))
            .selectable(false),
    );
    ui.add_space(2.0);
}

impl App {
    // ========================================================================
    // ERROR ALERT
    // ========================================================================

    pub(crate) fn render_alert_modal(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.session.alert().cloned() else {
            return;
        };

        let (title, hint) = match alert.kind {
            AlertKind::Unreachable => (
                "Generation failed",
                format!(
                    "Could not connect to {APP_NAME} backend. Is the caption server running at {}?",
                    self.active_endpoint()
                ),
            ),
            AlertKind::InvalidResponse => (
                "Unexpected response",
                format!(
                    "The caption server at {} answered, but not with captions and hashtags.",
                    self.active_endpoint()
                ),
            ),
        };

        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("alert_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(140))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(380.0);
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                            .size(20.0)
                            .color(theme::STATUS_ERROR),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(title)
                                .size(theme::FONT_HEADING)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(theme::SPACING_MD);
                ui.label(egui::RichText::new(hint).color(theme::TEXT_SECONDARY));
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(&alert.detail)
                        .size(theme::FONT_SMALL)
                        .monospace()
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(theme::SPACING_LG);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_sized([88.0, 30.0], theme::button_accent("OK"))
                        .clicked()
                    {
                        dismissed = true;
                    }
                });
            });

        if dismissed || modal.should_close() {
            self.session.dismiss_alert();
        }
    }

    // ========================================================================
    // SETTINGS
    // ========================================================================

    /// Open the settings modal with drafts seeded from the current values
    pub(crate) fn open_settings(&mut self) {
        self.settings_endpoint_draft = self.endpoint.clone();
        self.settings_timeout_draft = self
            .request_timeout_secs
            .map(|s| s.to_string())
            .unwrap_or_default();
        self.settings_language_draft = self.default_language;
        self.settings_error = None;
        self.show_settings = true;
    }

    pub(crate) fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut save = false;
        let mut close = false;
        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(360.0);

                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(theme::FONT_HEADING).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if close_button(ui).clicked() {
                            close = true;
                        }
                    });
                });
                ui.add_space(theme::SPACING_SM);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                section_label(ui, "Caption server");
                input_field(ui, &mut self.settings_endpoint_draft, "http://127.0.0.1:8000/generate");
                if self.effective_endpoint != self.endpoint {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} is in effect ({}). Editing this field replaces it for the session.",
                            crate::constants::ENDPOINT_ENV_VAR,
                            self.effective_endpoint
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::STATUS_WARNING),
                    );
                }

                ui.add_space(theme::SPACING_MD);
                section_label(ui, "Request timeout (seconds, blank for none)");
                input_field(ui, &mut self.settings_timeout_draft, "none");

                ui.add_space(theme::SPACING_MD);
                section_label(ui, "Default language");
                egui::ComboBox::from_id_salt("default_language")
                    .selected_text(self.settings_language_draft.label())
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for language in Language::ALL {
                            ui.selectable_value(&mut self.settings_language_draft, language, language.label());
                        }
                    });

                if let Some(err) = &self.settings_error {
                    ui.add_space(theme::SPACING_SM);
                    ui.label(egui::RichText::new(err).size(theme::FONT_SMALL).color(theme::STATUS_ERROR));
                }

                ui.add_space(theme::SPACING_LG);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_sized([88.0, 30.0], theme::button_accent("Save")).clicked() {
                        save = true;
                    }
                    if ui.add_sized([88.0, 30.0], theme::button("Cancel")).clicked() {
                        close = true;
                    }
                });
            });

        if save {
            let endpoint = self.settings_endpoint_draft.trim().to_string();
            let validated = parse_endpoint(&endpoint)
                .map_err(|e| e.to_string())
                .and_then(|_| parse_timeout_draft(&self.settings_timeout_draft));
            match validated {
                Ok(timeout_secs) => {
                    self.default_language = self.settings_language_draft;
                    info!(%endpoint, ?timeout_secs, language = self.default_language.code(), "Settings saved");
                    self.apply_server_settings(endpoint, timeout_secs);
                    self.show_settings = false;
                }
                Err(e) => self.settings_error = Some(e),
            }
        } else if close || modal.should_close() {
            self.show_settings = false;
        }
    }

    // ========================================================================
    // TOAST
    // ========================================================================

    /// Bottom-right toast: visible for a few seconds then fades; hovering pauses it
    pub(crate) fn render_toast(&mut self, ctx: &egui::Context) {
        let Some(msg) = self.toast_message.clone() else {
            return;
        };
        let total = TOAST_VISIBLE_SECS + TOAST_FADE_SECS;
        let margin = theme::SPACING_LG;
        let screen = ctx.screen_rect();

        let response = egui::Area::new(egui::Id::new("toast"))
            .fixed_pos(egui::pos2(screen.right() - margin, screen.bottom() - margin))
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
                let alpha = if elapsed > TOAST_VISIBLE_SECS {
                    ((total - elapsed) / TOAST_FADE_SECS).clamp(0.0, 1.0)
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(theme::with_alpha(theme::BG_ELEVATED, (235.0 * alpha) as u8))
                    .stroke(egui::Stroke::new(
                        theme::STROKE_DEFAULT,
                        theme::with_alpha(theme::ACCENT, (100.0 * alpha) as u8),
                    ))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&msg)
                                .color(theme::with_alpha(theme::TEXT_PRIMARY, (255.0 * alpha) as u8)),
                        );
                    });
            });

        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        if elapsed >= total {
            self.toast_message = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
