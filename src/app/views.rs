//! Pane rendering: upload (left) and results (right)

use super::preview::Preview;
use super::App;
use crate::constants::APP_NAME;
use crate::theme;
use crate::types::{caption_style, CopyTarget, GenerationResult, Language, RequestPhase};
use crate::ui::components::{copy_button, dashed_outline, icon_label};
use crate::utils::{format_bytes, rasterize_logo};
use eframe::egui;
use std::time::Instant;
use tracing::warn;

impl App {
    // ========================================================================
    // UPLOAD PANE
    // ========================================================================

    pub(crate) fn render_upload_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(theme::SPACING_XXL);
        self.render_header(ui, ctx);
        ui.add_space(theme::SPACING_XXL);

        self.render_drop_zone(ui, ctx);

        if let Some(file) = self.session.selected() {
            ui.add_space(theme::SPACING_SM);
            let kind_icon = match self.preview.current() {
                Some(Preview::Video { .. }) => egui_phosphor::regular::VIDEO_CAMERA,
                _ => egui_phosphor::regular::IMAGE,
            };
            icon_label(
                ui,
                kind_icon,
                &format!("{}  ·  {}  ·  {}", file.name, format_bytes(file.size()), file.mime),
                theme::TEXT_DIM,
                theme::FONT_SMALL,
            );
        }

        ui.add_space(theme::SPACING_XL);

        // Language
        icon_label(ui, egui_phosphor::regular::GLOBE, "LANGUAGE", theme::TEXT_DIM, theme::FONT_SMALL);
        let labels: Vec<&str> = Language::ALL.iter().map(|l| l.label()).collect();
        let mut selected = Language::ALL
            .iter()
            .position(|l| *l == self.session.language())
            .unwrap_or(0);
        if theme::segmented_select(ui, &labels, &mut selected, 36.0) {
            self.session.set_language(Language::ALL[selected]);
        }

        ui.add_space(theme::SPACING_LG);
        self.render_generate_button(ui, ctx);

        // Footer: server address + settings
        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.add_space(theme::SPACING_XL);
            ui.horizontal(|ui| {
                let gear = ui.add(
                    egui::Button::new(egui::RichText::new(egui_phosphor::regular::GEAR).size(16.0))
                        .frame(false),
                );
                if gear.on_hover_text("Settings").clicked() {
                    self.open_settings();
                }
                let (dot, status) = if self.client.is_some() {
                    (theme::STATUS_SUCCESS, self.active_endpoint())
                } else {
                    (theme::STATUS_ERROR, format!("Invalid server address: {}", self.effective_endpoint))
                };
                ui.label(egui::RichText::new("●").size(10.0).color(dot));
                ui.add(
                    egui::Label::new(egui::RichText::new(status).size(theme::FONT_SMALL).color(theme::TEXT_DIM))
                        .truncate(),
                );
            });
        });
    }

    fn render_header(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if self.logo_texture.is_none() {
                self.logo_texture = rasterize_logo(96).map(|(pixels, w, h)| {
                    ctx.load_texture(
                        "logo",
                        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
                        egui::TextureOptions::LINEAR,
                    )
                });
            }
            if let Some(texture) = &self.logo_texture {
                ui.image(egui::load::SizedTexture::new(texture.id(), egui::vec2(48.0, 48.0)));
            }
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("{APP_NAME}."))
                        .size(theme::FONT_DISPLAY)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                )
                .selectable(false),
            );
        });
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::SPARKLE)
                    .size(theme::FONT_HEADING)
                    .color(theme::SPARKLE),
            );
            ui.label(
                egui::RichText::new("AI-Powered Caption & Title Generator")
                    .size(theme::FONT_HEADING)
                    .color(theme::TEXT_MUTED),
            );
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), theme::DROP_ZONE_HEIGHT),
            egui::Sense::click(),
        );
        let dragging = self.session.is_dragging();
        let hovered = response.hovered();

        let (fill, border) = if dragging {
            (theme::with_alpha(theme::ACCENT, 26), theme::ACCENT)
        } else if hovered {
            (theme::with_alpha(theme::BG_SURFACE, 150), theme::BORDER_STRONG)
        } else {
            (theme::with_alpha(theme::BG_SURFACE, 100), theme::BORDER_DEFAULT)
        };
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, theme::RADIUS_XL, fill);

        match self.preview.current() {
            Some(preview) => {
                paint_preview(&painter, rect.shrink(theme::SPACING_MD), preview);
                if hovered || dragging {
                    painter.rect_filled(rect, theme::RADIUS_XL, egui::Color32::from_black_alpha(150));
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("{}  Replace File", egui_phosphor::regular::UPLOAD_SIMPLE),
                        egui::FontId::proportional(theme::FONT_HEADING),
                        theme::TEXT_PRIMARY,
                    );
                }
            }
            None => {
                let text_color = if hovered { theme::TEXT_SECONDARY } else { theme::TEXT_DIM };
                let center = rect.center();
                painter.circle_filled(center - egui::vec2(0.0, 36.0), 32.0, theme::BG_SURFACE);
                painter.circle_stroke(
                    center - egui::vec2(0.0, 36.0),
                    32.0,
                    egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
                );
                painter.text(
                    center - egui::vec2(0.0, 36.0),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::CAMERA,
                    egui::FontId::proportional(30.0),
                    theme::ACCENT,
                );
                painter.text(
                    center + egui::vec2(0.0, 18.0),
                    egui::Align2::CENTER_CENTER,
                    "Click or Drag File",
                    egui::FontId::proportional(theme::FONT_TITLE - 2.0),
                    if hovered { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY },
                );
                painter.text(
                    center + egui::vec2(0.0, 42.0),
                    egui::Align2::CENTER_CENTER,
                    "Supports Images & Videos",
                    egui::FontId::proportional(theme::FONT_LABEL),
                    text_color,
                );
            }
        }

        dashed_outline(
            &painter,
            rect.shrink(1.0),
            egui::Stroke::new(theme::STROKE_THICK, border),
        );

        if hovered {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            self.pick_file(ctx);
        }
    }

    fn render_generate_button(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let loading = self.session.is_loading();
        let enabled = self.session.can_generate();

        ui.horizontal(|ui| {
            let cancel_w = if loading { 110.0 } else { 0.0 };
            let width = ui.available_width() - cancel_w;
            let sense = if enabled { egui::Sense::click() } else { egui::Sense::hover() };
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(width, theme::BUTTON_HEIGHT_LARGE), sense);

            let (fill, draw_rect) = if enabled {
                theme::button_visual(&response, theme::BTN_ACCENT, rect)
            } else {
                (theme::BTN_DISABLED, rect)
            };
            let painter = ui.painter();
            painter.rect_filled(draw_rect, theme::RADIUS_MEDIUM + 4.0, fill);
            if !enabled {
                painter.rect_stroke(
                    draw_rect,
                    theme::RADIUS_MEDIUM + 4.0,
                    egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
                    egui::StrokeKind::Inside,
                );
            }

            if loading {
                let spinner_rect = egui::Rect::from_center_size(
                    draw_rect.center() - egui::vec2(56.0, 0.0),
                    egui::vec2(18.0, 18.0),
                );
                egui::Spinner::new().color(theme::TEXT_MUTED).paint_at(ui, spinner_rect);
                ui.painter().text(
                    draw_rect.center() + egui::vec2(10.0, 0.0),
                    egui::Align2::CENTER_CENTER,
                    "Analyzing...",
                    egui::FontId::proportional(theme::FONT_HEADING + 2.0),
                    theme::BTN_DISABLED_TEXT,
                );
            } else {
                let color = if enabled { egui::Color32::WHITE } else { theme::BTN_DISABLED_TEXT };
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}  Generate Magic", egui_phosphor::regular::SPARKLE),
                    egui::FontId::proportional(theme::FONT_HEADING + 2.0),
                    color,
                );
            }

            if enabled && response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if response.clicked() {
                self.start_generation(ctx);
            }

            if loading {
                let cancel = ui.add_sized(
                    [cancel_w - 8.0, theme::BUTTON_HEIGHT_LARGE],
                    theme::button_danger(format!("{}  Cancel", egui_phosphor::regular::X)),
                );
                if cancel.clicked() {
                    self.cancel_generation();
                }
            }
        });
    }

    // ========================================================================
    // RESULTS PANE
    // ========================================================================

    pub(crate) fn render_results_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(theme::SPACING_XXL + 8.0);
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Results")
                        .size(theme::FONT_TITLE + 4.0)
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                )
                .selectable(false),
            );
            if self.session.result_is_stale() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    icon_label(
                        ui,
                        egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE,
                        "From an earlier request",
                        theme::STATUS_WARNING,
                        theme::FONT_SMALL,
                    );
                });
            }
        });
        ui.add_space(theme::SPACING_LG);

        let now = Instant::now();
        let copied = self.session.copied(now);
        if let Some(remaining) = self.session.copied_remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        let Some(result) = self.session.result().cloned() else {
            self.render_results_placeholder(ui, ctx);
            return;
        };

        let mut copy_request: Option<(CopyTarget, String)> = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.set_width(ui.available_width() - theme::SPACING_MD);
                if let Some(request) = render_result_cards(ui, &result, copied) {
                    copy_request = Some(request);
                }
                ui.add_space(theme::SPACING_XXL);
            });

        if let Some((target, text)) = copy_request {
            self.copy_to_clipboard(target, &text);
        }
    }

    fn render_results_placeholder(&self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let height = (ui.available_height() - theme::SPACING_XXL).max(200.0);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width() - theme::SPACING_MD, height),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, theme::RADIUS_XL, theme::with_alpha(theme::BG_ELEVATED, 60));
        dashed_outline(&painter, rect.shrink(1.0), egui::Stroke::new(theme::STROKE_THICK, theme::BORDER_SUBTLE));

        if self.session.phase() == RequestPhase::Loading {
            let t = ctx.input(|i| i.time) as f32;
            let alpha = (0.55 + 0.45 * (t * 3.0).sin()) * 255.0;
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Thinking...",
                egui::FontId::proportional(theme::FONT_HEADING),
                theme::with_alpha(theme::ACCENT, alpha as u8),
            );
            ctx.request_repaint();
        } else {
            painter.text(
                rect.center() - egui::vec2(0.0, 20.0),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::PLAY_CIRCLE,
                egui::FontId::proportional(48.0),
                theme::with_alpha(theme::TEXT_FAINT, 110),
            );
            painter.text(
                rect.center() + egui::vec2(0.0, 26.0),
                egui::Align2::CENTER_CENTER,
                "Results will appear here",
                egui::FontId::proportional(theme::FONT_BODY),
                theme::TEXT_FAINT,
            );
        }
    }

    /// Write to the clipboard and flag `target` for the copied window
    pub(crate) fn copy_to_clipboard(&mut self, target: CopyTarget, text: &str) {
        match self.clipboard.copy_text(text) {
            Ok(()) => self.session.mark_copied(target, Instant::now()),
            Err(e) => {
                warn!(error = %e, ?target, "Copy failed");
                self.show_toast(format!("{}  {}", egui_phosphor::regular::WARNING, e));
            }
        }
    }
}

fn paint_preview(painter: &egui::Painter, area: egui::Rect, preview: &Preview) {
    match preview {
        Preview::Image { texture } => {
            let [w, h] = texture.size();
            let scale = (area.width() / w.max(1) as f32).min(area.height() / h.max(1) as f32);
            let size = egui::vec2(w as f32 * scale, h as f32 * scale);
            let dest = egui::Rect::from_center_size(area.center(), size);
            painter.image(
                texture.id(),
                dest,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        Preview::Video { name, mime, size } => {
            painter.rect_filled(area, theme::RADIUS_LARGE, egui::Color32::BLACK);
            painter.text(
                area.center() - egui::vec2(0.0, 24.0),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::FILM_STRIP,
                egui::FontId::proportional(44.0),
                theme::ACCENT,
            );
            painter.text(
                area.center() + egui::vec2(0.0, 20.0),
                egui::Align2::CENTER_CENTER,
                name,
                egui::FontId::proportional(theme::FONT_BODY),
                theme::TEXT_SECONDARY,
            );
            painter.text(
                area.center() + egui::vec2(0.0, 42.0),
                egui::Align2::CENTER_CENTER,
                format!("{}  ·  {}", mime, format_bytes(*size)),
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::TEXT_DIM,
            );
        }
        Preview::Unavailable { name, reason } => {
            painter.text(
                area.center() - egui::vec2(0.0, 12.0),
                egui::Align2::CENTER_CENTER,
                format!("{}  {}", egui_phosphor::regular::IMAGE_BROKEN, name),
                egui::FontId::proportional(theme::FONT_BODY),
                theme::TEXT_SECONDARY,
            );
            painter.text(
                area.center() + egui::vec2(0.0, 14.0),
                egui::Align2::CENTER_CENTER,
                format!("No preview: {reason}"),
                egui::FontId::proportional(theme::FONT_SMALL),
                theme::TEXT_DIM,
            );
        }
    }
}

/// One card per caption, labelled by position, then the hashtag strip.
/// Returns what the user asked to copy this frame.
fn render_result_cards(
    ui: &mut egui::Ui,
    result: &GenerationResult,
    copied: Option<CopyTarget>,
) -> Option<(CopyTarget, String)> {
    let mut copy_request = None;

    for (index, caption) in result.captions.iter().enumerate() {
        let style = caption_style(index);
        let target = CopyTarget::Caption(index);
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                icon_label(
                    ui,
                    style.icon,
                    &style.name.to_uppercase(),
                    style.color,
                    theme::FONT_SMALL + 1.0,
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if copy_button(ui, copied == Some(target)).clicked() {
                        copy_request = Some((target, caption.clone()));
                    }
                });
            });
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(caption)
                        .size(theme::FONT_BODY + 2.0)
                        .color(theme::TEXT_SECONDARY),
                )
                .wrap()
                .selectable(true),
            );
        });
        ui.add_space(theme::SPACING_LG);
    }

    theme::hashtag_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(&result.hashtags)
                        .monospace()
                        .size(theme::FONT_LABEL + 1.0)
                        .color(theme::ACCENT),
                )
                .wrap()
                .selectable(true),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                if copy_button(ui, copied == Some(CopyTarget::Hashtags)).clicked() {
                    copy_request = Some((CopyTarget::Hashtags, result.hashtags.clone()));
                }
            });
        });
    });

    copy_request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GenerationResult {
        GenerationResult {
            captions: vec!["a".into(), "b".into(), "c".into()],
            hashtags: "#x #y".into(),
        }
    }

    /// Run one headless frame and collect the text of every painted label
    fn painted_text(result: &GenerationResult, copied: Option<CopyTarget>) -> Vec<String> {
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                render_result_cards(ui, result, copied);
            });
        });
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                egui::Shape::Text(text) => Some(text.galley.job.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn renders_one_card_per_caption_in_order_with_legend() {
        let texts = painted_text(&sample(), None);
        let pos = |needle: &str| {
            texts
                .iter()
                .position(|t| t == needle || t.ends_with(&format!("  {needle}")))
                .unwrap_or_else(|| panic!("{needle:?} not painted in {texts:?}"))
        };

        let social = pos("VIRAL SOCIAL");
        let a = pos("a");
        let professional = pos("PROFESSIONAL");
        let b = pos("b");
        let artistic = pos("ARTISTIC");
        let c = pos("c");
        let tags = pos("#x #y");
        assert!(social < a && a < professional && professional < b);
        assert!(b < artistic && artistic < c && c < tags);
        assert!(!texts.iter().any(|t| t.ends_with("VARIATION")));
    }

    #[test]
    fn fourth_caption_uses_fallback_label() {
        let mut result = sample();
        result.captions.push("d".into());
        let texts = painted_text(&result, None);
        assert!(texts.iter().any(|t| t.ends_with("VARIATION")));
    }

    #[test]
    fn copied_card_shows_check_only_on_that_card() {
        let texts = painted_text(&sample(), Some(CopyTarget::Caption(1)));
        let checks = texts
            .iter()
            .filter(|t| t.as_str() == egui_phosphor::regular::CHECK)
            .count();
        let copies = texts
            .iter()
            .filter(|t| t.as_str() == egui_phosphor::regular::COPY)
            .count();
        assert_eq!(checks, 1);
        // Two other captions plus the hashtag strip
        assert_eq!(copies, 3);
    }
}
