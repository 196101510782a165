//! Reusable UI components
//!
//! Standalone painted widgets shared by the upload and results panes.

use crate::theme;
use eframe::egui;

/// Dashed outline around `rect`
pub fn dashed_outline(painter: &egui::Painter, rect: egui::Rect, stroke: egui::Stroke) {
    let points = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(egui::Shape::dashed_line(&points, stroke, 8.0, 6.0));
}

/// Small square icon button. Shows a green check while `copied` is set.
pub fn copy_button(ui: &mut egui::Ui, copied: bool) -> egui::Response {
    let size = 28.0;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());

    if ui.is_rect_visible(rect) {
        let (fill, draw_rect) = theme::button_visual(&response, theme::BG_SURFACE, rect);
        if response.hovered() {
            ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
        }
        let (icon, color) = if copied {
            (egui_phosphor::regular::CHECK, theme::STATUS_SUCCESS)
        } else if response.hovered() {
            (egui_phosphor::regular::COPY, theme::TEXT_PRIMARY)
        } else {
            (egui_phosphor::regular::COPY, theme::TEXT_DIM)
        };
        ui.painter().text(
            draw_rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(17.0),
            color,
        );
    }

    response.on_hover_text(if copied { "Copied!" } else { "Copy to clipboard" })
}

/// Close "X" used in modal title bars
pub fn close_button(ui: &mut egui::Ui) -> egui::Response {
    let close_size = 24.0;
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(close_size, close_size), egui::Sense::click());
    let close_color = if response.hovered() {
        ui.painter().rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
        theme::STATUS_ERROR
    } else {
        theme::TEXT_DIM
    };
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        egui_phosphor::regular::X,
        egui::FontId::proportional(16.0),
        close_color,
    );
    response
}

/// Icon followed by text, as one non-selectable label
pub fn icon_label(ui: &mut egui::Ui, icon: &str, text: &str, color: egui::Color32, size: f32) {
    ui.add(
        egui::Label::new(egui::RichText::new(format!("{icon}  {text}")).size(size).color(color))
            .selectable(false),
    );
}
