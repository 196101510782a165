//! Preview of the selected file.
//!
//! At most one preview texture is alive: `PreviewSlot::replace` drops the
//! previous handle (which frees its texture) before the new one is shown.

use crate::constants::PREVIEW_MAX_SIDE;
use crate::media::SelectedFile;
use crate::types::MediaKind;
use eframe::egui;
use tracing::{debug, warn};

pub enum Preview {
    Image {
        texture: egui::TextureHandle,
    },
    Video {
        name: String,
        mime: String,
        size: u64,
    },
    Unavailable {
        name: String,
        reason: String,
    },
}

impl Preview {
    pub fn build(ctx: &egui::Context, file: &SelectedFile) -> Self {
        match file.kind {
            MediaKind::Video => Preview::Video {
                name: file.name.clone(),
                mime: file.mime.clone(),
                size: file.size(),
            },
            MediaKind::Image => match decode_image(&file.bytes) {
                Ok(image) => {
                    debug!(name = %file.name, size = ?image.size, "Preview decoded");
                    Preview::Image {
                        texture: ctx.load_texture(
                            "selected_preview",
                            image,
                            egui::TextureOptions::LINEAR,
                        ),
                    }
                }
                Err(e) => {
                    warn!(name = %file.name, error = %e, "Could not decode preview");
                    Preview::Unavailable {
                        name: file.name.clone(),
                        reason: e.to_string(),
                    }
                }
            },
        }
    }
}

fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > PREVIEW_MAX_SIDE || img.height() > PREVIEW_MAX_SIDE {
        img = img.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE);
    }
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw()))
}

#[derive(Default)]
pub struct PreviewSlot {
    current: Option<Preview>,
}

impl PreviewSlot {
    pub fn current(&self) -> Option<&Preview> {
        self.current.as_ref()
    }

    pub fn replace(&mut self, ctx: &egui::Context, file: &SelectedFile) {
        // Release the old texture before allocating the new one
        self.current = None;
        self.current = Some(Preview::build(ctx, file));
    }
}
