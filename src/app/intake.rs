//! File picking and drag-and-drop

use super::App;
use crate::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::error::IntakeError;
use crate::media::SelectedFile;
use eframe::egui;
use tracing::{debug, warn};

impl App {
    /// Open the native file dialog. The filter is advisory; "All files" is offered too.
    pub fn pick_file(&mut self, ctx: &egui::Context) {
        let media: Vec<&str> = IMAGE_EXTENSIONS.iter().chain(VIDEO_EXTENSIONS).copied().collect();
        let picked = rfd::FileDialog::new()
            .set_title("Choose an image or video")
            .add_filter("Images & videos", &media[..])
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("Videos", VIDEO_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file();

        match picked {
            Some(path) => self.take_file(ctx, SelectedFile::from_path(&path)),
            None => debug!("File dialog dismissed"),
        }
    }

    /// Track drag hover and accept the first dropped file. Drops are
    /// ignored while a modal is open.
    pub fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let blocked = self.modal_open();
        let (hovering, dropped) = ctx.input(|i| drop_input(&i.raw, blocked));
        self.session.set_dragging(hovering);

        if let Some(file) = dropped {
            debug!(name = %file.name, path = ?file.path, "File dropped");
            self.take_file(ctx, SelectedFile::from_dropped(&file));
        }
    }

    fn take_file(&mut self, ctx: &egui::Context, file: Result<SelectedFile, IntakeError>) {
        match file {
            Ok(file) => self.accept_file(ctx, file),
            Err(e) => {
                warn!(error = %e, "Could not take file");
                self.show_toast(e.to_string());
            }
        }
    }

    /// Make `file` the current selection and rebuild the preview
    pub fn accept_file(&mut self, ctx: &egui::Context, file: SelectedFile) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.preview.replace(ctx, &file);
        self.session.select(file);
    }
}

/// Hover flag and first dropped file for this frame; nothing when `blocked`
fn drop_input(raw: &egui::RawInput, blocked: bool) -> (bool, Option<egui::DroppedFile>) {
    if blocked {
        return (false, None);
    }
    (!raw.hovered_files.is_empty(), raw.dropped_files.first().cloned())
}
