//! App module - contains the main application state and logic

mod generate;
mod intake;
mod modals;
mod preview;
mod session;
mod views;

use preview::PreviewSlot;
use session::Session;

use crate::client::CaptionClient;
use crate::clipboard::ClipboardWriter;
use crate::settings::Settings;
use crate::theme;
use crate::types::Language;
use eframe::egui;
use generate::Completion;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) session: Session,
    pub(crate) preview: PreviewSlot,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Caption server
    pub(crate) client: Option<Arc<CaptionClient>>,
    /// Endpoint as stored in settings
    pub(crate) endpoint: String,
    /// Endpoint requests target: the environment override if set, else `endpoint`
    pub(crate) effective_endpoint: String,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) inbox: Arc<Mutex<Vec<Completion>>>,
    pub(crate) cancel_token: Option<CancellationToken>,
    pub(crate) clipboard: ClipboardWriter,
    // Settings modal
    pub(crate) show_settings: bool,
    pub(crate) settings_endpoint_draft: String,
    pub(crate) settings_timeout_draft: String,
    pub(crate) settings_language_draft: Language,
    pub(crate) settings_error: Option<String>,
    pub(crate) default_language: Language,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    // Window geometry
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;
        let effective_endpoint = settings.effective_endpoint();
        let client = Self::build_client(&effective_endpoint, settings.request_timeout());

        Ok(Self {
            session: Session::new(settings.language),
            preview: PreviewSlot::default(),
            logo_texture: None,
            client,
            endpoint: settings.endpoint.clone(),
            effective_endpoint,
            request_timeout_secs: settings.request_timeout_secs,
            runtime,
            inbox: Arc::new(Mutex::new(Vec::new())),
            cancel_token: None,
            clipboard: ClipboardWriter::default(),
            show_settings: false,
            settings_endpoint_draft: String::new(),
            settings_timeout_draft: String::new(),
            settings_language_draft: settings.language,
            settings_error: None,
            default_language: settings.language,
            toast_message: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        })
    }

    fn build_client(endpoint: &str, timeout: Option<std::time::Duration>) -> Option<Arc<CaptionClient>> {
        match CaptionClient::new(endpoint, timeout) {
            Ok(client) => {
                info!(endpoint = %client.endpoint(), ?timeout, "Caption client ready");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Caption client unavailable");
                None
            }
        }
    }

    pub fn current_settings(&self) -> Settings {
        Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            endpoint: self.endpoint.clone(),
            request_timeout_secs: self.request_timeout_secs,
            language: self.default_language,
        }
    }

    pub fn save_settings(&self) {
        self.current_settings().save(&self.data_dir);
    }

    /// Apply endpoint/timeout from the settings modal and rebuild the HTTP
    /// client. The environment override stays in effect unless the user
    /// changed the endpoint field.
    pub fn apply_server_settings(&mut self, endpoint: String, timeout_secs: Option<u64>) {
        self.effective_endpoint = next_effective_endpoint(&self.effective_endpoint, &self.endpoint, &endpoint);
        self.endpoint = endpoint;
        self.request_timeout_secs = timeout_secs;
        let timeout = self.current_settings().request_timeout();
        self.client = Self::build_client(&self.effective_endpoint, timeout);
        self.save_settings();
    }

    /// Address requests currently go to
    pub fn active_endpoint(&self) -> String {
        self.client
            .as_ref()
            .map(|c| c.endpoint().to_string())
            .unwrap_or_else(|| self.effective_endpoint.clone())
    }

    /// True while a modal owns input
    pub fn modal_open(&self) -> bool {
        self.show_settings || self.session.alert().is_some()
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}

/// Endpoint to target after the stored endpoint changes from `stored` to
/// `edited`. An unchanged field keeps whatever is in effect (possibly the
/// environment override).
fn next_effective_endpoint(effective: &str, stored: &str, edited: &str) -> String {
    if edited.trim() == stored.trim() {
        effective.to_string()
    } else {
        edited.to_string()
    }
}
