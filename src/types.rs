//! Common types and data structures

use serde::{Deserialize, Serialize};

/// Target language for generated captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ur,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ur, Language::Es];

    /// Code sent in the `language` form field
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ur => "ur",
            Language::Es => "es",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ur => "Urdu",
            Language::Es => "Spanish",
        }
    }
}

/// How a selected file is previewed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Success body returned by the caption server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResult {
    pub captions: Vec<String>,
    pub hashtags: String,
}

/// Request lifecycle as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Something on the results pane that can be copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Caption(usize),
    Hashtags,
}

/// Presentation label for a caption, picked by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionStyle {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: egui::Color32,
}

pub const CAPTION_STYLES: [CaptionStyle; 3] = [
    CaptionStyle {
        name: "Viral Social",
        icon: egui_phosphor::regular::INSTAGRAM_LOGO,
        color: crate::theme::STYLE_SOCIAL,
    },
    CaptionStyle {
        name: "Professional",
        icon: egui_phosphor::regular::BRIEFCASE,
        color: crate::theme::STYLE_PROFESSIONAL,
    },
    CaptionStyle {
        name: "Artistic",
        icon: egui_phosphor::regular::PALETTE,
        color: crate::theme::STYLE_ARTISTIC,
    },
];

pub const FALLBACK_STYLE: CaptionStyle = CaptionStyle {
    name: "Variation",
    icon: egui_phosphor::regular::BRIEFCASE,
    color: crate::theme::TEXT_MUTED,
};

/// Style for the caption at `index`; positions past the legend get the fallback
pub fn caption_style(index: usize) -> CaptionStyle {
    CAPTION_STYLES.get(index).copied().unwrap_or(FALLBACK_STYLE)
}
