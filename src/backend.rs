//! Request and response bodies for the persistence backend, plus the
//! save flow with its local-download fallback.
//!
//! The engine does no networking itself. A host implements [`Backend`]
//! over whatever transport it has and [`LocalDownload`] over its file
//! or browser download facility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::Editor;
use crate::error::EngineError;
use crate::util::time::download_filename;

/// Message reported when the backend could not be reached.
pub const NETWORK_ERROR: &str = "network error";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Response(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Body of `POST /save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// PNG data URL of the flattened drawing.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
}

impl SaveResponse {
    pub fn network_error() -> Self {
        Self {
            success: false,
            message: Some(NETWORK_ERROR.to_owned()),
            ..Self::default()
        }
    }
}

/// Body of `GET /gallery`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GalleryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GalleryResponse {
    pub fn network_error() -> Self {
        Self {
            success: false,
            images: Vec::new(),
            message: Some(NETWORK_ERROR.to_owned()),
        }
    }
}

/// Body of `POST /filter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub image: String,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FilterResponse {
    pub fn network_error() -> Self {
        Self {
            success: false,
            filtered_image: None,
            message: Some(NETWORK_ERROR.to_owned()),
        }
    }
}

/// Body of `POST /enhance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceRequest {
    pub image: String,
    pub enhancement: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhanceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnhanceResponse {
    pub fn network_error() -> Self {
        Self {
            success: false,
            message: Some(NETWORK_ERROR.to_owned()),
        }
    }
}

/// Retrieval URL for a file the backend holds.
pub fn download_url(filename: &str) -> String {
    format!("/download/{filename}")
}

/// Transport to the persistence backend.
pub trait Backend {
    fn save(&mut self, request: &SaveRequest) -> Result<SaveResponse, BackendError>;
    fn gallery(&mut self) -> Result<GalleryResponse, BackendError>;
    fn filter(&mut self, request: &FilterRequest) -> Result<FilterResponse, BackendError>;
    fn enhance(&mut self, request: &EnhanceRequest) -> Result<EnhanceResponse, BackendError>;
}

/// Client-side download that works without the backend.
pub trait LocalDownload {
    fn download(&mut self, filename: &str, png: &[u8]) -> Result<(), BackendError>;
}

/// Save the flattened drawing.
///
/// The local download always happens first, so the drawing survives an
/// unreachable backend. Backend failures come back as an unsuccessful
/// [`SaveResponse`] rather than an error.
pub fn save_drawing(
    editor: &mut Editor,
    backend: &mut impl Backend,
    local: &mut impl LocalDownload,
    filename: Option<String>,
) -> Result<SaveResponse, BackendError> {
    let png = editor.export_png()?;
    let filename = filename.unwrap_or_else(download_filename);
    local.download(&filename, &png)?;

    let request = SaveRequest {
        image: crate::file_handler::png_data_url(&png),
        filename: Some(filename),
    };
    match backend.save(&request) {
        Ok(response) => {
            log::info!("Saved drawing: {:?}", response.message);
            Ok(response)
        }
        Err(err) => {
            log::warn!("Save failed, kept local copy only: {err}");
            Ok(SaveResponse::network_error())
        }
    }
}

/// Gallery listing; an unreachable backend yields an empty, failed listing.
pub fn fetch_gallery(backend: &mut impl Backend) -> GalleryResponse {
    backend.gallery().unwrap_or_else(|err| {
        log::warn!("Gallery unavailable: {err}");
        GalleryResponse::network_error()
    })
}

/// Run a backend filter over the flattened drawing.
///
/// A successful result is inserted into the active layer as an image
/// object, through the same path as a pasted image.
pub fn apply_filter(
    editor: &mut Editor,
    backend: &mut impl Backend,
    filter: &str,
) -> Result<FilterResponse, BackendError> {
    let request = FilterRequest {
        image: editor.export_data_url()?,
        filter: filter.to_owned(),
    };
    let response = match backend.filter(&request) {
        Ok(response) => response,
        Err(err) => {
            log::warn!("Filter {filter} failed: {err}");
            return Ok(FilterResponse::network_error());
        }
    };
    if response.success {
        if let Some(url) = &response.filtered_image {
            editor.insert_image_data_url(url)?;
            log::info!("Applied filter {filter}");
        }
    }
    Ok(response)
}

/// Ask the backend to enhance the flattened drawing.
pub fn enhance_image(
    editor: &mut Editor,
    backend: &mut impl Backend,
    enhancement: &str,
) -> Result<EnhanceResponse, BackendError> {
    let request = EnhanceRequest {
        image: editor.export_data_url()?,
        enhancement: enhancement.to_owned(),
    };
    Ok(backend.enhance(&request).unwrap_or_else(|err| {
        log::warn!("Enhance {enhancement} failed: {err}");
        EnhanceResponse::network_error()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::file_handler::{encode_png, png_data_url};
    use crate::raster::{fill_solid, new_surface};
    use egui::Color32;

    /// Backend that never answers.
    struct Offline;

    impl Backend for Offline {
        fn save(&mut self, _request: &SaveRequest) -> Result<SaveResponse, BackendError> {
            Err(BackendError::Network("connection refused".to_owned()))
        }

        fn gallery(&mut self) -> Result<GalleryResponse, BackendError> {
            Err(BackendError::Network("connection refused".to_owned()))
        }

        fn filter(&mut self, _request: &FilterRequest) -> Result<FilterResponse, BackendError> {
            Err(BackendError::Network("connection refused".to_owned()))
        }

        fn enhance(&mut self, _request: &EnhanceRequest) -> Result<EnhanceResponse, BackendError> {
            Err(BackendError::Network("connection refused".to_owned()))
        }
    }

    /// Backend whose filter answers with a fixed image.
    struct FilterServer {
        filtered: String,
        seen: Vec<String>,
    }

    impl Backend for FilterServer {
        fn save(&mut self, _request: &SaveRequest) -> Result<SaveResponse, BackendError> {
            Ok(SaveResponse::default())
        }

        fn gallery(&mut self) -> Result<GalleryResponse, BackendError> {
            Ok(GalleryResponse::default())
        }

        fn filter(&mut self, request: &FilterRequest) -> Result<FilterResponse, BackendError> {
            self.seen.push(request.filter.clone());
            Ok(FilterResponse {
                success: true,
                filtered_image: Some(self.filtered.clone()),
                message: None,
            })
        }

        fn enhance(&mut self, _request: &EnhanceRequest) -> Result<EnhanceResponse, BackendError> {
            Ok(EnhanceResponse::default())
        }
    }

    #[derive(Default)]
    struct Downloads(Vec<(String, usize)>);

    impl LocalDownload for Downloads {
        fn download(&mut self, filename: &str, png: &[u8]) -> Result<(), BackendError> {
            self.0.push((filename.to_owned(), png.len()));
            Ok(())
        }
    }

    fn editor() -> Editor {
        Editor::with_seed(EngineConfig::default(), 5).unwrap()
    }

    #[test]
    fn offline_save_keeps_local_copy() {
        let mut editor = editor();
        let mut downloads = Downloads::default();
        let response =
            save_drawing(&mut editor, &mut Offline, &mut downloads, Some("a.png".to_owned()))
                .unwrap();
        assert_eq!(response, SaveResponse::network_error());
        assert_eq!(downloads.0.len(), 1);
        assert_eq!(downloads.0[0].0, "a.png");
        assert!(downloads.0[0].1 > 0);
    }

    #[test]
    fn offline_gallery_filter_and_enhance_report_network_error() {
        let mut editor = editor();
        let gallery = fetch_gallery(&mut Offline);
        assert!(!gallery.success);
        assert_eq!(gallery.message.as_deref(), Some(NETWORK_ERROR));

        let filtered = apply_filter(&mut editor, &mut Offline, "grayscale").unwrap();
        assert_eq!(filtered, FilterResponse::network_error());
        assert!(editor.layers().active().unwrap().objects().is_empty());

        let enhanced = enhance_image(&mut editor, &mut Offline, "auto").unwrap();
        assert_eq!(enhanced, EnhanceResponse::network_error());
    }

    #[test]
    fn filter_result_becomes_an_image_object() {
        let mut editor = editor();
        let mut bitmap = new_surface(8, 8, 1.0).unwrap();
        fill_solid(&mut bitmap, Color32::GRAY);
        let mut server = FilterServer {
            filtered: png_data_url(&encode_png(&bitmap).unwrap()),
            seen: Vec::new(),
        };

        let response = apply_filter(&mut editor, &mut server, "grayscale").unwrap();
        assert!(response.success);
        assert_eq!(server.seen, vec!["grayscale".to_owned()]);
        let layer = editor.layers().active().unwrap();
        assert_eq!(layer.objects().len(), 1);
        assert_eq!(layer.history().len(), 2);
    }

    #[test]
    fn save_response_parses_backend_json() {
        let json = r#"{
            "success": true,
            "message": "Drawing saved successfully!",
            "filename": "a.png",
            "filepath": "/download/a.png"
        }"#;
        let response: SaveResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.filepath.as_deref(), Some("/download/a.png"));
    }

    #[test]
    fn network_error_shape() {
        let response = SaveResponse::network_error();
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"success":false,"message":"network error"}"#
        );
    }

    #[test]
    fn filter_request_field_names() {
        let request = FilterRequest {
            image: "data:image/png;base64,AA==".to_owned(),
            filter: "grayscale".to_owned(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["filter"], "grayscale");
    }

    #[test]
    fn download_url_prefix() {
        assert_eq!(download_url("x.png"), "/download/x.png");
    }
}
