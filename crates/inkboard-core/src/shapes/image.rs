//! Image element: a placed box with an opaque payload.
//!
//! The core never decodes pixels. The payload is either a reference string
//! (URL, asset key) or embedded bytes kept as base64 so records stay plain JSON.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Encoding of embedded image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Sniff the format from leading magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Where the pixels of an image live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImagePayload {
    /// External reference resolved by the host.
    Reference { src: String },
    /// Bytes stored inline.
    #[serde(rename_all = "camelCase")]
    Embedded {
        format: Option<ImageFormat>,
        data_base64: String,
    },
}

impl ImagePayload {
    /// Embed raw bytes, detecting the format when possible.
    pub fn embed(data: &[u8]) -> Self {
        ImagePayload::Embedded {
            format: ImageFormat::from_magic_bytes(data),
            data_base64: STANDARD.encode(data),
        }
    }

    /// Decoded bytes of an embedded payload. `None` for references or
    /// invalid base64.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        match self {
            ImagePayload::Embedded { data_base64, .. } => STANDARD.decode(data_base64).ok(),
            ImagePayload::Reference { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default = "Uuid::new_v4")]
    pub(crate) id: ShapeId,
    /// Top-left corner.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub payload: ImagePayload,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Image {
    pub fn new(position: Point, width: f64, height: f64, payload: ImagePayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            payload,
            style: ShapeStyle::default(),
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn set_control_points(&mut self, points: &[Point]) {
        if let [position] = points {
            self.position = *position;
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
