use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Order of the three colour channels inside a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "rgb"),
            Self::Bgr => write!(f, "bgr"),
        }
    }
}

/// A decoded image: row-major, three 8-bit channels per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        order: ChannelOrder,
        pixels: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(FrameError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            order,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns the frame with its channels laid out in `order`.
    ///
    /// RGB and BGR differ only in the first and last channel, so the
    /// conversion is a swap in place.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for px in self.pixels.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            self.order = order;
        }
        self
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }
}

/// Axis-aligned box around a recognized fragment, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One piece of text reported by the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounding_box,
        }
    }
}

/// How recognized fragments are ordered before they are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingOrder {
    /// Keep the engine's detection order.
    #[default]
    Detection,
    /// Group fragments into rows, top to bottom, each row left to right.
    Lines,
}

/// How a stored upload is named on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UploadNaming {
    /// A fresh UUID plus the client's extension.
    #[default]
    ServerAssigned,
    /// The client's filename reduced to its last path component.
    /// Same-named uploads overwrite each other.
    ClientFilename,
}
