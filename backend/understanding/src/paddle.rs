//! PaddleOCR (PP-OCRv5 mobile) engine backed by `ocr-rs`.
//!
//! One detection model is shared by every language; each language brings its
//! own recognition model and charset file. All three are loaded once at
//! startup.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use image::{DynamicImage, RgbImage};
use ocr_rs::OcrEngine;
use parking_lot::Mutex;
use tracing::{debug, info};

use textlens_core::{BoundingBox, ChannelOrder, Frame, TextFragment, TextRecognizer};

use crate::error::OcrError;

const DETECTION_MODEL: &str = "PP-OCRv5_mobile_det.mnn";

/// Recognition model + charset for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageModel {
    pub id: &'static str,
    pub rec_model: &'static str,
    pub charset: &'static str,
}

const LANGUAGES: &[LanguageModel] = &[
    LanguageModel {
        id: "english",
        rec_model: "en_PP-OCRv5_mobile_rec_infer.mnn",
        charset: "ppocr_keys_en.txt",
    },
    LanguageModel {
        id: "latin",
        rec_model: "latin_PP-OCRv5_mobile_rec_infer.mnn",
        charset: "ppocr_keys_latin.txt",
    },
    LanguageModel {
        id: "chinese",
        rec_model: "PP-OCRv5_mobile_rec.mnn",
        charset: "ppocr_keys_v5.txt",
    },
    LanguageModel {
        id: "korean",
        rec_model: "korean_PP-OCRv5_mobile_rec_infer.mnn",
        charset: "ppocr_keys_korean.txt",
    },
    LanguageModel {
        id: "cyrillic",
        rec_model: "cyrillic_PP-OCRv5_mobile_rec_infer.mnn",
        charset: "ppocr_keys_cyrillic.txt",
    },
];

/// Where to find the models and which language to recognize.
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    pub models_dir: PathBuf,
    pub language: String,
}

impl OcrModelConfig {
    pub fn new(models_dir: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            language: language.into(),
        }
    }

    /// Resolve (detection, recognition, charset) paths, checking that each
    /// file exists. There is no fallback language.
    pub fn model_paths(&self) -> Result<(PathBuf, PathBuf, PathBuf), OcrError> {
        let lang = LANGUAGES
            .iter()
            .find(|l| l.id == self.language)
            .ok_or_else(|| {
                OcrError::Models(format!(
                    "unknown OCR language '{}' (known: {})",
                    self.language,
                    LANGUAGES.iter().map(|l| l.id).collect::<Vec<_>>().join(", ")
                ))
            })?;

        let paths = (
            self.models_dir.join(DETECTION_MODEL),
            self.models_dir.join(lang.rec_model),
            self.models_dir.join(lang.charset),
        );
        for path in [&paths.0, &paths.1, &paths.2] {
            if !path.exists() {
                let installed = available_languages(&self.models_dir)
                    .iter()
                    .map(|l| l.id)
                    .collect::<Vec<_>>();
                return Err(OcrError::Models(format!(
                    "missing model file {} (installed languages: {})",
                    path.display(),
                    if installed.is_empty() { "none".to_string() } else { installed.join(", ") }
                )));
            }
        }
        Ok(paths)
    }
}

/// Languages whose recognition model and charset are both present in
/// `models_dir`.
pub fn available_languages(models_dir: &Path) -> Vec<LanguageModel> {
    LANGUAGES
        .iter()
        .filter(|l| models_dir.join(l.rec_model).exists() && models_dir.join(l.charset).exists())
        .copied()
        .collect()
}

/// `TextRecognizer` over an `ocr-rs` engine.
///
/// The inference session is not documented as safe for concurrent calls, so
/// requests take turns on a mutex.
pub struct PaddleOcrEngine {
    engine: Mutex<OcrEngine>,
    language: String,
}

impl PaddleOcrEngine {
    /// Load the models. Fails if any file is missing or unreadable.
    pub fn load(config: &OcrModelConfig) -> Result<Self, OcrError> {
        let (det, rec, charset) = config.model_paths()?;
        info!(
            det = %det.display(),
            rec = %rec.display(),
            language = %config.language,
            "Loading OCR models"
        );
        let engine = OcrEngine::new(&det, &rec, &charset, None)
            .map_err(|e| OcrError::Models(format!("failed to create OCR engine: {e}")))?;
        Ok(Self {
            engine: Mutex::new(engine),
            language: config.language.clone(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl TextRecognizer for PaddleOcrEngine {
    fn name(&self) -> &str {
        "paddle-ocr"
    }

    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }

    fn recognize(&self, frame: &Frame) -> Result<Vec<TextFragment>> {
        let (width, height) = (frame.width(), frame.height());
        let pixels = match frame.order() {
            ChannelOrder::Rgb => frame.pixels().to_vec(),
            ChannelOrder::Bgr => frame.clone().into_order(ChannelOrder::Rgb).into_pixels(),
        };
        let rgb = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("pixel buffer does not match {width}x{height}"))?;
        let img = DynamicImage::ImageRgb8(rgb);

        let raw = self
            .engine
            .lock()
            .recognize(&img)
            .map_err(|e| anyhow!("{e}"))?;
        debug!(boxes = raw.len(), "OCR pass complete");

        Ok(raw
            .into_iter()
            .map(|r| TextFragment {
                text: r.text,
                confidence: r.confidence,
                bounding_box: BoundingBox {
                    x: r.bbox.rect.left(),
                    y: r.bbox.rect.top(),
                    width: r.bbox.rect.width() as u32,
                    height: r.bbox.rect.height() as u32,
                },
            })
            .collect())
    }
}
