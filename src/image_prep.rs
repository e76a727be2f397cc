//! 送信前の画像処理
//!
//! ブラウザの撮影画像と同じく JPEG 品質90 に揃える。

use crate::error::{FoodScanError, Result};
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;

pub const JPEG_QUALITY: u8 = 90;

/// 送信する画像データ
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// 画像を読み込み、必要ならJPEGに再エンコードする
pub fn prepare(path: &Path, raw: bool) -> Result<PreparedImage> {
    if !path.is_file() {
        return Err(FoodScanError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| food_scan_common::CAPTURE_FILE_NAME.to_string());

    if raw {
        let bytes = std::fs::read(path)?;
        return Ok(PreparedImage {
            mime: food_scan_common::share::mime_type_for(&file_name),
            file_name,
            bytes,
        });
    }

    let img = image::open(path)
        .map_err(|e| FoodScanError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let bytes = encode_jpeg(&img)?;

    Ok(PreparedImage {
        file_name: jpeg_name(&file_name),
        mime: "image/jpeg",
        bytes,
    })
}

pub fn encode_jpeg(img: &image::DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    // JPEGはアルファを持てない
    let rgb = img.to_rgb8();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| FoodScanError::ImageLoad(e.to_string()))?;
    Ok(buf)
}

/// 拡張子を `.jpg` に差し替える
fn jpeg_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "capture".to_string());
    format!("{}.jpg", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_jpeg_name() {
        assert_eq!(jpeg_name("label.png"), "label.jpg");
        assert_eq!(jpeg_name("photo.JPEG"), "photo.jpg");
        assert_eq!(jpeg_name("noext"), "noext.jpg");
    }

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("label.png");
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 128]));
        DynamicImage::ImageRgba8(img).save(&path).expect("PNG保存失敗");

        let prepared = prepare(&path, false).expect("準備失敗");
        assert_eq!(prepared.file_name, "label.jpg");
        assert_eq!(prepared.mime, "image/jpeg");
        // JPEG SOI マーカー
        assert_eq!(&prepared.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_raw_keeps_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shot.png");
        std::fs::write(&path, b"not really a png").expect("書き込み失敗");

        let prepared = prepare(&path, true).expect("準備失敗");
        assert_eq!(prepared.file_name, "shot.png");
        assert_eq!(prepared.mime, "image/png");
        assert_eq!(prepared.bytes, b"not really a png");
    }

    #[test]
    fn test_missing_file() {
        let result = prepare(Path::new("/nonexistent/label.jpg"), false);
        assert!(matches!(result, Err(FoodScanError::FileNotFound(_))));
    }
}
