/// Detect media type from image data using magic numbers
///
/// Falls back to `image/jpeg` for anything unrecognized.
pub fn detect_media_type(data: &[u8]) -> &'static str {
    if data.len() < 4 {
        return "image/jpeg";
    }

    // JPEG: FF D8 FF
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        return "image/png";
    }

    // GIF: 47 49 46
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return "image/gif";
    }

    // WebP: RIFF ... WEBP
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    "image/jpeg"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_media_type_jpeg() {
        assert_eq!(detect_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_media_type_png() {
        assert_eq!(detect_media_type(&[0x89, 0x50, 0x4E, 0x47]), "image/png");
    }

    #[test]
    fn test_detect_media_type_gif() {
        assert_eq!(detect_media_type(b"GIF89a"), "image/gif");
    }

    #[test]
    fn test_detect_media_type_webp() {
        assert_eq!(detect_media_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_detect_media_type_defaults_to_jpeg() {
        assert_eq!(detect_media_type(b"no"), "image/jpeg");
        assert_eq!(detect_media_type(b"plain text"), "image/jpeg");
    }
}
