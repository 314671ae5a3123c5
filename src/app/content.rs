use crate::app::config::Config;
use crate::app::error::EncodingError;
use crate::app::models::FileContent;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

/// Bytes fed to the statistical detector.
const ENCODING_SAMPLE_BYTES: usize = 4096;
/// A NUL byte within this prefix marks the file as binary.
const BINARY_SNIFF_BYTES: usize = 8000;

/// Reads one included file: binary extensions and oversized files are
/// replaced by a note and never read.
pub fn read_content(path: &Path, config: &Config) -> FileContent {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    if config.is_binary_name(&name) {
        return FileContent::Binary;
    }

    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) => return FileContent::Unreadable(err.to_string()),
    };
    let size_kb = size as f64 / 1024.0;
    if size_kb > config.max_file_size_kb as f64 {
        return FileContent::TooLarge {
            size_kb,
            limit_kb: config.max_file_size_kb,
        };
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return FileContent::Unreadable(err.to_string()),
    };

    match decode(&bytes) {
        Ok(Some(text)) => FileContent::Text(text),
        Ok(None) => FileContent::Binary,
        Err(err) => {
            log::warn!("Could not decode {}: {}", path.display(), err);
            FileContent::Unreadable(err.to_string())
        }
    }
}

/// Decodes `bytes` to text. `Ok(None)` means the bytes look binary.
pub fn decode(bytes: &[u8]) -> Result<Option<String>, EncodingError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]).map(Some);
    }

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_BYTES)];
    if sniff.contains(&0) {
        return Ok(None);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(Some(text.to_string()));
    }

    decode_with(detect_encoding(bytes), bytes).map(Some)
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_BYTES)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    let encoding = detector.guess(None, true);
    log::debug!("Detected encoding {}", encoding.name());
    encoding
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, EncodingError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}
