//! Decoding of inline audio and image payloads

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use hoken_types::{AiError, Result};
use image::ImageFormat;

/// Sample rate used by the speech model when the MIME type does not say
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

const BITS_PER_SAMPLE: u16 = 16;
const CHANNELS: u16 = 1;

/// Mono 16-bit PCM speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl SpeechAudio {
    /// Decode base64 little-endian PCM. `mime_type` may carry `rate=NNNN`.
    pub fn from_base64_pcm(data: &str, mime_type: &str) -> std::result::Result<Self, AiError> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| AiError::Decode(e.to_string()))?;
        if bytes.len() % 2 != 0 {
            return Err(AiError::Decode(format!(
                "PCM payload has odd length {}",
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self {
            sample_rate: sample_rate_from_mime(mime_type).unwrap_or(DEFAULT_SAMPLE_RATE),
            samples,
        })
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// RIFF/WAVE container around the samples
    pub fn to_wav_bytes(&self) -> std::result::Result<Vec<u8>, AiError> {
        let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
        let byte_rate = self.sample_rate * block_align as u32;
        let data_len = wav_data_len(self.samples.len())?;

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&CHANNELS.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in &self.samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        Ok(out)
    }

    pub fn write_wav(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_wav_bytes()?)?;
        Ok(())
    }
}

/// Byte length of the data chunk; the RIFF size field (data + 36) is a u32
fn wav_data_len(samples: usize) -> std::result::Result<u32, AiError> {
    samples
        .checked_mul(2)
        .and_then(|len| u32::try_from(len).ok())
        .filter(|len| len.checked_add(36).is_some())
        .ok_or_else(|| AiError::Decode(format!("{} samples do not fit in a WAV file", samples)))
}

fn sample_rate_from_mime(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse().ok())
}

/// Image bytes returned by the image model
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl GeneratedImage {
    pub fn from_base64(data: &str, mime_type: &str) -> std::result::Result<Self, AiError> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| AiError::Decode(e.to_string()))?;
        let format = image::guess_format(&bytes).map_err(|e| AiError::Decode(e.to_string()))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
            format,
        })
    }

    /// File extension matching the detected format
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }

    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let img = image::load_from_memory_with_format(&self.bytes, self.format)?;
        Ok((img.width(), img.height()))
    }

    /// Write the raw bytes; the format is unchanged
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn encode_pcm(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_decode_pcm_little_endian() {
        let audio = SpeechAudio::from_base64_pcm(&encode_pcm(&[1, -2, 300]), "audio/L16").unwrap();
        assert_eq!(audio.samples, vec![1, -2, 300]);
        assert_eq!(audio.sample_rate, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_sample_rate_from_mime() {
        let audio =
            SpeechAudio::from_base64_pcm(&encode_pcm(&[0; 16_000]), "audio/L16;codec=pcm;rate=16000")
                .unwrap();
        assert_eq!(audio.sample_rate, 16_000);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_odd_length_is_rejected() {
        let data = STANDARD.encode([1u8, 2, 3]);
        assert!(matches!(
            SpeechAudio::from_base64_pcm(&data, "audio/L16"),
            Err(AiError::Decode(_))
        ));
        assert!(SpeechAudio::from_base64_pcm("***", "audio/L16").is_err());
    }

    #[test]
    fn test_wav_data_len_limit() {
        assert_eq!(wav_data_len(4).unwrap(), 8);
        let max = (u32::MAX as usize - 36) / 2;
        assert!(wav_data_len(max).is_ok());
        assert!(matches!(wav_data_len(max + 1), Err(AiError::Decode(_))));
        assert!(wav_data_len(usize::MAX).is_err());
    }

    #[test]
    fn test_wav_header() {
        let audio = SpeechAudio {
            sample_rate: 24_000,
            samples: vec![0, 1, 2, 3],
        };
        let wav = audio.to_wav_bytes().unwrap();
        assert_eq!(wav.len(), 44 + 8);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 24_000);
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 8);

        let dir = tempdir().unwrap();
        let path = dir.path().join("lesson.wav");
        audio.write_wav(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), wav);
    }

    #[test]
    fn test_decode_png() {
        let img = image::RgbImage::new(4, 3);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let data = STANDARD.encode(buf.into_inner());

        let generated = GeneratedImage::from_base64(&data, "image/png").unwrap();
        assert_eq!(generated.format, ImageFormat::Png);
        assert_eq!(generated.extension(), "png");
        assert_eq!(generated.dimensions().unwrap(), (4, 3));
    }

    #[test]
    fn test_unknown_image_bytes_rejected() {
        let data = STANDARD.encode(b"definitely not an image");
        assert!(GeneratedImage::from_base64(&data, "image/png").is_err());
    }
}
