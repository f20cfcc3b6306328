//! The fixed parameter set sent with every submission.
//!
//! The backend treats these as an opaque pass-through into its pipeline
//! (recognition, translation, dubbing, subtitle merge); this crate only
//! needs to serialize them next to the source path. One set is built at
//! startup and applied uniformly to every job in the batch.

use serde::Serialize;

/// Pipeline parameters for a translation job.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateParams {
    /// Speech-recognition engine index.
    pub recogn_type: i32,
    /// Subtitle split strategy (`overall` or `avg`).
    pub split_type: String,
    /// Whisper model name.
    pub model_name: String,
    pub detect_language: String,
    /// Translation engine index.
    pub translate_type: i32,
    pub source_language: String,
    pub target_language: String,
    /// TTS engine index.
    pub tts_type: i32,
    pub voice_role: String,
    pub voice_rate: String,
    pub volume: String,
    pub pitch: String,
    /// Speed dubbing up to fit the original timing.
    pub voice_autorate: bool,
    /// Slow video down to fit the dubbing.
    pub video_autorate: bool,
    /// Separate vocals from background audio first.
    pub is_separate: bool,
    /// Optional background audio track to mix back in.
    pub back_audio: String,
    /// Subtitle embedding mode (1 = hard subtitles).
    pub subtitle_type: i32,
    /// Append the translated video after the original.
    pub append_video: bool,
    pub is_cuda: bool,
}

impl Default for TranslateParams {
    fn default() -> Self {
        Self {
            recogn_type: 0,
            split_type: "overall".to_string(),
            model_name: "tiny".to_string(),
            detect_language: "auto".to_string(),
            translate_type: 0,
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            tts_type: 0,
            voice_role: "zh-CN-YunjianNeural".to_string(),
            voice_rate: "+0%".to_string(),
            volume: "+0%".to_string(),
            pitch: "+0Hz".to_string(),
            voice_autorate: true,
            video_autorate: true,
            is_separate: false,
            back_audio: String::new(),
            subtitle_type: 1,
            append_video: false,
            is_cuda: false,
        }
    }
}

impl TranslateParams {
    /// Override the translation target language.
    pub fn with_target_language(mut self, lang: impl Into<String>) -> Self {
        self.target_language = lang.into();
        self
    }

    /// Override the whisper model.
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Override the TTS voice.
    pub fn with_voice_role(mut self, role: impl Into<String>) -> Self {
        self.voice_role = role.into();
        self
    }
}
