// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The customization settings bag.
//!
//! One flat record of independently defaulted display and behavior options.
//! It is loaded once and passed explicitly to whatever needs it. Numeric
//! fields have documented ranges; out-of-range values are clamped with a
//! warning, never rejected.

use serde::Serialize;

use crate::catalog::{AnimationIntensity, BackgroundType, ButtonAlign, ContentModel, ModelName, Theme};
use crate::violation::ValidationWarning;

/// Inclusive range of one numeric setting, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    /// Clamp in place, returning a warning when the value moved.
    pub fn clamp(&self, value: &mut f64) -> Option<ValidationWarning> {
        let clamped = if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        };
        if clamped == *value {
            return None;
        }
        let warning = ValidationWarning::new(
            self.field,
            format!(
                "value {value} outside {}..={} clamped to {clamped}",
                self.min, self.max
            ),
        );
        *value = clamped;
        Some(warning)
    }
}

/// Ranges in the same order as [`CustomizationSettings::numeric_slots_mut`].
pub const NUMERIC_RANGES: [NumericRange; 15] = [
    NumericRange::new("backgroundBlur", 0.0, 20.0),
    NumericRange::new("fontSize", 10.0, 32.0),
    NumericRange::new("lineHeight", 1.0, 3.0),
    NumericRange::new("letterSpacing", -2.0, 10.0),
    NumericRange::new("chatsWidth", 20.0, 160.0),
    NumericRange::new("promptWidth", 20.0, 160.0),
    NumericRange::new("globalBlur", 0.0, 20.0),
    NumericRange::new("auroraSpeed", 1.0, 120.0),
    NumericRange::new("gradientAngle", 0.0, 360.0),
    NumericRange::new("bgOverlayOpacity", 0.0, 1.0),
    NumericRange::new("bgBrightness", 50.0, 150.0),
    NumericRange::new("bgContrast", 50.0, 150.0),
    NumericRange::new("bgSaturation", 0.0, 200.0),
    NumericRange::new("videoPlaybackSpeed", 0.5, 2.0),
    NumericRange::new("liveCharacter.scale", 0.1, 5.0),
];

/// Look up the range of a numeric setting by wire name.
pub fn numeric_range(field: &str) -> Option<&'static NumericRange> {
    NUMERIC_RANGES.iter().find(|r| r.field == field)
}

/// Position of the floating live character overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveCharacterState {
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationSettings {
    // General
    pub theme: Theme,
    pub accent_light: String,
    pub accent_dark: String,
    pub language: String,

    // AI model
    pub model: ModelName,

    // Background
    pub background_type: BackgroundType,
    pub background_color1: String,
    pub background_color2: String,
    /// Base64 data URL or remote URL.
    pub background_image_url: String,
    pub background_video_url: String,
    pub background_blur: f64,
    pub show_nsfw_wallpapers: bool,
    pub show_adult_wallpapers: bool,

    // Typography
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
    pub letter_spacing: f64,

    // Layout (rem)
    pub chats_width: f64,
    pub prompt_width: f64,
    pub chat_full_width: bool,
    pub sync_prompt_width: bool,
    pub show_user_bubble: bool,
    pub show_gpt_bubble: bool,
    pub scroll_down_button_align: ButtonAlign,

    // Effects
    pub animation_intensity: AnimationIntensity,
    pub is_nsfw_mode_enabled: bool,
    pub disable_all_animations: bool,
    pub colorful_icons: bool,
    pub global_blur: f64,

    // Background effects
    pub aurora_color1: String,
    pub aurora_color2: String,
    /// Seconds per cycle.
    pub aurora_speed: f64,
    /// Degrees.
    pub gradient_angle: f64,
    pub bg_overlay_color: String,
    pub bg_overlay_opacity: f64,
    pub bg_brightness: f64,
    pub bg_contrast: f64,
    pub bg_saturation: f64,
    pub video_playback_speed: f64,
    pub video_muted: bool,

    pub live_character: Option<LiveCharacterState>,
    pub active_ai_model: ContentModel,
    pub live_talk_voice: Option<String>,
}

impl Default for CustomizationSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            accent_light: "#6366f1".into(),
            accent_dark: "#818cf8".into(),
            language: "en".into(),
            model: ModelName::Gemini25Flash,
            background_type: BackgroundType::Aurora,
            background_color1: "#0f172a".into(),
            background_color2: "#1e1b4b".into(),
            background_image_url: String::new(),
            background_video_url: String::new(),
            background_blur: 0.0,
            show_nsfw_wallpapers: false,
            show_adult_wallpapers: false,
            font_family: "Inter".into(),
            font_size: 16.0,
            line_height: 1.6,
            letter_spacing: 0.0,
            chats_width: 48.0,
            prompt_width: 48.0,
            chat_full_width: false,
            sync_prompt_width: true,
            show_user_bubble: true,
            show_gpt_bubble: true,
            scroll_down_button_align: ButtonAlign::Center,
            animation_intensity: AnimationIntensity::Default,
            is_nsfw_mode_enabled: false,
            disable_all_animations: false,
            colorful_icons: true,
            global_blur: 0.0,
            aurora_color1: "#4f46e5".into(),
            aurora_color2: "#db2777".into(),
            aurora_speed: 20.0,
            gradient_angle: 135.0,
            bg_overlay_color: "#000000".into(),
            bg_overlay_opacity: 0.0,
            bg_brightness: 100.0,
            bg_contrast: 100.0,
            bg_saturation: 100.0,
            video_playback_speed: 1.0,
            video_muted: true,
            live_character: None,
            active_ai_model: ContentModel::Safe,
            live_talk_voice: None,
        }
    }
}

impl CustomizationSettings {
    /// Mutable numeric fields in the order of [`NUMERIC_RANGES`], without
    /// the live character scale.
    pub fn numeric_slots_mut(&mut self) -> [&mut f64; 14] {
        [
            &mut self.background_blur,
            &mut self.font_size,
            &mut self.line_height,
            &mut self.letter_spacing,
            &mut self.chats_width,
            &mut self.prompt_width,
            &mut self.global_blur,
            &mut self.aurora_speed,
            &mut self.gradient_angle,
            &mut self.bg_overlay_opacity,
            &mut self.bg_brightness,
            &mut self.bg_contrast,
            &mut self.bg_saturation,
            &mut self.video_playback_speed,
        ]
    }

    /// Clamp every numeric field into its range.
    pub fn clamp_in_place(&mut self) -> Vec<ValidationWarning> {
        let [.., scale_range] = NUMERIC_RANGES;
        let mut warnings: Vec<ValidationWarning> = self
            .numeric_slots_mut()
            .into_iter()
            .zip(NUMERIC_RANGES.iter())
            .filter_map(|(slot, range)| range.clamp(slot))
            .collect();
        if let Some(live) = self.live_character.as_mut() {
            warnings.extend(scale_range.clamp(&mut live.scale));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_range() {
        let mut settings = CustomizationSettings::default();
        assert!(settings.clamp_in_place().is_empty());
    }

    #[test]
    fn background_blur_clamps_both_ways() {
        let mut settings = CustomizationSettings {
            background_blur: 999.0,
            ..Default::default()
        };
        let warnings = settings.clamp_in_place();
        assert_eq!(settings.background_blur, 20.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "backgroundBlur");

        settings.background_blur = -5.0;
        settings.clamp_in_place();
        assert_eq!(settings.background_blur, 0.0);
    }

    #[test]
    fn live_character_scale_clamps() {
        let mut settings = CustomizationSettings {
            live_character: Some(LiveCharacterState {
                url: "u".into(),
                x: 10.0,
                y: 10.0,
                scale: 9.0,
            }),
            ..Default::default()
        };
        let warnings = settings.clamp_in_place();
        assert_eq!(warnings[0].field, "liveCharacter.scale");
        assert_eq!(settings.live_character.unwrap().scale, 5.0);
    }

    #[test]
    fn nan_falls_to_minimum() {
        let range = numeric_range("bgBrightness").unwrap();
        let mut value = f64::NAN;
        assert!(range.clamp(&mut value).is_some());
        assert_eq!(value, 50.0);
    }

    #[test]
    fn wire_names_match_serialization() {
        let value = serde_json::to_value(CustomizationSettings::default()).unwrap();
        for range in &NUMERIC_RANGES[..14] {
            assert!(value.get(range.field).is_some(), "{} missing", range.field);
        }
        assert_eq!(value["model"], "gemini-2.5-flash");
        assert_eq!(value["backgroundColor1"], "#0f172a");
        assert!(value["liveCharacter"].is_null());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn wild() -> impl Strategy<Value = f64> {
            prop_oneof![
                -1.0e6..1.0e6,
                Just(f64::NAN),
                Just(f64::INFINITY),
                Just(f64::NEG_INFINITY),
            ]
        }

        proptest! {
            #[test]
            fn clamping_lands_in_range_and_is_stable(
                values in prop::collection::vec(wild(), 14),
                scale in wild(),
            ) {
                let mut settings = CustomizationSettings {
                    live_character: Some(LiveCharacterState {
                        url: "u".into(),
                        x: 0.0,
                        y: 0.0,
                        scale,
                    }),
                    ..Default::default()
                };
                for (slot, value) in settings.numeric_slots_mut().into_iter().zip(&values) {
                    *slot = *value;
                }

                settings.clamp_in_place();
                let ranges = NUMERIC_RANGES;
                for (slot, range) in settings.numeric_slots_mut().into_iter().zip(ranges.iter()) {
                    prop_assert!(*slot >= range.min && *slot <= range.max, "{} = {}", range.field, slot);
                }
                let scale_range = &NUMERIC_RANGES[14];
                let scale = settings.live_character.as_ref().map(|l| l.scale).unwrap_or_default();
                prop_assert!(scale >= scale_range.min && scale <= scale_range.max);
                prop_assert!(settings.clamp_in_place().is_empty());
            }
        }
    }
}
