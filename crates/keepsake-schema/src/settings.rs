// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customization settings reader.
//!
//! Every setting must load: a value of the wrong shape falls back to its
//! default with a warning and numbers are clamped into range. Catalogue
//! tokens stay strict, an unknown token rejects the record.

use keepsake_core::EntityKind;
use keepsake_core::model::{CustomizationSettings, LiveCharacterState};
use serde_json::Value;

use crate::Schema;
use crate::reader::{FromRecord, RecordReader};

fn string_or(r: &mut RecordReader<'_>, key: &str, default: String) -> String {
    r.lenient(key, default, "a string", |v| v.as_str().map(str::to_owned))
}

fn bool_or(r: &mut RecordReader<'_>, key: &str, default: bool) -> bool {
    r.lenient(key, default, "a boolean", Value::as_bool)
}

fn number_or(r: &mut RecordReader<'_>, key: &str, default: f64) -> f64 {
    r.lenient(key, default, "a number", Value::as_f64)
}

impl FromRecord for LiveCharacterState {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let url = r.required_str("url");
        let x = r.required_f64("x");
        let y = r.required_f64("y");
        let scale = r.required_f64("scale");
        Some(Self {
            url: url?,
            x: x?,
            y: y?,
            scale: scale?,
        })
    }
}

impl FromRecord for CustomizationSettings {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let d = CustomizationSettings::default();
        let mut settings = CustomizationSettings {
            theme: r.catalogue_or("theme", d.theme),
            accent_light: string_or(r, "accentLight", d.accent_light),
            accent_dark: string_or(r, "accentDark", d.accent_dark),
            language: string_or(r, "language", d.language),
            model: r.catalogue_or("model", d.model),
            background_type: r.catalogue_or("backgroundType", d.background_type),
            background_color1: string_or(r, "backgroundColor1", d.background_color1),
            background_color2: string_or(r, "backgroundColor2", d.background_color2),
            background_image_url: string_or(r, "backgroundImageUrl", d.background_image_url),
            background_video_url: string_or(r, "backgroundVideoUrl", d.background_video_url),
            background_blur: number_or(r, "backgroundBlur", d.background_blur),
            show_nsfw_wallpapers: bool_or(r, "showNsfwWallpapers", d.show_nsfw_wallpapers),
            show_adult_wallpapers: bool_or(r, "showAdultWallpapers", d.show_adult_wallpapers),
            font_family: string_or(r, "fontFamily", d.font_family),
            font_size: number_or(r, "fontSize", d.font_size),
            line_height: number_or(r, "lineHeight", d.line_height),
            letter_spacing: number_or(r, "letterSpacing", d.letter_spacing),
            chats_width: number_or(r, "chatsWidth", d.chats_width),
            prompt_width: number_or(r, "promptWidth", d.prompt_width),
            chat_full_width: bool_or(r, "chatFullWidth", d.chat_full_width),
            sync_prompt_width: bool_or(r, "syncPromptWidth", d.sync_prompt_width),
            show_user_bubble: bool_or(r, "showUserBubble", d.show_user_bubble),
            show_gpt_bubble: bool_or(r, "showGptBubble", d.show_gpt_bubble),
            scroll_down_button_align: r
                .catalogue_or("scrollDownButtonAlign", d.scroll_down_button_align),
            animation_intensity: r.catalogue_or("animationIntensity", d.animation_intensity),
            is_nsfw_mode_enabled: bool_or(r, "isNsfwModeEnabled", d.is_nsfw_mode_enabled),
            disable_all_animations: bool_or(r, "disableAllAnimations", d.disable_all_animations),
            colorful_icons: bool_or(r, "colorfulIcons", d.colorful_icons),
            global_blur: number_or(r, "globalBlur", d.global_blur),
            aurora_color1: string_or(r, "auroraColor1", d.aurora_color1),
            aurora_color2: string_or(r, "auroraColor2", d.aurora_color2),
            aurora_speed: number_or(r, "auroraSpeed", d.aurora_speed),
            gradient_angle: number_or(r, "gradientAngle", d.gradient_angle),
            bg_overlay_color: string_or(r, "bgOverlayColor", d.bg_overlay_color),
            bg_overlay_opacity: number_or(r, "bgOverlayOpacity", d.bg_overlay_opacity),
            bg_brightness: number_or(r, "bgBrightness", d.bg_brightness),
            bg_contrast: number_or(r, "bgContrast", d.bg_contrast),
            bg_saturation: number_or(r, "bgSaturation", d.bg_saturation),
            video_playback_speed: number_or(r, "videoPlaybackSpeed", d.video_playback_speed),
            video_muted: bool_or(r, "videoMuted", d.video_muted),
            live_character: r.isolated("liveCharacter"),
            active_ai_model: r.catalogue_or("activeAiModel", d.active_ai_model),
            live_talk_voice: r.lenient("liveTalkVoice", None, "a string", |v| {
                v.as_str().map(|s| Some(s.to_owned()))
            }),
        };

        for warning in settings.clamp_in_place() {
            r.push_warning(warning);
        }
        Some(settings)
    }
}

impl Schema for CustomizationSettings {
    const KIND: EntityKind = EntityKind::CustomizationSettings;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;
    use keepsake_core::catalog::{BackgroundType, Theme};
    use serde_json::json;

    #[test]
    fn empty_record_is_all_defaults() {
        let validated = validate::<CustomizationSettings>(&json!({})).unwrap();
        assert_eq!(validated.value, CustomizationSettings::default());
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn background_blur_is_clamped() {
        let high = validate::<CustomizationSettings>(&json!({"backgroundBlur": 999})).unwrap();
        assert_eq!(high.value.background_blur, 20.0);
        assert_eq!(high.warnings[0].field, "backgroundBlur");

        let low = validate::<CustomizationSettings>(&json!({"backgroundBlur": -5})).unwrap();
        assert_eq!(low.value.background_blur, 0.0);
    }

    #[test]
    fn wrong_shape_falls_back_to_default() {
        let validated = validate::<CustomizationSettings>(&json!({
            "fontSize": "huge", "videoMuted": 0, "theme": "light"
        }))
        .unwrap();
        assert_eq!(validated.value.font_size, 16.0);
        assert!(validated.value.video_muted);
        assert_eq!(validated.value.theme, Theme::Light);
        assert_eq!(validated.warnings.len(), 2);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let failure = validate::<CustomizationSettings>(&json!({"theme": "neon"})).unwrap_err();
        assert!(failure.violations[0].is_catalogue());
    }

    #[test]
    fn broken_live_character_is_dropped() {
        let validated = validate::<CustomizationSettings>(&json!({
            "backgroundType": "video",
            "liveCharacter": {"url": "https://cdn.test/char.webm", "x": 10}
        }))
        .unwrap();
        assert_eq!(validated.value.background_type, BackgroundType::Video);
        assert!(validated.value.live_character.is_none());
        assert_eq!(validated.warnings[0].field, "liveCharacter");
    }

    #[test]
    fn live_character_scale_is_clamped() {
        let validated = validate::<CustomizationSettings>(&json!({
            "liveCharacter": {"url": "u", "x": 0, "y": 0, "scale": 0.01}
        }))
        .unwrap();
        assert_eq!(validated.value.live_character.unwrap().scale, 0.1);
        assert_eq!(validated.warnings[0].field, "liveCharacter.scale");
    }
}
