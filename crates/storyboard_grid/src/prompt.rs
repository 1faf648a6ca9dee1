//! Prompt text for grid and portrait requests.

use std::fmt::Write;
use storyboard_core::{AspectRatio, Segment, Story};

/// Which kind of story asset a portrait depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortraitKind {
    /// Vertical character portrait
    Character,
    /// Horizontal establishing shot
    Setting,
}

impl PortraitKind {
    /// Fixed aspect for the asset type.
    pub fn aspect_ratio(self) -> AspectRatio {
        match self {
            PortraitKind::Character => AspectRatio::Portrait,
            PortraitKind::Setting => AspectRatio::Landscape,
        }
    }

    fn framing(self) -> &'static str {
        match self {
            PortraitKind::Character => "vertical (portrait) character reference",
            PortraitKind::Setting => "horizontal (landscape) establishing shot",
        }
    }
}

/// Scene description for a segment, resolving its setting and characters.
pub fn build_scene_prompt(story: &Story, segment: &Segment) -> String {
    let mut prompt = format!("Scene: {}", segment.text());
    if !segment.key_visual_action().is_empty() {
        let _ = write!(prompt, "\nKey action: {}", segment.key_visual_action());
    }
    if !segment.time_of_day().is_empty() {
        let _ = write!(prompt, "\nTime of day: {}", segment.time_of_day());
    }
    if let Some(setting) = story.setting(segment.setting_id()) {
        let _ = write!(
            prompt,
            "\nSetting: {} - {}",
            setting.name(),
            setting.visual_prompt()
        );
    }
    for character in segment
        .character_ids()
        .iter()
        .filter_map(|id| story.character(id))
    {
        let _ = write!(
            prompt,
            "\nCharacter: {} - {}",
            character.name(),
            character.visual_prompt()
        );
    }
    prompt
}

/// Full grid prompt: scene, contact-sheet instruction, one line per frame, style.
///
/// # Examples
///
/// ```
/// use storyboard_grid::build_grid_prompt;
///
/// let variations: Vec<String> = (1..=9).map(|n| format!("angle {}", n)).collect();
/// let prompt = build_grid_prompt("A storm at sea", &variations, "oil painting");
/// assert!(prompt.contains("Frame 1: angle 1"));
/// assert!(prompt.contains("Frame 9: angle 9"));
/// assert!(prompt.contains("3x3"));
/// ```
pub fn build_grid_prompt(scene: &str, variations: &[String], style: &str) -> String {
    let mut prompt = String::from(scene);
    prompt.push_str(
        "\n\nCompose a single image laid out as a 3x3 contact sheet containing exactly nine \
         vertical (portrait) frames. The frames must be seamless, borderless, and edge-to-edge: \
         no gutters, no outlines, no captions, no frame numbers. Each frame fills its cell \
         completely and shows the same scene from the variation described below.\n",
    );
    for (position, variation) in variations.iter().enumerate() {
        let _ = write!(prompt, "\nFrame {}: {}", position + 1, variation);
    }
    if !style.is_empty() {
        let _ = write!(prompt, "\n\nStyle: {}", style);
    }
    prompt
}

/// Single-frame prompt for a character or setting portrait.
pub fn build_portrait_prompt(kind: PortraitKind, prompt: &str, style: &str) -> String {
    let mut text = format!(
        "{}\n\nCompose a single full-bleed {} image. One frame only: no grid, no panels, no text.",
        prompt,
        kind.framing()
    );
    if !style.is_empty() {
        let _ = write!(text, "\n\nStyle: {}", style);
    }
    text
}
