//! Selectable portrait-retouch backend models.

use serde::Serialize;

/// A backend model the generator can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitModelConfig {
    pub id: &'static str,
    pub label: &'static str,
    pub provider: &'static str,
    #[serde(rename = "default")]
    pub is_default: bool,
    pub supports_image_to_image: bool,
    pub supports_multiple_outputs: bool,
    pub default_max_images: Option<u32>,
    /// Provider-specific defaults as `(key, value)` pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [(&'static str, &'static str)]>,
}

pub const PORTRAIT_MODEL_CONFIGS: &[PortraitModelConfig] = &[
    PortraitModelConfig {
        id: "google/nano-banana",
        label: "Nano Banana AI",
        provider: "replicate",
        is_default: true,
        supports_image_to_image: true,
        supports_multiple_outputs: false,
        default_max_images: None,
        options: None,
    },
    PortraitModelConfig {
        id: "bytedance/seedream-4",
        label: "Seedream 4.0",
        provider: "replicate",
        is_default: false,
        supports_image_to_image: true,
        supports_multiple_outputs: true,
        default_max_images: Some(4),
        options: None,
    },
];

/// Find a model by id.
pub fn find_model(id: &str) -> Option<&'static PortraitModelConfig> {
    PORTRAIT_MODEL_CONFIGS.iter().find(|m| m.id == id)
}

/// The model marked default, or the first entry if none is marked.
pub fn default_model() -> Option<&'static PortraitModelConfig> {
    PORTRAIT_MODEL_CONFIGS
        .iter()
        .find(|m| m.is_default)
        .or_else(|| PORTRAIT_MODEL_CONFIGS.first())
}

/// The requested model when it exists, otherwise the default.
pub fn resolve_model(id: Option<&str>) -> Option<&'static PortraitModelConfig> {
    id.and_then(find_model).or_else(default_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_default() {
        let defaults = PORTRAIT_MODEL_CONFIGS.iter().filter(|m| m.is_default).count();
        assert_eq!(defaults, 1);
        assert_eq!(default_model().unwrap().id, "google/nano-banana");
    }

    #[test]
    fn resolve_prefers_requested_model() {
        let model = resolve_model(Some("bytedance/seedream-4")).unwrap();
        assert_eq!(model.default_max_images, Some(4));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(resolve_model(Some("unknown/model")).unwrap().id, "google/nano-banana");
        assert_eq!(resolve_model(None).unwrap().id, "google/nano-banana");
    }

    #[test]
    fn options_are_serialized_only_when_present() {
        let plain = serde_json::to_value(PORTRAIT_MODEL_CONFIGS[0]).unwrap();
        assert!(plain.get("options").is_none());
        assert_eq!(plain["default"], true);

        let tuned = PortraitModelConfig {
            options: Some(&[("aspect_ratio", "match_input_image")]),
            ..PORTRAIT_MODEL_CONFIGS[1]
        };
        let value = serde_json::to_value(tuned).unwrap();
        assert_eq!(
            value["options"],
            serde_json::json!([["aspect_ratio", "match_input_image"]])
        );
    }
}
