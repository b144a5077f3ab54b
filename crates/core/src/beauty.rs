//! Beauty-option prompt catalog for the portrait-retouch editor.
//!
//! Each option is a predefined natural-language editing instruction; the
//! selected prompts are combined into the generation request by
//! [`crate::prompt`].

use serde::Serialize;

use crate::error::CoreError;

/// One selectable editing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeautyPromptOption {
    pub id: &'static str,
    pub prompt: &'static str,
}

/// A category key and its options.
pub type BeautyCategory = (&'static str, &'static [BeautyPromptOption]);

const fn opt(id: &'static str, prompt: &'static str) -> BeautyPromptOption {
    BeautyPromptOption { id, prompt }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub const GENERAL: &str = "general";
pub const FACE_SHAPE: &str = "face_shape";
pub const SKIN: &str = "skin";
pub const EYES: &str = "eyes";
pub const NOSE: &str = "nose";
pub const MOUTH_TEETH: &str = "mouth_teeth";
pub const HAIR: &str = "hair";
pub const ARTIFACTS_REMOVAL: &str = "artifacts_removal";

pub const BEAUTY_PROMPT_CATALOG: &[BeautyCategory] = &[
    (
        GENERAL,
        &[
            opt(
                "blurred_background",
                "blur the background while keeping the person sharp and in focus, create shallow depth of field, natural lens bokeh effect",
            ),
            opt(
                "lighting_supplement",
                "apply smart fill light on the face, softly brighten shadows, keep highlight detail, natural skin tone, realistic studio portrait lighting",
            ),
        ],
    ),
    (
        FACE_SHAPE,
        &[
            opt(
                "face_slimming",
                "subtly slim cheeks and jawline, keep facial features recognizable, maintain natural proportions, avoid background distortion",
            ),
            opt(
                "double_chin_remover",
                "reduce double chin, smooth jawline and neck area, keep natural skin texture and realistic contours",
            ),
            opt(
                "body_edit",
                "subtle body reshaping, slightly slim waist and limbs, maintain realistic body proportions, avoid warping background",
            ),
        ],
    ),
    (
        SKIN,
        &[
            opt(
                "soft_skin",
                "soft skin smoothing on face, reduce pores and minor texture, keep natural skin details, avoid plastic or over-processed look",
            ),
            opt(
                "wrinkles_remover",
                "reduce facial wrinkles and fine lines, especially around eyes and forehead, keep natural expression and realistic skin texture",
            ),
            opt(
                "remove_acne",
                "remove acne, pimples, dark spots and blemishes on the skin, even tone while keeping pores and natural texture",
            ),
            opt(
                "brighten_skin",
                "slightly brighten skin tone overall, even complexion, keep realistic color and avoid over-whitened unnatural look",
            ),
            opt(
                "reduce_oily",
                "reduce oily shine on forehead, nose and cheeks, soft matte finish while preserving natural skin highlights",
            ),
        ],
    ),
    (
        EYES,
        &[
            opt(
                "open_eyes",
                "subtly correct half-closed or sleepy eyes to look naturally open, preserve eye shape and identity, realistic result",
            ),
            opt(
                "remove_dark_circles",
                "lighten dark circles under the eyes, smooth under-eye area, keep natural shadows and realistic skin texture",
            ),
            opt(
                "remove_red_eyes",
                "remove red-eye effect from pupils, natural dark iris and pupil color, keep reflection highlights",
            ),
            opt(
                "eye_refinement",
                "enhance eyes with subtle sharpening, increase iris clarity and contrast, slightly brighten whites of the eyes, maintain natural look",
            ),
        ],
    ),
    (
        NOSE,
        &[opt(
            "nose_retouching",
            "refine nose shape slightly, smooth harsh shadows, enhance highlight on nose bridge, keep natural structure and proportions",
        )],
    ),
    (
        MOUTH_TEETH,
        &[
            opt(
                "mouth_grooming",
                "refine shape of lips, smooth lip texture, enhance natural color, correct minor asymmetry while preserving expression",
            ),
            opt(
                "fix_teeth",
                "whiten and clean teeth slightly, remove yellow tint and stains, fix small gaps or chips, maintain realistic tooth texture",
            ),
        ],
    ),
    (
        HAIR,
        &[
            opt(
                "soft_hair",
                "smooth frizzy hair, reduce flyaways, create soft and neat hair strands, keep natural volume and direction",
            ),
            opt(
                "enhanced_hair_luster",
                "increase hair shine, add subtle highlight reflection, rich and healthy hair appearance, avoid metallic or fake glow",
            ),
        ],
    ),
    (
        ARTIFACTS_REMOVAL,
        &[
            opt(
                "remove_glasses_glare",
                "remove glare and reflections on eyeglass lenses, keep frame shape and eye details clearly visible",
            ),
            opt(
                "remove_tattoo",
                "remove visible tattoos on skin, reconstruct natural skin color and texture where tattoo was",
            ),
        ],
    ),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// All category keys, in catalog order.
pub fn categories() -> impl Iterator<Item = &'static str> {
    BEAUTY_PROMPT_CATALOG.iter().map(|(key, _)| *key)
}

/// Options of one category; empty for unknown keys.
pub fn options_for(category: &str) -> &'static [BeautyPromptOption] {
    BEAUTY_PROMPT_CATALOG
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, options)| *options)
        .unwrap_or(&[])
}

/// Find an option by category key and option id.
pub fn find_option(category: &str, id: &str) -> Result<BeautyPromptOption, CoreError> {
    options_for(category)
        .iter()
        .find(|o| o.id == id)
        .copied()
        .ok_or_else(|| CoreError::NotFound {
            entity: "beauty option",
            key: format!("{category}:{id}"),
        })
}

// ---------------------------------------------------------------------------
// Display grouping
// ---------------------------------------------------------------------------

/// An option as shown in the editor, remembering its source category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupedOption {
    pub category: &'static str,
    pub option: BeautyPromptOption,
}

/// A display group of the editor's option panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayGroup {
    pub key: &'static str,
    pub options: Vec<GroupedOption>,
}

/// Groups in editor order. Eyes, nose and mouth options share the `eyes`
/// group; each option still toggles under its own category.
pub fn display_groups() -> Vec<DisplayGroup> {
    let grouped = |keys: &[&'static str]| -> Vec<GroupedOption> {
        keys.iter()
            .flat_map(|&category| {
                options_for(category)
                    .iter()
                    .map(move |&option| GroupedOption { category, option })
            })
            .collect()
    };

    [
        (GENERAL, grouped(&[GENERAL])),
        (FACE_SHAPE, grouped(&[FACE_SHAPE])),
        (SKIN, grouped(&[SKIN])),
        (EYES, grouped(&[EYES, NOSE, MOUTH_TEETH])),
        (HAIR, grouped(&[HAIR])),
        (ARTIFACTS_REMOVAL, grouped(&[ARTIFACTS_REMOVAL])),
    ]
    .into_iter()
    .filter(|(_, options)| !options.is_empty())
    .map(|(key, options)| DisplayGroup { key, options })
    .collect()
}
