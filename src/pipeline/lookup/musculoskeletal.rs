//! Curated musculoskeletal body-part classifications.
//!
//! Merged into the expanded table after the CSV source, so on a key
//! collision these entries win.

use crate::models::Classification;

// Alphabetical by body part; 8995 is unassigned.
pub const ANKLE: i64 = 8991;
pub const ELBOW: i64 = 8992;
pub const FOOT: i64 = 8993;
pub const HAND: i64 = 8994;
pub const HIP: i64 = 8996;
pub const KNEE: i64 = 8997;
pub const MID_LOWER_BACK: i64 = 8998;
pub const NECK_UPPER_BACK: i64 = 8999;
pub const SHOULDER: i64 = 9000;
pub const WRIST: i64 = 9001;

const ANKLE_NAME: &str = "Musculoskeletal - Ankle";
const ELBOW_NAME: &str = "Musculoskeletal - Elbow";
const FOOT_NAME: &str = "Musculoskeletal - Foot";
const HAND_NAME: &str = "Musculoskeletal - Hand";
const HIP_NAME: &str = "Musculoskeletal - Hip";
const KNEE_NAME: &str = "Musculoskeletal - Knee";
const MID_LOWER_BACK_NAME: &str = "Musculoskeletal - Mid/Lower Back (Thoracolumbar Spine)";
const NECK_UPPER_BACK_NAME: &str = "Musculoskeletal - Neck/Upper Back (Cervical Spine)";
const SHOULDER_NAME: &str = "Musculoskeletal - Shoulder";
const WRIST_NAME: &str = "Musculoskeletal - Wrist";

/// Body-part phrase → (code, name). Multi-word phrases match as word-sets.
const BODY_PARTS: &[(&str, i64, &str)] = &[
    ("ankle", ANKLE, ANKLE_NAME),
    ("ankles", ANKLE, ANKLE_NAME),
    ("achilles", ANKLE, ANKLE_NAME),
    ("elbow", ELBOW, ELBOW_NAME),
    ("elbows", ELBOW, ELBOW_NAME),
    ("foot", FOOT, FOOT_NAME),
    ("feet", FOOT, FOOT_NAME),
    ("heel", FOOT, FOOT_NAME),
    ("plantar fasciitis", FOOT, FOOT_NAME),
    ("hand", HAND, HAND_NAME),
    ("hands", HAND, HAND_NAME),
    ("finger", HAND, HAND_NAME),
    ("fingers", HAND, HAND_NAME),
    ("thumb", HAND, HAND_NAME),
    ("hip", HIP, HIP_NAME),
    ("hips", HIP, HIP_NAME),
    ("knee", KNEE, KNEE_NAME),
    ("knees", KNEE, KNEE_NAME),
    ("meniscus", KNEE, KNEE_NAME),
    ("back", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("low back", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("lower back", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("mid back", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("lumbar spine", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("thoracolumbar spine", MID_LOWER_BACK, MID_LOWER_BACK_NAME),
    ("neck", NECK_UPPER_BACK, NECK_UPPER_BACK_NAME),
    ("upper back", NECK_UPPER_BACK, NECK_UPPER_BACK_NAME),
    ("cervical spine", NECK_UPPER_BACK, NECK_UPPER_BACK_NAME),
    ("shoulder", SHOULDER, SHOULDER_NAME),
    ("shoulders", SHOULDER, SHOULDER_NAME),
    ("rotator cuff", SHOULDER, SHOULDER_NAME),
    ("wrist", WRIST, WRIST_NAME),
    ("wrists", WRIST, WRIST_NAME),
    ("carpal tunnel", WRIST, WRIST_NAME),
];

/// Curated overrides in declaration order.
pub fn overrides() -> impl Iterator<Item = (&'static str, Classification)> {
    BODY_PARTS
        .iter()
        .map(|&(phrase, code, name)| (phrase, Classification::new(code, name)))
}
