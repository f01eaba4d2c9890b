use serde::{Deserialize, Serialize};

use crate::shared::constants::{EYE_CASCADE_NAME, FACE_CASCADE_NAME, SMILE_CASCADE_NAME};

/// The pre-trained cascades this application knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    Face,
    Smile,
    Eye,
}

impl Classifier {
    pub fn file_name(self) -> &'static str {
        match self {
            Classifier::Face => FACE_CASCADE_NAME,
            Classifier::Smile => SMILE_CASCADE_NAME,
            Classifier::Eye => EYE_CASCADE_NAME,
        }
    }
}

impl std::fmt::Display for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classifier::Face => write!(f, "face"),
            Classifier::Smile => write!(f, "smile"),
            Classifier::Eye => write!(f, "eye"),
        }
    }
}

/// Which classifiers run on each frame and how their boxes are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMode {
    /// Every detected face.
    Face,
    /// Every detected smile, no face needed.
    Smile,
    /// Faces, plus eyes in the upper half of the last face.
    EyesInFace,
    /// Faces, plus smiles in the lower half of the last face.
    FaceAndSmile,
}

impl DetectionMode {
    pub const ALL: &[DetectionMode] = &[
        DetectionMode::Face,
        DetectionMode::Smile,
        DetectionMode::EyesInFace,
        DetectionMode::FaceAndSmile,
    ];

    /// Classifiers that must be loaded before the camera starts.
    pub fn required_classifiers(self) -> &'static [Classifier] {
        match self {
            DetectionMode::Face => &[Classifier::Face],
            DetectionMode::Smile => &[Classifier::Smile],
            DetectionMode::EyesInFace => &[Classifier::Face, Classifier::Eye],
            DetectionMode::FaceAndSmile => &[Classifier::Face, Classifier::Smile],
        }
    }

    pub fn runs(self, classifier: Classifier) -> bool {
        self.required_classifiers().contains(&classifier)
    }

    /// Smiles are only kept when they fall inside the last face.
    pub fn smiles_need_face(self) -> bool {
        self == DetectionMode::FaceAndSmile
    }

    /// Stable identifier used in settings files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMode::Face => "face",
            DetectionMode::Smile => "smile",
            DetectionMode::EyesInFace => "eyes-in-face",
            DetectionMode::FaceAndSmile => "face-and-smile",
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMode::Face => write!(f, "Face"),
            DetectionMode::Smile => write!(f, "Smile"),
            DetectionMode::EyesInFace => write!(f, "Eyes in face"),
            DetectionMode::FaceAndSmile => write!(f, "Face and smile"),
        }
    }
}

impl std::str::FromStr for DetectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectionMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                format!("Mode must be one of: face, smile, eyes-in-face, face-and-smile, got '{s}'")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::face(DetectionMode::Face, &[Classifier::Face])]
    #[case::smile(DetectionMode::Smile, &[Classifier::Smile])]
    #[case::eyes(DetectionMode::EyesInFace, &[Classifier::Face, Classifier::Eye])]
    #[case::both(DetectionMode::FaceAndSmile, &[Classifier::Face, Classifier::Smile])]
    fn test_required_classifiers(#[case] mode: DetectionMode, #[case] expected: &[Classifier]) {
        assert_eq!(mode.required_classifiers(), expected);
    }

    #[test]
    fn test_smile_only_mode_does_not_run_face() {
        assert!(!DetectionMode::Smile.runs(Classifier::Face));
        assert!(DetectionMode::Smile.runs(Classifier::Smile));
    }

    #[test]
    fn test_only_face_and_smile_filters_smiles() {
        assert!(DetectionMode::FaceAndSmile.smiles_need_face());
        assert!(!DetectionMode::Smile.smiles_need_face());
    }

    #[test]
    fn test_cascade_file_names() {
        assert_eq!(
            Classifier::Face.file_name(),
            "haarcascade_frontalface_alt2.xml"
        );
        assert_eq!(Classifier::Smile.file_name(), "haarcascade_smile.xml");
        assert_eq!(Classifier::Eye.file_name(), "haarcascade_eye.xml");
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DetectionMode::EyesInFace).unwrap();
        assert_eq!(json, "\"eyes-in-face\"");
        let parsed: DetectionMode = serde_json::from_str("\"face-and-smile\"").unwrap();
        assert_eq!(parsed, DetectionMode::FaceAndSmile);
    }

    #[test]
    fn test_from_str_matches_as_str() {
        for &mode in DetectionMode::ALL {
            assert_eq!(mode.as_str().parse::<DetectionMode>().unwrap(), mode);
        }
        assert!("blink".parse::<DetectionMode>().is_err());
    }
}
