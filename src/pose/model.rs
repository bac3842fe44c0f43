//! Body parts, transforms, and the rest pose

use std::f32::consts::PI;

use glam::Vec3;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Addressable parts of the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Head,
    LeftEye,
    RightEye,
    Mouth,
    LeftHand,
    RightHand,
}

impl BodyPart {
    pub const COUNT: usize = 6;

    pub const ALL: [BodyPart; Self::COUNT] = [
        BodyPart::Head,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::Mouth,
        BodyPart::LeftHand,
        BodyPart::RightHand,
    ];

    /// Identifier used by the renderer host and in serialized poses
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::LeftEye => "leftEye",
            BodyPart::RightEye => "rightEye",
            BodyPart::Mouth => "mouth",
            BodyPart::LeftHand => "leftHand",
            BodyPart::RightHand => "rightHand",
        }
    }

    /// Node this part is attached to, `None` for the avatar root.
    ///
    /// Eyes and mouth ride on the head, so their transforms are local to it.
    pub fn parent(&self) -> Option<BodyPart> {
        match self {
            BodyPart::LeftEye | BodyPart::RightEye | BodyPart::Mouth => Some(BodyPart::Head),
            BodyPart::Head | BodyPart::LeftHand | BodyPart::RightHand => None,
        }
    }

    /// Transform of this part in the rest pose
    pub fn rest(&self) -> Transform {
        match self {
            BodyPart::Head => Transform::default(),
            BodyPart::LeftEye => Transform::at(Vec3::new(-0.35, 0.1, 0.85)),
            BodyPart::RightEye => Transform::at(Vec3::new(0.35, 0.1, 0.85)),
            // Half torus flipped over so it reads as a smile
            BodyPart::Mouth => Transform {
                rotation: Vec3::new(PI, 0.0, 0.0),
                ..Transform::at(Vec3::new(0.0, -0.3, 0.9))
            },
            BodyPart::LeftHand => Transform::at(Vec3::new(-1.5, -1.0, 0.0)),
            BodyPart::RightHand => Transform::at(Vec3::new(1.5, -1.0, 0.0)),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for BodyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local transform of a single part. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Neutral rotation and scale at the given position
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Transforms for every body part
#[derive(Debug, Clone, PartialEq)]
pub struct PoseModel {
    parts: [Transform; BodyPart::COUNT],
}

impl PoseModel {
    /// Create a pose with every part at rest
    pub fn new() -> Self {
        Self {
            parts: BodyPart::ALL.map(|part| part.rest()),
        }
    }

    pub fn get(&self, part: BodyPart) -> &Transform {
        &self.parts[part.index()]
    }

    pub fn get_mut(&mut self, part: BodyPart) -> &mut Transform {
        &mut self.parts[part.index()]
    }

    /// Iterate over all parts in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, &Transform)> {
        BodyPart::ALL.into_iter().zip(self.parts.iter())
    }

    /// Put every part back into the rest pose
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PoseModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of one part: its transform plus the node it hangs off
#[derive(Serialize)]
struct PartEntry<'a> {
    parent: Option<BodyPart>,
    #[serde(flatten)]
    transform: &'a Transform,
}

impl Serialize for PoseModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BodyPart::COUNT))?;
        for (part, transform) in self.iter() {
            let entry = PartEntry {
                parent: part.parent(),
                transform,
            };
            map.serialize_entry(part.as_str(), &entry)?;
        }
        map.end()
    }
}
