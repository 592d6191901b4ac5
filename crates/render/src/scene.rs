use glam::Vec3;

/// Axis-aligned box that blocks light.
#[derive(Debug, Clone, PartialEq)]
pub struct Occluder {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

impl Occluder {
    pub fn new(name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        Self {
            name: name.into(),
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Distance along `dir` from `origin` to where the ray leaves the box, if it touches it ahead.
    pub fn ray_exit(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let inv = dir.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();
        (far >= near.max(0.0) && far > 0.0).then_some(far)
    }
}

/// Shadow-casting geometry over a ground plane at `ground_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub ground_y: f32,
    pub occluders: Vec<Occluder>,
}

impl SceneLayout {
    pub fn empty() -> Self {
        Self {
            ground_y: 0.0,
            occluders: Vec::new(),
        }
    }

    pub fn with_occluder(mut self, occluder: Occluder) -> Self {
        self.occluders.push(occluder);
        self
    }
}

impl Default for SceneLayout {
    /// Bounds of the two extruded words: one lying flat, one standing behind it.
    fn default() -> Self {
        Self::empty()
            .with_occluder(Occluder::new(
                "Kashmir",
                Vec3::new(-11.0, 0.0, -1.5),
                Vec3::new(11.0, 1.5, 6.0),
            ))
            .with_occluder(Occluder::new(
                "Labs",
                Vec3::new(-7.0, 0.0, 8.0),
                Vec3::new(5.0, 5.0, 8.75),
            ))
    }
}
