use glam::Vec3;
use lumen_shadow::{ShadowPass, ShadowTerm};

use crate::scene::SceneLayout;

/// Directional hard shadow of `layout` on the ground square, one ray per texel.
///
/// Texel `(x, y)` covers ground point `(x, ground_y, y)` in a square of side
/// `pass.ground_extent` centered on the origin. Texels outside the light's
/// `size` x `size` frustum, or any texel when the light is at or below the
/// horizon, are lit.
pub fn cast_hard_shadow(layout: &SceneLayout, pass: &ShadowPass) -> ShadowTerm {
    let mut term = ShadowTerm::new(pass.resolution);
    let dir = (pass.light_position - pass.light_target).normalize_or_zero();
    if dir.y <= 0.0 || pass.resolution == 0 {
        return term;
    }

    let right = dir.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let up = right.cross(dir);
    let half_size = pass.size * 0.5;
    let cell = pass.ground_extent / pass.resolution as f32;
    let origin = -pass.ground_extent * 0.5;

    for y in 0..pass.resolution {
        for x in 0..pass.resolution {
            let p = Vec3::new(
                origin + (x as f32 + 0.5) * cell,
                layout.ground_y,
                origin + (y as f32 + 0.5) * cell,
            );
            let local = p - pass.light_target;
            if local.dot(right).abs() > half_size || local.dot(up).abs() > half_size {
                continue;
            }
            if layout.occluders.iter().any(|o| o.ray_exit(p, dir).is_some()) {
                term.set(x, y, 1.0);
            }
        }
    }
    term
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Occluder;

    fn pass(light: Vec3) -> ShadowPass {
        ShadowPass {
            light_position: light,
            light_target: Vec3::ZERO,
            size: 100.0,
            resolution: 16,
            ground_extent: 16.0,
        }
    }

    fn pillar() -> SceneLayout {
        SceneLayout::empty().with_occluder(Occluder::new(
            "pillar",
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 4.0, 1.0),
        ))
    }

    #[test]
    fn overhead_light_shadows_footprint_only() {
        let term = cast_hard_shadow(&pillar(), &pass(Vec3::new(0.0, 10.0, 0.0)));
        // Texel 7/8 straddle the origin: centers at -0.5 and 0.5.
        assert_eq!(term.get(7, 7), Some(1.0));
        assert_eq!(term.get(8, 8), Some(1.0));
        assert_eq!(term.get(0, 0), Some(0.0));
        assert_eq!(term.get(15, 15), Some(0.0));
        assert_eq!(term.texels().iter().filter(|t| **t > 0.0).count(), 4);
    }

    #[test]
    fn slanted_light_casts_shadow_away_from_light() {
        // Light toward -z, so the shadow falls toward +z.
        let term = cast_hard_shadow(&pillar(), &pass(Vec3::new(0.0, 10.0, -10.0)));
        assert_eq!(term.get(8, 11), Some(1.0));
        assert_eq!(term.get(8, 4), Some(0.0));
    }

    #[test]
    fn light_below_horizon_is_unshadowed() {
        let term = cast_hard_shadow(&pillar(), &pass(Vec3::new(0.0, -5.0, 0.0)));
        assert_eq!(term.mean(), 0.0);
    }

    #[test]
    fn outside_light_frustum_is_lit() {
        let mut p = pass(Vec3::new(0.0, 10.0, 0.0));
        p.size = 0.5;
        let term = cast_hard_shadow(&pillar(), &p);
        assert_eq!(term.mean(), 0.0);
    }

    #[test]
    fn default_layout_casts_some_shadow() {
        let p = ShadowPass {
            light_position: Vec3::new(0.0, 10.0, -10.0),
            light_target: Vec3::ZERO,
            size: 15.0,
            resolution: 32,
            ground_extent: 30.0,
        };
        let term = cast_hard_shadow(&SceneLayout::default(), &p);
        assert!(term.mean() > 0.0);
        assert!(term.mean() < 1.0);
    }
}
