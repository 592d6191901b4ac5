use sha2::{Digest, Sha256};

/// Square grid of occlusion values over the ground plane, row-major.
///
/// `0.0` is fully lit, `1.0` fully shadowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowTerm {
    resolution: u32,
    texels: Vec<f32>,
}

impl ShadowTerm {
    /// An unshadowed term of `resolution * resolution` texels.
    pub fn new(resolution: u32) -> Self {
        let n = resolution as usize * resolution as usize;
        Self {
            resolution,
            texels: vec![0.0; n],
        }
    }

    /// Wrap existing texels. `None` if the length is not `resolution²`.
    pub fn from_texels(resolution: u32, texels: Vec<f32>) -> Option<Self> {
        (texels.len() == resolution as usize * resolution as usize)
            .then_some(Self { resolution, texels })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    /// Texel at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.texels[i])
    }

    /// Write one texel. Returns `false`, writing nothing, outside the grid.
    pub fn set(&mut self, x: u32, y: u32, value: f32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.texels[i] = value;
                true
            }
            None => false,
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.resolution && y < self.resolution)
            .then(|| y as usize * self.resolution as usize + x as usize)
    }

    /// `self += other * weight`, texel by texel. Resolutions must match.
    pub(crate) fn add_scaled(&mut self, other: &ShadowTerm, weight: f32) {
        debug_assert_eq!(self.resolution, other.resolution);
        for (dst, src) in self.texels.iter_mut().zip(&other.texels) {
            *dst += src * weight;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.texels.fill(0.0);
    }

    pub fn mean(&self) -> f32 {
        if self.texels.is_empty() {
            return 0.0;
        }
        self.texels.iter().sum::<f32>() / self.texels.len() as f32
    }

    /// Raw texel bytes, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// SHA-256 of the texel bytes, lowercase hex.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.resolution.to_le_bytes());
        hasher.update(self.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_term_is_lit() {
        let term = ShadowTerm::new(4);
        assert_eq!(term.texels().len(), 16);
        assert_eq!(term.mean(), 0.0);
    }

    #[test]
    fn from_texels_checks_length() {
        assert!(ShadowTerm::from_texels(2, vec![0.0; 4]).is_some());
        assert!(ShadowTerm::from_texels(2, vec![0.0; 5]).is_none());
    }

    #[test]
    fn get_set_row_major() {
        let mut term = ShadowTerm::new(3);
        assert!(term.set(2, 1, 0.5));
        assert_eq!(term.get(2, 1), Some(0.5));
        assert_eq!(term.texels()[5], 0.5);
    }

    #[test]
    fn coordinates_past_the_edge_are_rejected() {
        let mut term = ShadowTerm::new(4);
        term.set(0, 1, 1.0);
        // x == resolution must not wrap into the next row.
        assert_eq!(term.get(4, 0), None);
        assert_eq!(term.get(0, 4), None);
        assert_eq!(term.get(3, 3), Some(0.0));

        assert!(!term.set(4, 0, 1.0));
        assert!(!term.set(0, 4, 1.0));
        assert_eq!(term.texels().iter().filter(|t| **t > 0.0).count(), 1);
    }

    #[test]
    fn add_scaled_accumulates() {
        let mut acc = ShadowTerm::new(2);
        let full = ShadowTerm::from_texels(2, vec![1.0; 4]).unwrap();
        acc.add_scaled(&full, 0.25);
        acc.add_scaled(&full, 0.25);
        assert_eq!(acc.texels(), &[0.5; 4]);
        acc.clear();
        assert_eq!(acc.mean(), 0.0);
    }

    #[test]
    fn digest_tracks_content() {
        let a = ShadowTerm::new(8);
        let mut b = ShadowTerm::new(8);
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        b.set(0, 0, 1.0);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn bytes_cover_all_texels() {
        let term = ShadowTerm::new(5);
        assert_eq!(term.as_bytes().len(), 25 * 4);
    }
}
