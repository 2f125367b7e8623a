/// Resource data formats (`DXGI_FORMAT`).
///
/// Values without a named variant are carried through as [`Format::Other`] so
/// descriptors never lose information. Equality and hashing go by the raw
/// value, so `Other(87)` and `B8G8R8A8UNorm` are the same format.
#[derive(Clone, Copy, Debug, Default)]
pub enum Format {
    #[default]
    Unknown,
    R32G32B32A32Float,
    R32G32B32Float,
    R16G16B16A16Float,
    R16G16B16A16UNorm,
    R32G32Float,
    R10G10B10A2UNorm,
    R8G8B8A8UNorm,
    R8G8B8A8UNormSRGB,
    R16G16Float,
    D32Float,
    R32Float,
    D24UNormS8UInt,
    R8G8UNorm,
    R16Float,
    R16UNorm,
    R8UNorm,
    A8UNorm,
    BC1UNorm,
    BC2UNorm,
    BC3UNorm,
    B8G8R8A8UNorm,
    B8G8R8X8UNorm,
    B8G8R8A8UNormSRGB,
    NV12,
    Other(u32),
}

const TABLE: &[(Format, u32)] = &[
    (Format::Unknown, 0),
    (Format::R32G32B32A32Float, 2),
    (Format::R32G32B32Float, 6),
    (Format::R16G16B16A16Float, 10),
    (Format::R16G16B16A16UNorm, 11),
    (Format::R32G32Float, 16),
    (Format::R10G10B10A2UNorm, 24),
    (Format::R8G8B8A8UNorm, 28),
    (Format::R8G8B8A8UNormSRGB, 29),
    (Format::R16G16Float, 34),
    (Format::D32Float, 40),
    (Format::R32Float, 41),
    (Format::D24UNormS8UInt, 45),
    (Format::R8G8UNorm, 49),
    (Format::R16Float, 54),
    (Format::R16UNorm, 56),
    (Format::R8UNorm, 61),
    (Format::A8UNorm, 65),
    (Format::BC1UNorm, 71),
    (Format::BC2UNorm, 74),
    (Format::BC3UNorm, 77),
    (Format::B8G8R8A8UNorm, 87),
    (Format::B8G8R8X8UNorm, 88),
    (Format::B8G8R8A8UNormSRGB, 91),
    (Format::NV12, 103),
];

impl Format {
    pub fn from_raw(raw: u32) -> Self {
        TABLE
            .iter()
            .find(|(_, v)| *v == raw)
            .map_or(Format::Other(raw), |(f, _)| *f)
    }

    pub fn to_raw(self) -> u32 {
        match self {
            Format::Other(raw) => raw,
            f => TABLE
                .iter()
                .find(|(named, _)| std::mem::discriminant(named) == std::mem::discriminant(&f))
                .map_or(0, |(_, v)| *v),
        }
    }

    /// The named variant for this value, if there is one.
    pub fn normalized(self) -> Self {
        Format::from_raw(self.to_raw())
    }

    /// Bytes per pixel for uncompressed single-plane formats.
    pub fn size_in_bytes(self) -> Option<u32> {
        Some(match self.normalized() {
            Format::R32G32B32A32Float => 16,
            Format::R32G32B32Float => 12,
            Format::R16G16B16A16Float | Format::R16G16B16A16UNorm | Format::R32G32Float => 8,
            Format::R10G10B10A2UNorm
            | Format::R8G8B8A8UNorm
            | Format::R8G8B8A8UNormSRGB
            | Format::R16G16Float
            | Format::D32Float
            | Format::R32Float
            | Format::D24UNormS8UInt
            | Format::B8G8R8A8UNorm
            | Format::B8G8R8X8UNorm
            | Format::B8G8R8A8UNormSRGB => 4,
            Format::R8G8UNorm | Format::R16Float | Format::R16UNorm => 2,
            Format::R8UNorm | Format::A8UNorm => 1,
            _ => return None,
        })
    }
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.to_raw() == other.to_raw()
    }
}

impl Eq for Format {}

impl std::hash::Hash for Format {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_raw().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_unnamed_values() {
        assert_eq!(Format::from_raw(87), Format::B8G8R8A8UNorm);
        assert_eq!(Format::NV12.to_raw(), 103);
        assert_eq!(Format::from_raw(130), Format::Other(130));
        assert_eq!(Format::Other(130).to_raw(), 130);
        for (f, raw) in TABLE {
            assert_eq!(Format::from_raw(*raw), *f);
        }
    }

    #[test]
    fn test_unnamed_spelling_of_named_value() {
        use std::collections::HashSet;

        assert_eq!(Format::Other(87), Format::B8G8R8A8UNorm);
        assert_eq!(Format::Other(87).normalized(), Format::B8G8R8A8UNorm);
        assert!(matches!(Format::Other(87).normalized(), Format::B8G8R8A8UNorm));
        assert_eq!(Format::Other(87).size_in_bytes(), Some(4));
        assert_ne!(Format::Other(88), Format::B8G8R8A8UNorm);

        let set: HashSet<Format> = [Format::Other(103), Format::NV12].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(Format::R32G32B32A32Float.size_in_bytes(), Some(16));
        assert_eq!(Format::R8UNorm.size_in_bytes(), Some(1));
        assert_eq!(Format::BC1UNorm.size_in_bytes(), None);
        assert_eq!(Format::NV12.size_in_bytes(), None);
        assert_eq!(Format::Other(130).size_in_bytes(), None);
    }
}
