use std::fmt;

pub const SOIL_CLASS_COUNT: usize = 8;

/// Soil categories in the order of the model's output indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilClass {
    Aluvial,
    Andosol,
    Entisol,
    Humus,
    Inceptisol,
    Laterit,
    Kapur,
    Pasir,
}

impl SoilClass {
    pub const ALL: [SoilClass; SOIL_CLASS_COUNT] = [
        SoilClass::Aluvial,
        SoilClass::Andosol,
        SoilClass::Entisol,
        SoilClass::Humus,
        SoilClass::Inceptisol,
        SoilClass::Laterit,
        SoilClass::Kapur,
        SoilClass::Pasir,
    ];

    #[cfg(test)]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SoilClass::Aluvial => "Aluvial",
            SoilClass::Andosol => "Andosol",
            SoilClass::Entisol => "Entisol",
            SoilClass::Humus => "Humus",
            SoilClass::Inceptisol => "Inceptisol",
            SoilClass::Laterit => "Laterit",
            SoilClass::Kapur => "Kapur",
            SoilClass::Pasir => "Pasir",
        }
    }
}

impl fmt::Display for SoilClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
