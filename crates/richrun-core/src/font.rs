use bitflags::bitflags;

bitflags! {
    /// Symbolic font traits a host can combine on a face.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontTraits: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const MONOSPACE = 1 << 2;
    }
}

/// A font description as stored in an attribute set.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub traits: FontTraits,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            traits: FontTraits::empty(),
        }
    }

    pub fn with_traits(mut self, traits: FontTraits) -> Self {
        self.traits.insert(traits);
        self
    }

    pub fn is_bold(&self) -> bool {
        self.traits.contains(FontTraits::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.traits.contains(FontTraits::ITALIC)
    }

    pub fn is_monospace(&self) -> bool {
        self.traits.contains(FontTraits::MONOSPACE)
    }
}

/// Host font system.
///
/// The markdown compiler never computes font metrics; it asks the provider for derived faces and
/// stores whatever comes back.
pub trait FontProvider {
    /// Face used when an attribute set carries no font at all.
    fn default_font(&self) -> Font;

    /// The monospace variant of `font` at the same point size.
    fn monospaced(&self, font: &Font) -> Font;

    fn adding_traits(&self, font: &Font, traits: FontTraits) -> Font {
        font.clone().with_traits(traits)
    }

    fn resized(&self, font: &Font, size: f32) -> Font {
        Font {
            size,
            ..font.clone()
        }
    }
}

/// A [`FontProvider`] backed by two family names.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemFonts {
    pub family: String,
    pub monospace_family: String,
    pub size: f32,
    /// Whether the monospace family has bold/italic faces. When `false`, switching to monospace
    /// drops the other traits.
    pub combine_traits: bool,
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self {
            family: "system-ui".to_string(),
            monospace_family: "monospace".to_string(),
            size: 13.0,
            combine_traits: true,
        }
    }
}

impl FontProvider for SystemFonts {
    fn default_font(&self) -> Font {
        Font::new(self.family.clone(), self.size)
    }

    fn monospaced(&self, font: &Font) -> Font {
        let traits = if self.combine_traits {
            font.traits | FontTraits::MONOSPACE
        } else {
            FontTraits::MONOSPACE
        };
        Font {
            family: self.monospace_family.clone(),
            size: font.size,
            traits,
        }
    }
}
