//! Render options.
//!
//! A [`RenderRequest`] is what the user asked for, straight from the
//! positional arguments. Once the icon registry is loaded it resolves into a
//! [`RenderSpec`], the immutable description every render call reads from.

use palette::Srgba;

use crate::error::{Error, Result};
use crate::icon::{IconEntry, Selection};

/// Fully transparent black, used as the front color in transparent mode.
pub const TRANSPARENT: Srgba<u8> = Srgba::new(0, 0, 0, 0);

/// Literal accepted in place of a front color to request transparent mode.
pub const TRANSPARENT_KEYWORD: &str = "transparent";

/// Parses a hex RGB color such as `ff69b4`, `#ff69b4` or `0`.
///
/// The value is read as a packed `0xRRGGBB` number, so short forms are
/// zero-extended on the left (`ff` is blue). The result is opaque.
pub fn parse_color(value: &str) -> Result<Srgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    let packed = u32::from_str_radix(hex, 16)
        .ok()
        .filter(|v| *v <= 0x00ff_ffff)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid hex color '{value}'")))?;

    Ok(Srgba::new(
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
        u8::MAX,
    ))
}

/// Parses a canvas or glyph size in pixels.
pub fn parse_size(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Error::InvalidArgument(format!(
            "size must be a positive integer, got '{value}'"
        ))),
    }
}

/// Fraction of a glyph size given up as padding, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding(f32);

impl Padding {
    pub const NONE: Self = Self(0.0);

    pub fn new(fraction: f32) -> Result<Self> {
        if (0.0..1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(Error::InvalidArgument(format!(
                "padding must be within [0, 1), got {fraction}"
            )))
        }
    }

    /// Parses `a/b` or a decimal. Anything else without a `/` means no
    /// padding.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let fraction = match value.split_once('/') {
            Some((num, den)) => {
                let invalid = || Error::InvalidArgument(format!("invalid padding '{value}'"));
                let num: f32 = num.trim().parse().map_err(|_| invalid())?;
                let den: f32 = den.trim().parse().map_err(|_| invalid())?;
                if den == 0.0 {
                    return Err(invalid());
                }
                num / den
            }
            None => value.parse().unwrap_or(0.0),
        };
        Self::new(fraction)
    }

    pub fn fraction(self) -> f32 {
        self.0
    }

    /// Font size for a glyph requested at `size` pixels.
    pub fn apply(self, size: u32) -> f32 {
        let size = size as f32;
        size - size * self.0
    }
}

/// A second icon drawn beneath the front icon.
///
/// A name can be bound to different code points in different styles, so every
/// binding is kept and the one matching the front icon's style is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedGlyph {
    primary: IconEntry,
    alternates: Vec<IconEntry>,
    /// Requested size in pixels, before padding.
    size: u32,
    color: Srgba<u8>,
}

impl StackedGlyph {
    pub fn new(icon: IconEntry, size: u32, color: Srgba<u8>) -> Self {
        Self {
            primary: icon,
            alternates: Vec::new(),
            size,
            color,
        }
    }

    /// Uses all bindings of one icon name. The first is the fallback when no
    /// binding has the front style. Returns `None` for an empty slice.
    pub fn from_bindings(bindings: &[IconEntry], size: u32, color: Srgba<u8>) -> Option<Self> {
        let (primary, alternates) = bindings.split_first()?;
        Some(Self {
            primary: primary.clone(),
            alternates: alternates.to_vec(),
            size,
            color,
        })
    }

    pub fn name(&self) -> &str {
        &self.primary.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> Srgba<u8> {
        self.color
    }

    /// The binding and style drawn beneath a front icon in `front_style`.
    ///
    /// Prefers a binding that exists in `front_style`. Otherwise the fallback
    /// binding is drawn in its first style.
    pub fn resolve<'a>(&'a self, front_style: &'a str) -> (&'a IconEntry, &'a str) {
        let matching = std::iter::once(&self.primary)
            .chain(&self.alternates)
            .find(|icon| icon.has_style(front_style));

        match matching {
            Some(icon) => (icon, front_style),
            None => {
                let style = self
                    .primary
                    .styles
                    .iter()
                    .next()
                    .map_or(front_style, String::as_str);
                (&self.primary, style)
            }
        }
    }
}

/// Immutable per-run render configuration.
///
/// Transparent mode is represented by the presence of a background color, so
/// a transparent spec always carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    canvas_size: u32,
    front_size: u32,
    front_color: Srgba<u8>,
    padding: Padding,
    stacked: Option<StackedGlyph>,
    background: Option<Srgba<u8>>,
}

impl RenderSpec {
    /// A solid glyph of `color` on a transparent canvas.
    pub fn new(size: u32, color: Srgba<u8>, padding: Padding) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidArgument("size must be positive".into()));
        }
        Ok(Self {
            canvas_size: size,
            front_size: size,
            front_color: color,
            padding,
            stacked: None,
            background: None,
        })
    }

    /// A glyph-shaped cutout in a `background` filled canvas.
    pub fn transparent(size: u32, background: Srgba<u8>, padding: Padding) -> Result<Self> {
        let mut spec = Self::new(size, TRANSPARENT, padding)?;
        spec.background = Some(background);
        Ok(spec)
    }

    /// Adds a stacked glyph. The canvas grows to fit the larger of the two
    /// requested sizes.
    pub fn with_stacked(mut self, stacked: StackedGlyph) -> Result<Self> {
        if stacked.size() == 0 {
            return Err(Error::InvalidArgument("stacked size must be positive".into()));
        }
        self.canvas_size = self.front_size.max(stacked.size());
        self.stacked = Some(stacked);
        Ok(self)
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn front_color(&self) -> Srgba<u8> {
        self.front_color
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn stacked(&self) -> Option<&StackedGlyph> {
        self.stacked.as_ref()
    }

    pub fn background(&self) -> Option<Srgba<u8>> {
        self.background
    }

    pub fn is_transparent(&self) -> bool {
        self.background.is_some()
    }

    /// Pixel size of the front font.
    pub fn front_point_size(&self) -> f32 {
        self.padding.apply(self.front_size)
    }

    /// Pixel size of the stacked font, derived from the stacked size alone.
    pub fn stacked_point_size(&self) -> Option<f32> {
        self.stacked.as_ref().map(|s| self.padding.apply(s.size()))
    }
}

/// The stacked part of a request, before the icon name is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedRequest {
    pub icon: String,
    pub size: u32,
    pub color: Srgba<u8>,
}

/// A render request as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub icons: Selection,
    pub styles: Selection,
    pub size: u32,
    pub color: Srgba<u8>,
    pub padding: Padding,
    /// Present in transparent mode.
    pub background: Option<Srgba<u8>>,
    pub stacked: Option<StackedRequest>,
}

impl RenderRequest {
    /// Parses positional arguments in one of three shapes:
    ///
    /// - `icons styles size color padding`
    /// - `icons styles size transparent padding bgcolor`
    /// - `icons styles size color padding sicon ssize scolor`
    ///
    /// Returns `Ok(None)` when the argument count matches no shape.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Option<Self>> {
        if !matches!(args.len(), 5 | 6 | 8) {
            return Ok(None);
        }
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let arg = |i: usize| args[i];

        let icons = Selection::parse(arg(0));
        let styles = Selection::parse(arg(1));
        let size = parse_size(arg(2))?;
        let transparent = arg(3).eq_ignore_ascii_case(TRANSPARENT_KEYWORD);
        let padding = Padding::parse(arg(4))?;

        let (color, background) = match (args.len(), transparent) {
            (6, true) => (TRANSPARENT, Some(parse_color(arg(5))?)),
            (6, false) => {
                return Err(Error::InvalidArgument(format!(
                    "a background color requires the color '{TRANSPARENT_KEYWORD}'"
                )));
            }
            (_, true) => {
                return Err(Error::InvalidArgument(format!(
                    "'{TRANSPARENT_KEYWORD}' requires a background color"
                )));
            }
            (_, false) => (parse_color(arg(3))?, None),
        };

        let stacked = if args.len() == 8 {
            Some(StackedRequest {
                icon: arg(5).trim().to_string(),
                size: parse_size(arg(6))?,
                color: parse_color(arg(7))?,
            })
        } else {
            None
        };

        Ok(Some(Self {
            icons,
            styles,
            size,
            color,
            padding,
            background,
            stacked,
        }))
    }

    /// Builds the render spec, given every binding of the stacked icon's name
    /// if one was requested.
    pub fn to_spec(&self, stacked_bindings: Option<&[IconEntry]>) -> Result<RenderSpec> {
        let spec = match self.background {
            Some(background) => RenderSpec::transparent(self.size, background, self.padding)?,
            None => RenderSpec::new(self.size, self.color, self.padding)?,
        };

        let Some(request) = &self.stacked else {
            return Ok(spec);
        };
        let stacked = stacked_bindings
            .and_then(|bindings| StackedGlyph::from_bindings(bindings, request.size, request.color))
            .ok_or_else(|| Error::UnknownIcon(request.icon.clone()))?;
        spec.with_stacked(stacked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_forms() {
        assert_eq!(parse_color("ff0000").unwrap(), Srgba::new(255, 0, 0, 255));
        assert_eq!(parse_color("#ff69b4").unwrap(), Srgba::new(0xff, 0x69, 0xb4, 255));
        assert_eq!(parse_color("0").unwrap(), Srgba::new(0, 0, 0, 255));
        assert_eq!(parse_color("ff").unwrap(), Srgba::new(0, 0, 255, 255));
    }

    #[test]
    fn parse_color_rejects_invalid() {
        assert!(parse_color("red").is_err());
        assert!(parse_color("1000000").is_err());
        assert!(parse_color("").is_err());
    }

    #[test]
    fn parse_size_rejects_zero() {
        assert_eq!(parse_size("48").unwrap(), 48);
        assert!(parse_size("0").is_err());
        assert!(parse_size("-1").is_err());
        assert!(parse_size("big").is_err());
    }

    #[test]
    fn padding_parse() {
        assert_eq!(Padding::parse("1/8").unwrap().fraction(), 0.125);
        assert_eq!(Padding::parse("0.25").unwrap().fraction(), 0.25);
        assert_eq!(Padding::parse("0").unwrap(), Padding::NONE);
        assert_eq!(Padding::parse("none").unwrap(), Padding::NONE);
        assert!(Padding::parse("1/0").is_err());
        assert!(Padding::parse("a/b").is_err());
        assert!(Padding::parse("1/1").is_err());
        assert!(Padding::parse("3/2").is_err());
    }

    #[test]
    fn padding_apply() {
        let padding = Padding::parse("1/8").unwrap();
        assert_eq!(padding.apply(128), 112.0);
        assert_eq!(Padding::NONE.apply(48), 48.0);
    }

    #[test]
    fn regular_request() {
        let request = RenderRequest::from_args(&["plus-circle,minus-circle", "all", "128", "ff0000", "1/8"])
            .unwrap()
            .unwrap();
        assert!(request.icons.contains("plus-circle"));
        assert!(!request.icons.contains("gear"));
        assert_eq!(request.styles, Selection::All);
        assert_eq!(request.size, 128);
        assert_eq!(request.color, Srgba::new(255, 0, 0, 255));
        assert!(request.background.is_none());
        assert!(request.stacked.is_none());

        let spec = request.to_spec(None).unwrap();
        assert_eq!(spec.canvas_size(), 128);
        assert_eq!(spec.front_point_size(), 112.0);
        assert!(!spec.is_transparent());
    }

    #[test]
    fn transparent_request() {
        let request = RenderRequest::from_args(&["all", "all", "64", "transparent", "0", "ffffff"])
            .unwrap()
            .unwrap();
        assert_eq!(request.background, Some(Srgba::new(255, 255, 255, 255)));

        let spec = request.to_spec(None).unwrap();
        assert!(spec.is_transparent());
        assert_eq!(spec.front_color(), TRANSPARENT);
        assert_eq!(spec.background(), Some(Srgba::new(255, 255, 255, 255)));
    }

    #[test]
    fn transparent_needs_background_and_vice_versa() {
        assert!(RenderRequest::from_args(&["all", "all", "64", "transparent", "0"]).is_err());
        assert!(RenderRequest::from_args(&["all", "all", "64", "000000", "0", "ffffff"]).is_err());
    }

    #[test]
    fn stacked_request() {
        let request = RenderRequest::from_args(&[
            "all", "solid", "24", "ffffff", "0", "square", "48", "000000",
        ])
        .unwrap()
        .unwrap();
        let stacked = request.stacked.clone().unwrap();
        assert_eq!(stacked.icon, "square");
        assert_eq!(stacked.size, 48);

        let bindings = [IconEntry::new("square", vec!['\u{f0c8}'], ["solid"])];
        let spec = request.to_spec(Some(bindings.as_slice())).unwrap();
        assert_eq!(spec.canvas_size(), 48);
        assert_eq!(spec.front_point_size(), 24.0);
        assert_eq!(spec.stacked_point_size(), Some(48.0));
    }

    #[test]
    fn stacked_point_size_uses_its_own_size() {
        let icon = IconEntry::new("square", vec!['\u{f0c8}'], ["solid"]);
        let spec = RenderSpec::new(64, TRANSPARENT, Padding::parse("1/4").unwrap())
            .unwrap()
            .with_stacked(StackedGlyph::new(icon, 32, Srgba::new(0, 0, 0, 255)))
            .unwrap();
        assert_eq!(spec.canvas_size(), 64);
        assert_eq!(spec.front_point_size(), 48.0);
        assert_eq!(spec.stacked_point_size(), Some(24.0));
    }

    #[test]
    fn unresolved_stacked_icon_is_unknown() {
        let request = RenderRequest::from_args(&[
            "all", "all", "24", "ffffff", "0", "nope", "48", "000000",
        ])
        .unwrap()
        .unwrap();
        assert!(matches!(request.to_spec(None), Err(Error::UnknownIcon(name)) if name == "nope"));
        assert!(matches!(request.to_spec(Some(&[][..])), Err(Error::UnknownIcon(_))));
    }

    #[test]
    fn wrong_shape_is_none() {
        assert!(RenderRequest::from_args::<&str>(&[]).unwrap().is_none());
        assert!(RenderRequest::from_args(&["all", "all", "48", "0"]).unwrap().is_none());
        assert!(RenderRequest::from_args(&["a", "b", "c", "d", "e", "f", "g"]).unwrap().is_none());
    }

    #[test]
    fn stacked_style_prefers_front_style() {
        let stacked = StackedGlyph::new(
            IconEntry::new("square", vec!['\u{f0c8}'], ["regular", "solid"]),
            48,
            Srgba::new(0, 0, 0, 255),
        );
        assert_eq!(stacked.resolve("solid").1, "solid");
        assert_eq!(stacked.resolve("brands").1, "regular");
    }

    #[test]
    fn stacked_binding_follows_front_style() {
        let bindings = [
            IconEntry::new("square", vec!['\u{f0c8}'], ["solid"]),
            IconEntry::new("square", vec!['\u{f096}'], ["regular"]),
        ];
        let stacked = StackedGlyph::from_bindings(&bindings, 48, Srgba::new(0, 0, 0, 255)).unwrap();
        assert_eq!(stacked.name(), "square");

        let (icon, style) = stacked.resolve("regular");
        assert_eq!(icon.codepoints, vec!['\u{f096}']);
        assert_eq!(style, "regular");

        let (icon, style) = stacked.resolve("solid");
        assert_eq!(icon.codepoints, vec!['\u{f0c8}']);
        assert_eq!(style, "solid");

        // No binding in the front style: the first binding in its own style.
        let (icon, style) = stacked.resolve("brands");
        assert_eq!(icon.codepoints, vec!['\u{f0c8}']);
        assert_eq!(style, "solid");
    }

    #[test]
    fn empty_bindings_make_no_stacked_glyph() {
        assert!(StackedGlyph::from_bindings(&[], 48, Srgba::new(0, 0, 0, 255)).is_none());
    }
}
