#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    pub const fn toggled(self) -> Self {
        use Mode::*;
        match self {
            Light => Dark,
            Dark => Light,
        }
    }

    /// Value written to the marker attribute and to storage.
    pub const fn marker(self) -> &'static str {
        use Mode::*;
        match self {
            Light => "0",
            Dark => "1",
        }
    }

    pub const fn glyph(self) -> &'static str {
        use Mode::*;
        match self {
            Light => "\u{2600}",
            Dark => "\u{263E}",
        }
    }

    /// Loose boolean coercion of whatever was found in storage.
    ///
    /// Numbers are dark when nonzero, the empty string is light, `true`/`false`
    /// are honored in any case, and any other text counts as set.
    pub fn from_stored(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::Light;
        }
        if let Ok(num) = value.parse::<f64>() {
            return Self::from(num != 0. && !num.is_nan());
        }
        if value.eq_ignore_ascii_case("false") {
            return Self::Light;
        }
        Self::Dark
    }
}

impl From<bool> for Mode {
    fn from(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

impl From<Mode> for bool {
    fn from(mode: Mode) -> Self {
        mode.is_dark()
    }
}
