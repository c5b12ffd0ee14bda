use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vello::peniko::Color;

use crate::error::{SkinError, SkinResult};
use crate::serde_color;

/// A filled rectangle with an optional border, drawn as solid quads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Surface {
    /// Interior colour.
    #[serde(with = "serde_color")]
    pub fill: Color,
    /// Border colour, if the surface has a border.
    #[serde(
        default,
        with = "serde_color::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub border: Option<Color>,
    /// Border thickness in pixels. Ignored without a border colour.
    #[serde(default)]
    pub border_width: f64,
}

impl Surface {
    /// A borderless surface.
    pub const fn flat(fill: Color) -> Self {
        Self {
            fill,
            border: None,
            border_width: 0.0,
        }
    }

    /// A surface with a border of the given colour and width.
    pub const fn bordered(fill: Color, border: Color, border_width: f64) -> Self {
        Self {
            fill,
            border: Some(border),
            border_width,
        }
    }

    /// The border thickness actually drawn.
    pub fn inset(&self) -> f64 {
        match self.border {
            Some(_) => self.border_width.max(0.0),
            None => 0.0,
        }
    }
}

/// Surfaces of a push button in each interaction state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSkin {
    /// Resting state.
    pub idle: Surface,
    /// Mouse over the button.
    pub hovered: Surface,
    /// Mouse held down on the button.
    pub pressed: Surface,
}

/// Single-line text entry styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextboxSkin {
    /// Box without keyboard focus.
    pub idle: Surface,
    /// Box holding keyboard focus.
    pub focused: Surface,
    /// Caret colour.
    #[serde(with = "serde_color")]
    pub caret: Color,
    /// Selection highlight colour.
    #[serde(with = "serde_color")]
    pub selection: Color,
    /// Seconds between caret blinks.
    pub caret_blink: f64,
}

/// Floating window styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSkin {
    /// Window body.
    pub body: Surface,
    /// Title bar.
    pub title: Surface,
    /// Title bar height in pixels.
    pub title_height: f64,
    /// Close button in the title bar.
    pub close: Surface,
}

/// Popup menu styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSkin {
    /// Menu background.
    pub body: Surface,
    /// Highlighted item.
    pub highlight: Surface,
    /// Separator line colour.
    #[serde(with = "serde_color")]
    pub separator: Color,
    /// Height of a separator item.
    pub separator_height: f64,
}

/// Scrollbar styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarSkin {
    /// Track behind the thumb.
    pub track: Surface,
    /// Draggable thumb.
    pub thumb: Surface,
    /// Thumb while dragged or hovered.
    pub thumb_active: Surface,
    /// Thickness of the bar.
    pub width: f64,
    /// Smallest thumb length.
    pub min_thumb: f64,
}

/// The complete look of a strata interface.
///
/// Skins are plain data: widgets read them when they render. A skin can be
/// built in code, taken from a built-in preset, or loaded from TOML:
///
/// ```toml
/// name = "custom"
/// font_size = 15.0
/// text = "#202020"
///
/// [button.idle]
/// fill = "#dddddd"
/// border = "#999999"
/// border_width = 1.0
/// ```
///
/// Missing keys fall back to [Skin::slate].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Skin {
    /// Human readable name.
    pub name: String,
    /// Default font size in pixels.
    pub font_size: f32,
    /// Padding between a surface edge and its content.
    pub padding: f64,
    /// Regular text colour.
    #[serde(with = "serde_color")]
    pub text: Color,
    /// Text colour of disabled items.
    #[serde(with = "serde_color")]
    pub text_disabled: Color,
    /// Colour of the dimming overlay behind modal layers.
    #[serde(with = "serde_color")]
    pub lightbox: Color,
    /// Seconds the lightbox takes to fade fully in or out.
    pub lightbox_fade_time: f64,
    /// Plain container background.
    pub panel: Surface,
    /// Push buttons.
    pub button: ButtonSkin,
    /// Text entry boxes.
    pub textbox: TextboxSkin,
    /// Floating forms.
    pub form: FormSkin,
    /// Popup menus.
    pub popup: PopupSkin,
    /// Scrollbars.
    pub scrollbar: ScrollbarSkin,
}

macro_rules! default_from_slate {
    ($($ty:ident => $field:ident),* $(,)?) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    Skin::slate().$field
                }
            }
        )*
    };
}

default_from_slate! {
    ButtonSkin => button,
    TextboxSkin => textbox,
    FormSkin => form,
    PopupSkin => popup,
    ScrollbarSkin => scrollbar,
}

impl Default for Skin {
    fn default() -> Self {
        Self::slate()
    }
}

impl Skin {
    /// Dark built-in skin. This is the default.
    pub fn slate() -> Self {
        let border = Color::from_rgb8(0x55, 0x5b, 0x66);
        Self {
            name: "slate".to_string(),
            font_size: 14.0,
            padding: 4.0,
            text: Color::from_rgb8(0xe6, 0xe8, 0xeb),
            text_disabled: Color::from_rgb8(0x7a, 0x80, 0x88),
            lightbox: Color::from_rgba8(0, 0, 0, 0x99),
            lightbox_fade_time: 0.25,
            panel: Surface::flat(Color::from_rgb8(0x23, 0x26, 0x2b)),
            button: ButtonSkin {
                idle: Surface::bordered(Color::from_rgb8(0x3a, 0x3f, 0x47), border, 1.0),
                hovered: Surface::bordered(Color::from_rgb8(0x47, 0x4d, 0x57), border, 1.0),
                pressed: Surface::bordered(Color::from_rgb8(0x2c, 0x30, 0x36), border, 1.0),
            },
            textbox: TextboxSkin {
                idle: Surface::bordered(Color::from_rgb8(0x1a, 0x1c, 0x20), border, 1.0),
                focused: Surface::bordered(
                    Color::from_rgb8(0x1a, 0x1c, 0x20),
                    Color::from_rgb8(0x4c, 0x8d, 0xf6),
                    1.0,
                ),
                caret: Color::from_rgb8(0xe6, 0xe8, 0xeb),
                selection: Color::from_rgba8(0x4c, 0x8d, 0xf6, 0x80),
                caret_blink: 0.5,
            },
            form: FormSkin {
                body: Surface::bordered(Color::from_rgb8(0x2b, 0x2f, 0x35), border, 1.0),
                title: Surface::flat(Color::from_rgb8(0x33, 0x38, 0x40)),
                title_height: 24.0,
                close: Surface::flat(Color::from_rgb8(0xb0, 0x3a, 0x3a)),
            },
            popup: PopupSkin {
                body: Surface::bordered(Color::from_rgb8(0x2b, 0x2f, 0x35), border, 1.0),
                highlight: Surface::flat(Color::from_rgb8(0x4c, 0x8d, 0xf6)),
                separator: border,
                separator_height: 7.0,
            },
            scrollbar: ScrollbarSkin {
                track: Surface::flat(Color::from_rgb8(0x1f, 0x22, 0x26)),
                thumb: Surface::flat(Color::from_rgb8(0x4a, 0x50, 0x5a)),
                thumb_active: Surface::flat(Color::from_rgb8(0x5d, 0x65, 0x72)),
                width: 12.0,
                min_thumb: 16.0,
            },
        }
    }

    /// Light built-in skin.
    pub fn paper() -> Self {
        let border = Color::from_rgb8(0xa8, 0xad, 0xb4);
        let accent = Color::from_rgb8(0x2f, 0x6f, 0xd6);
        Self {
            name: "paper".to_string(),
            text: Color::from_rgb8(0x1e, 0x20, 0x24),
            text_disabled: Color::from_rgb8(0x90, 0x95, 0x9c),
            lightbox: Color::from_rgba8(0x20, 0x20, 0x20, 0x66),
            panel: Surface::flat(Color::from_rgb8(0xf2, 0xf3, 0xf5)),
            button: ButtonSkin {
                idle: Surface::bordered(Color::from_rgb8(0xe4, 0xe6, 0xea), border, 1.0),
                hovered: Surface::bordered(Color::from_rgb8(0xee, 0xf0, 0xf3), border, 1.0),
                pressed: Surface::bordered(Color::from_rgb8(0xd2, 0xd5, 0xda), border, 1.0),
            },
            textbox: TextboxSkin {
                idle: Surface::bordered(Color::WHITE, border, 1.0),
                focused: Surface::bordered(Color::WHITE, accent, 1.0),
                caret: Color::from_rgb8(0x1e, 0x20, 0x24),
                selection: Color::from_rgba8(0x2f, 0x6f, 0xd6, 0x60),
                caret_blink: 0.5,
            },
            form: FormSkin {
                body: Surface::bordered(Color::from_rgb8(0xfa, 0xfa, 0xfb), border, 1.0),
                title: Surface::flat(Color::from_rgb8(0xdd, 0xe1, 0xe6)),
                title_height: 24.0,
                close: Surface::flat(Color::from_rgb8(0xd9, 0x53, 0x4f)),
            },
            popup: PopupSkin {
                body: Surface::bordered(Color::WHITE, border, 1.0),
                highlight: Surface::flat(accent),
                separator: border,
                separator_height: 7.0,
            },
            scrollbar: ScrollbarSkin {
                track: Surface::flat(Color::from_rgb8(0xe8, 0xea, 0xed)),
                thumb: Surface::flat(Color::from_rgb8(0xb9, 0xbe, 0xc5)),
                thumb_active: Surface::flat(Color::from_rgb8(0x9c, 0xa2, 0xab)),
                width: 12.0,
                min_thumb: 16.0,
            },
            ..Self::slate()
        }
    }

    /// Look up a built-in skin by name.
    pub fn builtin(name: &str) -> SkinResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "slate" | "dark" => Ok(Self::slate()),
            "paper" | "light" => Ok(Self::paper()),
            other => Err(SkinError::not_found(other)),
        }
    }

    /// Load a skin from a `.toml` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SkinResult<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|s| s.to_str()) != Some("toml") {
            return Err(SkinError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        if !path.exists() {
            return Err(SkinError::file_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| SkinError::parse_error(path.display().to_string(), err.to_string()))
    }

    /// Parse a skin from TOML text.
    pub fn from_toml(content: &str) -> SkinResult<Self> {
        toml::from_str(content).map_err(|err| SkinError::parse_error("<inline>", err.to_string()))
    }

    /// Serialize the skin to TOML text.
    pub fn to_toml(&self) -> SkinResult<String> {
        toml::to_string_pretty(self).map_err(|err| SkinError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let skin = Skin::from_toml(
            r##"
            name = "custom"
            font_size = 18.0
            lightbox = "#00000040"

            [button.idle]
            fill = "#102030"
            "##,
        )
        .unwrap();

        assert_eq!(skin.name, "custom");
        assert_eq!(skin.font_size, 18.0);
        assert_eq!(skin.lightbox.to_rgba8().a, 0x40);
        assert_eq!(skin.button.idle.fill.to_rgba8().b, 0x30);
        assert!(skin.button.idle.border.is_none());
        // untouched sections come from the default skin
        assert_eq!(skin.form.title_height, Skin::slate().form.title_height);
    }

    #[test]
    fn invalid_color_is_a_parse_error() {
        let err = Skin::from_toml(r#"text = "blue""#).unwrap_err();
        assert!(matches!(err, SkinError::ParseError { .. }));
    }

    #[test]
    fn serialized_skin_reads_back() {
        let text = Skin::paper().to_toml().unwrap();
        let skin = Skin::from_toml(&text).unwrap();
        assert_eq!(skin.name, "paper");
        assert_eq!(
            skin.textbox.focused.border.map(|c| c.to_rgba8().b),
            Some(0xd6)
        );
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(Skin::builtin("Light").unwrap().name, "paper");
        assert!(matches!(
            Skin::builtin("neon"),
            Err(SkinError::SkinNotFound { .. })
        ));
    }

    #[test]
    fn surface_inset_requires_border() {
        let mut surface = Surface::flat(Color::BLACK);
        surface.border_width = 3.0;
        assert_eq!(surface.inset(), 0.0);
        assert_eq!(Surface::bordered(Color::BLACK, Color::WHITE, 2.0).inset(), 2.0);
    }
}
