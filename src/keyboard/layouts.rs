//! Built-in layouts.

use serde::{Deserialize, Serialize};

use crate::keyboard::{KeyRow, KeyboardLayout};

/// German QWERTZ (ISO), the default layout.
const GERMAN_QWERTZ: [KeyRow; 4] = [
    KeyRow::new(0.0, "^1234567890ß´").with_shifted("°!\"§$%&/()=?`"),
    KeyRow::new(1.5, "qwertzuiopü+").with_shifted("QWERTZUIOPÜ*"),
    KeyRow::new(1.75, "asdfghjklöä#").with_shifted("ASDFGHJKLÖÄ'"),
    KeyRow::new(1.25, "<yxcvbnm,.-").with_shifted(">YXCVBNM;:_"),
];

/// US QWERTY (ANSI).
const US_QWERTY: [KeyRow; 4] = [
    KeyRow::new(0.0, "`1234567890-=").with_shifted("~!@#$%^&*()_+"),
    KeyRow::new(1.5, "qwertyuiop[]\\").with_shifted("QWERTYUIOP{}|"),
    KeyRow::new(1.75, "asdfghjkl;'").with_shifted("ASDFGHJKL:\""),
    KeyRow::new(2.25, "zxcvbnm,./").with_shifted("ZXCVBNM<>?"),
];

impl KeyboardLayout {
    /// German QWERTZ layout.
    pub fn german_qwertz() -> Self {
        KeyboardLayout::from_rows("de-qwertz", &GERMAN_QWERTZ)
    }

    /// US QWERTY layout.
    pub fn us_qwerty() -> Self {
        KeyboardLayout::from_rows("us-qwerty", &US_QWERTY)
    }
}

/// Selector for the built-in layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Qwertz,
    Qwerty,
}

impl LayoutKind {
    pub fn layout(self) -> KeyboardLayout {
        match self {
            LayoutKind::Qwertz => KeyboardLayout::german_qwertz(),
            LayoutKind::Qwerty => KeyboardLayout::us_qwerty(),
        }
    }
}
