//! Canned token files

/// Foundation palette with an alias into it
pub const BASE: &str = r##"{
  "color": {
    "base": {
      "black": { "value": "#000000", "type": "color" },
      "white": { "value": "#ffffff", "type": "color" }
    },
    "primary": { "value": "{color.base.black}", "type": "color", "comment": "Brand primary" }
  },
  "spacing": {
    "sm": { "value": "4px", "type": "spacing" },
    "md": { "value": "8px", "type": "spacing" }
  }
}
"##;

/// Shared typography
pub const GLOBAL: &str = r#"{
  "font": {
    "family": { "value": "Inter", "type": "fontFamily" },
    "uppercase": { "value": false, "type": "boolean" }
  }
}
"#;

/// Overrides for the `acme` brand
pub const ACME: &str = r##"{
  "color": {
    "base": {
      "black": { "value": "#1a0000", "type": "color" }
    }
  }
}
"##;

/// Overrides for the `globex` brand, written with a trailing comma
pub const GLOBEX: &str = r##"{
  "color": {
    "primary": { "value": "#0044ff", "type": "color" },
  }
}
"##;

/// The files of a two-brand repository, relative to its root
pub fn multi_brand() -> Vec<(&'static str, &'static str)> {
    vec![
        ("tokens/base.json", BASE),
        ("tokens/global.json", GLOBAL),
        ("tokens/brands/acme/colors.json", ACME),
        ("tokens/brands/globex/colors.json", GLOBEX),
    ]
}
