use serde::{Deserialize, Serialize};

/// A gallery entry. Templates only pick the preview styling; content is independent of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub style_class: String,
}

impl TemplateDescriptor {
    pub fn style(&self) -> TemplateStyle<'_> {
        TemplateStyle(&self.style_class)
    }
}

const PORTRAIT_A: &str = "https://images.unsplash.com/photo-1485217988980-11786ced9454?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80";
const PORTRAIT_B: &str = "https://images.unsplash.com/photo-1586281380117-5a60ae2050cc?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80";
const PORTRAIT_C: &str = "https://images.unsplash.com/photo-1586281380349-632531db7ed4?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80";

/// (id, name, description, image, style class)
const CATALOG: &[(u32, &str, &str, &str, &str)] = &[
    (
        1,
        "Andree Rocher",
        "Professional and clean layout with clear section hierarchy",
        PORTRAIT_A,
        "bg-white",
    ),
    (
        2,
        "Chanchal Sharma",
        "Minimalist design with elegant typography",
        PORTRAIT_B,
        "bg-white",
    ),
    (
        3,
        "Danielle Brasseur",
        "Modern template with a soft mint accent",
        PORTRAIT_C,
        "bg-[#e8f3f1]",
    ),
    (
        4,
        "Caleb Foster",
        "Bold and impactful with red accents",
        PORTRAIT_B,
        "bg-white",
    ),
    (
        5,
        "Michelle Wattz",
        "Classic and sophisticated design",
        PORTRAIT_A,
        "bg-white",
    ),
];

/// Returns the full template gallery in display order.
pub fn template_catalog() -> Vec<TemplateDescriptor> {
    CATALOG
        .iter()
        .map(
            |&(id, name, description, image_url, style_class)| TemplateDescriptor {
                id,
                name: name.to_string(),
                description: description.to_string(),
                image_url: image_url.to_string(),
                style_class: style_class.to_string(),
            },
        )
        .collect()
}

pub fn find_template(id: u32) -> Option<TemplateDescriptor> {
    template_catalog().into_iter().find(|t| t.id == id)
}

/// The template the editor falls back to when nothing was selected.
pub fn default_template() -> TemplateDescriptor {
    template_catalog()
        .into_iter()
        .next()
        .unwrap_or_else(|| TemplateDescriptor {
            id: 0,
            name: "Plain".to_string(),
            description: String::new(),
            image_url: String::new(),
            style_class: "bg-white".to_string(),
        })
}

/// View over a template's style class.
#[derive(Debug, Clone, Copy)]
pub struct TemplateStyle<'a>(&'a str);

impl<'a> TemplateStyle<'a> {
    pub fn class(&self) -> &'a str {
        self.0
    }

    /// Page background as RGB. Understands `bg-white` and arbitrary `bg-[#rrggbb]` classes;
    /// anything else renders on white.
    pub fn background(&self) -> [u8; 3] {
        const WHITE: [u8; 3] = [255, 255, 255];
        let Some(hex) = self
            .0
            .strip_prefix("bg-[#")
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            return WHITE;
        };
        if hex.len() != 6 || !hex.is_ascii() {
            return WHITE;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match (channel(0), channel(2), channel(4)) {
            (Some(r), Some(g), Some(b)) => [r, g, b],
            _ => WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_five_templates_in_order() {
        let ids: Vec<u32> = template_catalog().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(default_template().name, "Andree Rocher");
    }

    #[test]
    fn test_find_template() {
        assert_eq!(find_template(3).unwrap().style_class, "bg-[#e8f3f1]");
        assert!(find_template(42).is_none());
    }

    #[test]
    fn test_background_parsing() {
        let mint = find_template(3).unwrap();
        assert_eq!(mint.style().background(), [0xe8, 0xf3, 0xf1]);
        assert_eq!(TemplateStyle("bg-white").background(), [255, 255, 255]);
        assert_eq!(TemplateStyle("bg-[#zzzzzz]").background(), [255, 255, 255]);
        assert_eq!(TemplateStyle("bg-[#abc]").background(), [255, 255, 255]);
    }
}
