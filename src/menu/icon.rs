/// What a slot looks like. The engine never interprets an icon, it only
/// hands it to the [`Renderer`](crate::Renderer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Icon {
    material: String,
    name: Option<String>,
    lore: Vec<String>,
    glint: bool,
    amount: u8,
}

impl Icon {
    pub fn new<S: Into<String>>(material: S) -> Self {
        Icon {
            material: material.into(),
            name: None,
            lore: Vec::new(),
            glint: false,
            amount: 1,
        }
    }

    pub fn empty() -> Self {
        Icon::new("AIR")
    }

    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn lore<I, S>(mut self, lines: I) -> Self
        where I: IntoIterator<Item=S>, S: Into<String>
    {
        self.lore = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn glint(mut self) -> Self {
        self.glint = true;
        self
    }

    /// Stack size shown on the slot, clamped to at least one.
    pub fn amount(mut self, amount: u8) -> Self {
        self.amount = amount.max(1);
        self
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(String::as_str)
    }

    pub fn lore_lines(&self) -> &[String] {
        &self.lore
    }

    pub fn has_glint(&self) -> bool {
        self.glint
    }

    pub fn count(&self) -> u8 {
        self.amount
    }

    pub fn is_empty(&self) -> bool {
        self.material == "AIR"
    }
}

impl Default for Icon {
    fn default() -> Self {
        Icon::empty()
    }
}
