//! Rich message content sent through the chat actuator.

/// An embed-style message. The Discord gateway renders it as an embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub title: Option<String>,
    pub description: String,
    pub url: Option<String>,
    pub colour: Option<u32>,
    pub fields: Vec<(String, String)>,
    pub image_url: Option<String>,
    pub footer: Option<String>,
}

impl Notice {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}
