//! HTML rendering for the single page

use instruct::Exchange;
use tera::{Context, Tera};

const HOME: &str = "home.html";

/// Templates compiled into the binary
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        // `.html` name keeps tera's autoescaping on
        tera.add_raw_template(HOME, include_str!("../templates/home.html"))?;
        Ok(Self { tera })
    }

    /// Render the form with the given values filled in
    pub fn home(&self, exchange: &Exchange) -> tera::Result<String> {
        let context = Context::from_serialize(exchange)?;
        self.tera.render(HOME, &context)
    }
}
