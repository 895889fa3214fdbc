use tera::{Context, Tera};
use tracing::info;

const CONFIRMATION_HTML: &str = "email/waitlist_confirmation.html";
const CONFIRMATION_TEXT: &str = "email/waitlist_confirmation.txt";

/// Renders the confirmation emails.
/// Templates are compiled into the binary so rendering doesn't depend on the working directory.
#[derive(Debug)]
pub struct TemplateManager {
    tera: Tera,
}

/// The rendered bodies of one email.
#[derive(Debug)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

impl TemplateManager {
    pub fn init() -> Result<Self, tera::Error> {
        info!("{:<20} - Initializing the Template manager", "templ manager");
        let mut tera = Tera::default();
        tera.add_raw_templates([
            (
                CONFIRMATION_HTML,
                include_str!("../templates/email/waitlist_confirmation.html"),
            ),
            (
                CONFIRMATION_TEXT,
                include_str!("../templates/email/waitlist_confirmation.txt"),
            ),
        ])?;

        Ok(Self { tera })
    }

    pub fn render_confirmation(&self, email: &str) -> Result<RenderedEmail, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("email", email);

        Ok(RenderedEmail {
            html: self.tera.render(CONFIRMATION_HTML, &ctx)?,
            text: self.tera.render(CONFIRMATION_TEXT, &ctx)?,
        })
    }
}
