use handlebars::Handlebars;
use serde_json::json;
use shared::VoteChoice;

const INDEX_TEMPLATE: &str = "index";

/// Server-rendered ballot page
pub struct PageRenderer {
    template_engine: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> anyhow::Result<Self> {
        let mut template_engine = Handlebars::new();
        template_engine
            .register_template_string(INDEX_TEMPLATE, include_str!("../templates/index.hbs"))
            .map_err(|e| anyhow::anyhow!("Failed to register template: {}", e))?;

        Ok(Self { template_engine })
    }

    /// Render the ballot page. `last_vote` is shown as-is (HTML-escaped).
    pub fn render_index(&self, last_vote: Option<&str>) -> Result<String, handlebars::RenderError> {
        let options: Vec<&str> = VoteChoice::ALL.iter().map(VoteChoice::as_str).collect();
        self.template_engine.render(
            INDEX_TEMPLATE,
            &json!({
                "last_vote": last_vote,
                "options": options,
            }),
        )
    }
}
