//! HTML templates compiled into the binary.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use super::ApiError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("empire.html", include_str!("../../templates/empire.html")),
    ("pricing.html", include_str!("../../templates/pricing.html")),
    ("checkout.html", include_str!("../../templates/checkout.html")),
    ("payment_dashboard.html", include_str!("../../templates/payment_dashboard.html")),
    ("payment_success.html", include_str!("../../templates/payment_success.html")),
    ("admin/dashboard.html", include_str!("../../templates/admin/dashboard.html")),
    ("admin/plugins.html", include_str!("../../templates/admin/plugins.html")),
    ("admin/updates.html", include_str!("../../templates/admin/updates.html")),
    ("admin/config.html", include_str!("../../templates/admin/config.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, ApiError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_parse() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render(
                "payment_success.html",
                context! { session_id => "cs_test", access_code => "PAID_CS_TEST" },
            )
            .unwrap();
        assert!(html.0.contains("PAID_CS_TEST"));
    }
}
