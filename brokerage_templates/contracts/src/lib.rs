use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the plain text and the html version of the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<RenderedTemplate>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: RenderedTemplate,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub text: String,
    pub html: String,
}

pub trait Template: Serialize {
    const NAME: &'static str;
    const TEXT: &'static str;
    const HTML: &'static str;
}

pub const BASE_TEMPLATE: &str = include_str!("../templates/base.html");

macro_rules! templates {
    ($( $ident:ident ( $name:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $name;
                const TEXT: &'static str = include_str!(concat!("../templates/", $name, ".txt"));
                const HTML: &'static str = include_str!(concat!("../templates/", $name, ".html"));
            }
        )*

        /// `(name, text, html)` of every template.
        pub const TEMPLATES: &[(&str, &str, &str)] = &[
            $( ($ident::NAME, $ident::TEXT, $ident::HTML) ),*
        ];
    };
}

templates! {
    SubmissionTemplate("submission"),
}

/// Notification sent to the operator inbox for a new form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionTemplate {
    /// Human readable name of the form, e.g. "Lease IPv4".
    pub title: String,
    /// The submitted fields in display order. Fields outside the form's
    /// shape are not listed at all.
    pub rows: Vec<SubmissionTemplateRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionTemplateRow {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl SubmissionTemplateRow {
    pub fn new(label: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            label: label.into(),
            value: value.map(Into::into),
        }
    }
}
