use askama::Template;

use crate::{application::render::RenderError, domain::items::Site};

/// Stylesheet for page chrome, shipped with the binary.
pub const SITE_CSS: &str = include_str!("../../static/site.css");
/// Syntax highlighting classes generated from the bundled theme at build time.
pub const CODE_CSS: &str = include_str!(env!("CODE_THEME_CSS_FILE"));

pub const SITE_CSS_PATH: &str = "styles/site.css";
pub const CODE_CSS_PATH: &str = "styles/code.css";

pub fn render_template<T: Template>(template: T) -> Result<String, RenderError> {
    template.render().map_err(|err| RenderError::Template {
        message: err.to_string(),
    })
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: Option<String>,
    pub stylesheets: Vec<String>,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn for_site(site: &Site) -> Self {
        Self {
            brand: BrandView {
                title: site.title.clone(),
                href: "index.html".to_string(),
            },
            footer: FooterView {
                copy: format!("{} · generated by lessonbook", site.title),
            },
            meta: PageMetaView {
                title: site.title.clone(),
                description: site.description.clone(),
                stylesheets: vec![SITE_CSS_PATH.to_string(), CODE_CSS_PATH.to_string()],
            },
        }
    }

    pub fn with_page_title(self, page_title: &str) -> Self {
        let title = format!("{page_title} · {}", self.brand.title);
        Self {
            meta: PageMetaView { title, ..self.meta },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

/// Captured result of a runnable sample as shown on its page.
#[derive(Clone)]
pub struct RunView {
    pub target: String,
    pub output: Option<String>,
    pub failure: Option<String>,
}

#[derive(Clone)]
pub struct SampleView {
    pub label: String,
    pub language: Option<String>,
    pub code_html: String,
    pub run: Option<RunView>,
}

#[derive(Clone)]
pub struct NavLinkView {
    pub href: String,
    pub title: String,
}

pub struct ItemPageContext {
    pub id: u32,
    pub title: String,
    pub description_html: String,
    pub samples: Vec<SampleView>,
    pub previous: Option<NavLinkView>,
    pub next: Option<NavLinkView>,
}

#[derive(Template)]
#[template(path = "item.html")]
pub struct ItemPageTemplate {
    pub view: LayoutContext<ItemPageContext>,
}

#[derive(Clone)]
pub struct IndexEntryView {
    pub id: u32,
    pub title: String,
    /// `None` when the item failed to render and has no page.
    pub href: Option<String>,
}

pub struct IndexContext {
    pub description: Option<String>,
    pub entries: Vec<IndexEntryView>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexContext>,
}
