//! HTML compilation of a rendered page.
//!
//! Walks the rendered block tree into a complete HTML document: head with
//! SEO metadata, font stylesheet link and collected CSS, body with one
//! element per placed block.

use crate::theme::resolve_fonts;
use sitekit_model::{BlockNode, CssRule, Page, Project, RenderedPage};

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            let indent = self.options.indent.clone();
            for _ in 0..self.depth {
                self.add(&indent);
            }
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

// Elements that never take children
const VOID_TAGS: [&str; 6] = ["img", "br", "hr", "input", "link", "meta"];

/// Compile a rendered page into a complete HTML document
pub fn compile_page(
    project: &Project,
    page: &Page,
    rendered: &RenderedPage,
    options: CompileOptions,
) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compile_head(project, page, rendered, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    for node in &rendered.nodes {
        compile_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");
    ctx.get_output()
}

fn compile_head(project: &Project, page: &Page, rendered: &RenderedPage, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line(r#"<meta charset="utf-8">"#);
    ctx.add_line(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);

    let title = project
        .metadata
        .title
        .clone()
        .unwrap_or_else(|| format!("{} | {}", page.name, project.name));
    ctx.add_line(&format!("<title>{}</title>", escape_html(&title)));

    if let Some(description) = &project.metadata.description {
        ctx.add_line(&format!(
            r#"<meta name="description" content="{}">"#,
            escape_attr(description)
        ));
    }

    if let Some(favicon) = &project.metadata.favicon {
        ctx.add_line(&format!(
            r#"<link rel="icon" href="{}">"#,
            escape_attr(favicon)
        ));
    }

    let fonts = resolve_fonts(&project.settings);
    if let Some(url) = &fonts.stylesheet_url {
        ctx.add_line(&format!(
            r#"<link rel="stylesheet" href="{}">"#,
            escape_attr(url)
        ));
    }

    let mut rules: Vec<&CssRule> = rendered.styles.iter().collect();
    let font_rules = fonts.css_rules();
    rules.extend(font_rules.iter());

    if !rules.is_empty() {
        ctx.add_line("<style>");
        ctx.indent();
        for rule in rules {
            compile_rule(rule, ctx);
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_rule(rule: &CssRule, ctx: &mut Context) {
    ctx.add_line(&format!("{} {{", rule.selector));
    ctx.indent();
    for (name, value) in &rule.declarations {
        ctx.add_line(&format!("{}: {};", name, value));
    }
    ctx.dedent();
    ctx.add_line("}");
}

fn compile_node(node: &BlockNode, ctx: &mut Context) {
    match node {
        BlockNode::Element {
            tag,
            attributes,
            styles,
            children,
        } => {
            let mut open = format!("<{}", tag);

            // Sorted emission keeps output deterministic
            let mut attrs: Vec<(&String, &String)> = attributes.iter().collect();
            attrs.sort_by_key(|(name, _)| name.as_str());
            for (name, value) in attrs {
                open.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
            }

            if !styles.is_empty() {
                let mut decls: Vec<(&String, &String)> = styles.iter().collect();
                decls.sort_by_key(|(name, _)| name.as_str());
                let style: Vec<String> = decls
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect();
                open.push_str(&format!(r#" style="{}""#, escape_attr(&style.join("; "))));
            }

            if children.is_empty() && VOID_TAGS.contains(&tag.as_str()) {
                open.push_str(" />");
                ctx.add_line(&open);
                return;
            }

            open.push('>');
            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                compile_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }

        BlockNode::Text { content } => {
            ctx.add_line(&escape_html(content));
        }

        BlockNode::Error { message } => {
            ctx.add_line(&format!(
                r#"<div class="sk-block-error" style="border: 2px dashed #DC2626; color: #DC2626; padding: 24px">{}</div>"#,
                escape_html(message)
            ));
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_model::Project;

    fn fixture() -> (Project, Page, RenderedPage) {
        let project = Project::new("proj_1", "Portfolio", "portfolio");
        let page = Page::new("Home");
        let mut rendered = RenderedPage::new();
        rendered.add_rule(
            ":root",
            vec![("--primary".to_string(), "#6D3DF2".to_string())],
        );
        rendered.add_node(
            BlockNode::element("section")
                .with_attr("class", "sk-hero")
                .with_child(BlockNode::text("Hello & welcome")),
        );
        (project, page, rendered)
    }

    #[test]
    fn test_compiles_full_document() {
        let (project, page, rendered) = fixture();
        let html = compile_page(&project, &page, &rendered, CompileOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("--primary: #6D3DF2;"));
        assert!(html.contains(r#"<section class="sk-hero">"#));
        assert!(html.contains("Hello &amp; welcome"));
        assert!(html.contains("<title>Home | Portfolio</title>"));
    }

    #[test]
    fn test_metadata_title_wins() {
        let (mut project, page, rendered) = fixture();
        project.metadata.title = Some("Acme, Home of Acme".to_string());

        let html = compile_page(&project, &page, &rendered, CompileOptions::default());
        assert!(html.contains("<title>Acme, Home of Acme</title>"));
    }

    #[test]
    fn test_font_link_present_when_fonts_named() {
        let (mut project, page, rendered) = fixture();
        project.settings.heading_font = Some("Space Grotesk".to_string());
        project.settings.body_font = Some("Inter".to_string());

        let html = compile_page(&project, &page, &rendered, CompileOptions::default());
        assert!(html.contains("family=Space+Grotesk&family=Inter"));
        assert!(html.contains("h1, h2, h3, h4, h5, h6"));
    }

    #[test]
    fn test_error_node_renders_inline_panel() {
        let (project, page, mut rendered) = fixture();
        rendered.add_node(BlockNode::error("link cycle detected"));

        let html = compile_page(&project, &page, &rendered, CompileOptions::default());
        assert!(html.contains("sk-block-error"));
        assert!(html.contains("link cycle detected"));
    }

    #[test]
    fn test_void_elements_self_close() {
        let (project, page, mut rendered) = fixture();
        rendered.add_node(BlockNode::element("img").with_attr("src", "/hero.png"));

        let html = compile_page(&project, &page, &rendered, CompileOptions::default());
        assert!(html.contains(r#"<img src="/hero.png" />"#));
    }
}
