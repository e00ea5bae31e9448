//! Builtin block templates.
//!
//! These are swappable content: each template is a plain render function
//! over its resolved value map. The engine only cares that every entry in
//! the manifest carries a schema and a render function.

use crate::registry::{RegistryEntry, RenderInput};
use crate::schema::{FieldSchema, FieldSpec};
use sitekit_model::BlockNode;

/// Static manifest the registry is built from at startup
pub fn builtin_manifest() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry {
            category: "hero".to_string(),
            variant: "centered".to_string(),
            schema: FieldSchema::new()
                .content("heading", FieldSpec::text().with_default("Build something"))
                .content("subheading", FieldSpec::text())
                .content("cta_label", FieldSpec::text())
                .content("cta_href", FieldSpec::link())
                .theme("background", FieldSpec::token().with_default("primary")),
            render: hero_centered,
        },
        RegistryEntry {
            category: "hero".to_string(),
            variant: "split".to_string(),
            schema: FieldSchema::new()
                .content("heading", FieldSpec::text())
                .content("body", FieldSpec::text())
                .content("image", FieldSpec::image())
                .theme("background", FieldSpec::token().with_default("none")),
            render: hero_split,
        },
        RegistryEntry {
            category: "testimonials".to_string(),
            variant: "grid".to_string(),
            schema: FieldSchema::new()
                .content("heading", FieldSpec::text())
                .content("items", FieldSpec::text().with_label("Testimonial entries")),
            render: testimonials_grid,
        },
        RegistryEntry {
            category: "cta".to_string(),
            variant: "banner".to_string(),
            schema: FieldSchema::new()
                .content("heading", FieldSpec::text())
                .content("button_label", FieldSpec::text())
                .content("button_href", FieldSpec::link())
                .theme("background", FieldSpec::token().with_default("gradient-primary-secondary")),
            render: cta_banner,
        },
        RegistryEntry {
            category: "footer".to_string(),
            variant: "simple".to_string(),
            schema: FieldSchema::new()
                .content("copyright", FieldSpec::text())
                .content("links", FieldSpec::text().with_label("Footer links")),
            render: footer_simple,
        },
    ]
}

/// Shared fallback entry for unregistered paths
pub fn fallback_entry() -> RegistryEntry {
    RegistryEntry {
        category: "fallback".to_string(),
        variant: "missing".to_string(),
        schema: FieldSchema::new(),
        render: missing_block,
    }
}

fn section(input: &RenderInput, class: &str) -> BlockNode {
    let mut node = BlockNode::element("section")
        .with_attr("class", class)
        .with_attr("data-block", input.block_id);

    let style = input.token_style("background");
    if let Some(background) = style.background {
        node = node.with_style("background", background);
    }
    if let Some(foreground) = style.foreground {
        node = node.with_style("color", foreground);
    }
    node
}

fn hero_centered(input: &RenderInput) -> BlockNode {
    let mut node = section(input, "sk-hero sk-hero-centered").with_child(
        BlockNode::element("h1").with_child(BlockNode::text(input.text("heading", "Build something"))),
    );

    if let Some(subheading) = input.maybe_text("subheading") {
        node = node.with_child(
            BlockNode::element("p")
                .with_attr("class", "sk-subheading")
                .with_child(BlockNode::text(subheading)),
        );
    }

    if let Some(label) = input.maybe_text("cta_label") {
        node = node.with_child(
            BlockNode::element("a")
                .with_attr("class", "sk-button")
                .with_attr("href", input.text("cta_href", "#"))
                .with_child(BlockNode::text(label)),
        );
    }

    node
}

fn hero_split(input: &RenderInput) -> BlockNode {
    let mut copy = BlockNode::element("div")
        .with_attr("class", "sk-hero-copy")
        .with_child(
            BlockNode::element("h1").with_child(BlockNode::text(input.text("heading", "Welcome"))),
        );
    if let Some(body) = input.maybe_text("body") {
        copy = copy.with_child(BlockNode::element("p").with_child(BlockNode::text(body)));
    }

    let mut node = section(input, "sk-hero sk-hero-split").with_child(copy);

    if let Some(image) = input.maybe_text("image") {
        node = node.with_child(
            BlockNode::element("img")
                .with_attr("class", "sk-hero-image")
                .with_attr("src", image)
                .with_attr("alt", input.text("heading", "")),
        );
    }

    node
}

fn testimonials_grid(input: &RenderInput) -> BlockNode {
    let mut grid = BlockNode::element("div").with_attr("class", "sk-testimonial-grid");

    // Entries travel as a JSON array of { quote, author } objects
    if let Some(items) = input.values.get("items").and_then(|v| v.value.as_array()) {
        for item in items {
            let quote = item.get("quote").and_then(|v| v.as_str()).unwrap_or("");
            let author = item.get("author").and_then(|v| v.as_str()).unwrap_or("");

            grid = grid.with_child(
                BlockNode::element("figure")
                    .with_attr("class", "sk-testimonial")
                    .with_child(
                        BlockNode::element("blockquote").with_child(BlockNode::text(quote)),
                    )
                    .with_child(
                        BlockNode::element("figcaption").with_child(BlockNode::text(author)),
                    ),
            );
        }
    }

    section(input, "sk-testimonials")
        .with_child(
            BlockNode::element("h2")
                .with_child(BlockNode::text(input.text("heading", "What people say"))),
        )
        .with_child(grid)
}

fn cta_banner(input: &RenderInput) -> BlockNode {
    section(input, "sk-cta")
        .with_child(
            BlockNode::element("h2")
                .with_child(BlockNode::text(input.text("heading", "Ready to start?"))),
        )
        .with_child(
            BlockNode::element("a")
                .with_attr("class", "sk-button")
                .with_attr("href", input.text("button_href", "#"))
                .with_child(BlockNode::text(input.text("button_label", "Get started"))),
        )
}

fn footer_simple(input: &RenderInput) -> BlockNode {
    let mut nav = BlockNode::element("nav").with_attr("class", "sk-footer-links");

    if let Some(links) = input.values.get("links").and_then(|v| v.value.as_array()) {
        for link in links {
            let label = link.get("label").and_then(|v| v.as_str()).unwrap_or("");
            let href = link.get("href").and_then(|v| v.as_str()).unwrap_or("#");
            nav = nav.with_child(
                BlockNode::element("a")
                    .with_attr("href", href)
                    .with_child(BlockNode::text(label)),
            );
        }
    }

    let mut node = BlockNode::element("footer")
        .with_attr("class", "sk-footer")
        .with_attr("data-block", input.block_id)
        .with_child(nav);

    if let Some(copyright) = input.maybe_text("copyright") {
        node = node.with_child(
            BlockNode::element("p")
                .with_attr("class", "sk-copyright")
                .with_child(BlockNode::text(copyright)),
        );
    }

    node
}

/// Diagnostic panel for unregistered template paths
fn missing_block(input: &RenderInput) -> BlockNode {
    BlockNode::element("div")
        .with_attr("class", "sk-block-missing")
        .with_attr("data-block", input.block_id)
        .with_style("border", "2px dashed #DC2626")
        .with_style("padding", "24px")
        .with_style("color", "#DC2626")
        .with_child(BlockNode::text(format!(
            "Block not found: {}/{}",
            input.category, input.variant
        )))
}
