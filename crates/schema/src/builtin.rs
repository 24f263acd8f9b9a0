//! Schemas shipped with the compiler.

use crate::builder::{ElementBuilder, SchemaBuilder};
use crate::doctype::DocType;
use crate::schema::{Schema, SchemaRef};
use crate::validator::{AttributeFlag, AttributeValidator, ElementFlag};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn strict_doctype() -> DocType {
    DocType::new(
        "strict",
        Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
        "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
    )
    .with_sgml(
        Some("-//W3C//DTD HTML 4.01//EN"),
        "http://www.w3.org/TR/html4/strict.dtd",
    )
}

fn mobile_doctype() -> DocType {
    DocType::new(
        "mobile",
        Some("-//WAPFORUM//DTD XHTML Mobile 1.0//EN"),
        "http://www.wapforum.org/DTD/xhtml-mobile10.dtd",
    )
}

fn markup(name: &str, content_type: &str) -> SchemaBuilder {
    SchemaBuilder::new(name, XHTML_NAMESPACE, content_type)
        .element(
            ElementBuilder::new("html")
                .doc_type(strict_doctype())
                .doc_type(mobile_doctype()),
        )
        .element(ElementBuilder::new("head"))
        .element(ElementBuilder::new("title"))
        .element(ElementBuilder::new("body"))
        .element(
            ElementBuilder::new("a")
                .flagged_attribute("title", AttributeFlag::VisibleText)
                .attribute(AttributeValidator::new("href").example("http://www.google.com/")),
        )
        .element(ElementBuilder::new("b"))
        .element(ElementBuilder::new("i"))
        .element(ElementBuilder::new("p"))
        .element(ElementBuilder::new("div"))
        .element(ElementBuilder::new("span"))
        .element(
            ElementBuilder::new("br")
                .flag(ElementFlag::NoEndTag)
                .flag(ElementFlag::Childless),
        )
        .element(
            ElementBuilder::new("img")
                .flag(ElementFlag::NoEndTag)
                .flag(ElementFlag::Childless)
                .flagged_attribute("alt", AttributeFlag::VisibleText)
                .flagged_attribute("title", AttributeFlag::VisibleText)
                .attribute(AttributeValidator::new("src").example("/images/logo.png")),
        )
        .element(ElementBuilder::new("select"))
        .element(
            ElementBuilder::new("option")
                .flag(ElementFlag::OptionalEndTag)
                .flagged_attribute("selected", AttributeFlag::Boolean)
                .flagged_attribute("disabled", AttributeFlag::Boolean),
        )
        .element(
            ElementBuilder::new("input")
                .flag(ElementFlag::NoEndTag)
                .flag(ElementFlag::Childless)
                .flagged_attribute("checked", AttributeFlag::Boolean)
                .flagged_attribute("disabled", AttributeFlag::Boolean)
                .flagged_attribute("value", AttributeFlag::VisibleText),
        )
        .element(
            ElementBuilder::new("script")
                .flag(ElementFlag::InvisibleBody)
                .flag(ElementFlag::EvilCdata)
                .inner_content_type("text/javascript"),
        )
        .element(
            ElementBuilder::new("style")
                .flag(ElementFlag::InvisibleBody)
                .flag(ElementFlag::EvilCdata)
                .inner_content_type("text/css"),
        )
        .element(ElementBuilder::new("pre").flag(ElementFlag::PreserveSpaces))
        .element(ElementBuilder::new("textarea").flag(ElementFlag::PreserveSpaces))
}

fn finish(builder: SchemaBuilder) -> SchemaRef {
    match builder.build_ref() {
        Ok(schema) => schema,
        // The builtin definitions are static and free of duplicates.
        Err(err) => unreachable!("builtin schema is malformed: {err}"),
    }
}

static HTML: LazyLock<SchemaRef> = LazyLock::new(|| finish(markup("html", "text/html")));
static XHTML: LazyLock<SchemaRef> = LazyLock::new(|| finish(markup("xhtml", "application/xhtml+xml")));
static JAVASCRIPT: LazyLock<SchemaRef> = LazyLock::new(|| textual("javascript", "text/javascript"));
static CSS: LazyLock<SchemaRef> = LazyLock::new(|| textual("css", "text/css"));
static PLAINTEXT: LazyLock<SchemaRef> = LazyLock::new(|| textual("plaintext", "text/plain"));

/// Built once per process; every call shares the same schema.
pub fn html() -> SchemaRef {
    HTML.clone()
}

pub fn xhtml() -> SchemaRef {
    XHTML.clone()
}

fn textual(name: &str, content_type: &str) -> SchemaRef {
    SchemaRef::new(Schema {
        name: name.to_string(),
        namespace_uri: String::new(),
        content_type: content_type.to_string(),
        content_family: crate::schema::ContentFamily::from_content_type(content_type),
        tag_prefix: None,
        elements: Default::default(),
    })
}

pub fn javascript() -> SchemaRef {
    JAVASCRIPT.clone()
}

pub fn css() -> SchemaRef {
    CSS.clone()
}

pub fn plaintext() -> SchemaRef {
    PLAINTEXT.clone()
}

/// All builtin schemas keyed by content type.
pub fn by_content_type() -> HashMap<String, SchemaRef> {
    [html(), xhtml(), javascript(), css(), plaintext()]
        .into_iter()
        .map(|schema| (schema.content_type.clone(), schema))
        .collect()
}
